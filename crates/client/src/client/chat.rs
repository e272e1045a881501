//! Chat operations.

use serde::Deserialize;

use concierge_core::chat::{ChatRequest, ChatResponse};

use super::ConciergeClient;
use crate::error::{ClientError, Result};

/// An event of a streamed chat reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A few words of the reply.
    Chunk(String),
    /// The full response once every chunk was sent.
    Done(Box<ChatResponse>),
    /// The server gave up on the stream.
    Error(String),
}

#[derive(Debug, Deserialize)]
struct ChunkData {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorData {
    error: String,
}

impl ConciergeClient {
    /// Send a chat turn and wait for the full reply.
    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(self.url("/api/chat"))
            .json(request)
            .send()
            .await?;
        self.handle_response(response, "chat").await
    }

    /// Send a chat turn and stream the reply as it is produced.
    pub async fn chat_stream(
        &self,
        request: &ChatRequest,
    ) -> Result<impl futures_core::Stream<Item = Result<StreamEvent>>> {
        let response = self
            .client
            .post(self.url("/api/chat/stream"))
            .header("Accept", "text/event-stream")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(self
                .handle_response::<serde_json::Value>(response, "chat stream")
                .await
                .err()
                .unwrap_or_else(|| {
                    ClientError::InvalidResponse("Unexpected chat stream response".to_string())
                }));
        }

        let stream = async_stream::stream! {
            use tokio_stream::StreamExt;

            let mut byte_stream = response.bytes_stream();
            let mut buffer = EventBuffer::default();

            while let Some(chunk_result) = byte_stream.next().await {
                match chunk_result {
                    Ok(chunk) => {
                        for event in buffer.push(&chunk) {
                            yield event;
                        }
                    }
                    Err(e) => {
                        yield Err(ClientError::Connection(e.to_string()));
                        break;
                    }
                }
            }
        };

        Ok(stream)
    }
}

/// Raw bytes of an SSE body, split into events once each one is complete.
///
/// Decoding waits for the blank line that ends an event, so a multi-byte
/// character split across network reads stays intact.
#[derive(Debug, Default)]
struct EventBuffer {
    bytes: Vec<u8>,
}

impl EventBuffer {
    fn push(&mut self, chunk: &[u8]) -> Vec<Result<StreamEvent>> {
        self.bytes.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(pos) = self.bytes.windows(2).position(|w| w == b"\n\n") {
            let raw: Vec<u8> = self.bytes.drain(..pos + 2).collect();
            match std::str::from_utf8(&raw[..pos]) {
                Ok(event_str) => events.extend(parse_sse_event(event_str)),
                Err(e) => events.push(Err(ClientError::Stream(format!("invalid UTF-8: {e}")))),
            }
        }
        events
    }
}

/// Parse an SSE event from a string. Comments and unknown events are skipped.
fn parse_sse_event(event_str: &str) -> Option<Result<StreamEvent>> {
    let mut name = "message";
    let mut data = None;

    for line in event_str.lines() {
        if let Some(value) = line.strip_prefix("event:") {
            name = value.trim();
        } else if let Some(value) = line.strip_prefix("data:") {
            data = Some(value.trim_start());
        }
    }

    let data = data?;
    let event = match name {
        "chunk" => serde_json::from_str::<ChunkData>(data).map(|d| StreamEvent::Chunk(d.content)),
        "done" => {
            serde_json::from_str::<ChatResponse>(data).map(|r| StreamEvent::Done(Box::new(r)))
        }
        "error" => serde_json::from_str::<ErrorData>(data).map(|d| StreamEvent::Error(d.error)),
        _ => return None,
    };
    Some(event.map_err(|e| ClientError::Stream(format!("bad {name} event: {e}"))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk_event() {
        let event = parse_sse_event("event: chunk\ndata: {\"content\":\"Hello there \"}");
        assert_eq!(
            event.unwrap().unwrap(),
            StreamEvent::Chunk("Hello there ".to_string())
        );
    }

    #[test]
    fn test_parse_error_event() {
        let event = parse_sse_event("event: error\ndata: {\"error\":\"Server is shutting down\"}");
        assert_eq!(
            event.unwrap().unwrap(),
            StreamEvent::Error("Server is shutting down".to_string())
        );
    }

    #[test]
    fn test_parse_done_event() {
        let data = r#"{"success":true,"data":{"response":"Hi","sessionId":"session-1","citations":[],"trace":{"source":"fallback","fallback":true,"reason":"Agent not configured","traceEvents":0},"model":"demo (simulated)","timestamp":"2025-03-01T00:00:00Z"},"metadata":{"request_id":"req-1","timestamp":"2025-03-01T00:00:00Z","model":"demo (simulated)"}}"#;
        let event = parse_sse_event(&format!("event: done\ndata: {data}"));

        match event.unwrap().unwrap() {
            StreamEvent::Done(response) => {
                assert_eq!(response.data.response, "Hi");
                assert_eq!(response.data.session_id, "session-1");
            }
            other => panic!("expected done, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_skips_keep_alive_and_unknown() {
        assert!(parse_sse_event(":").is_none());
        assert!(parse_sse_event("event: ping\ndata: {}").is_none());
    }

    #[test]
    fn test_buffer_keeps_character_split_across_reads() {
        let body = "event: chunk\ndata: {\"content\":\"café \"}\n\n".as_bytes();
        let split = body.iter().position(|b| *b == 0xC3).unwrap() + 1;
        let mut buffer = EventBuffer::default();

        assert!(buffer.push(&body[..split]).is_empty());
        let events = buffer.push(&body[split..]);

        assert_eq!(events.len(), 1);
        assert_eq!(
            events.into_iter().next().unwrap().unwrap(),
            StreamEvent::Chunk("café ".to_string())
        );
    }

    #[test]
    fn test_buffer_splits_several_events() {
        let mut buffer = EventBuffer::default();
        let body = concat!(
            "event: chunk\ndata: {\"content\":\"a\"}\n\n",
            ":\n\n",
            "event: chunk\ndata: {\"content\":\"b\"}\n\n",
            "event: chu",
        );
        let events = buffer.push(body.as_bytes());

        let chunks: Vec<StreamEvent> = events.into_iter().map(|e| e.unwrap()).collect();
        assert_eq!(
            chunks,
            vec![
                StreamEvent::Chunk("a".to_string()),
                StreamEvent::Chunk("b".to_string())
            ]
        );
        assert_eq!(buffer.bytes, b"event: chu");
    }

    #[test]
    fn test_parse_bad_payload() {
        let event = parse_sse_event("event: chunk\ndata: not json");
        assert!(matches!(event, Some(Err(ClientError::Stream(_)))));
    }
}
