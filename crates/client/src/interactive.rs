//! Interactive chat loop.
//!
//! Reads questions from stdin and keeps the conversation in a [`ChatState`]
//! driven by the core reducer. `/clear` starts a new session, `/quit` exits.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;

use concierge_core::chat::{reduce, ChatAction, ChatMessage, ChatRequest, ChatRole, ChatState};

use crate::client::chat::StreamEvent;
use crate::client::ConciergeClient;
use crate::error::Result;

/// A line typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Quit,
    Clear,
    Empty,
    Message(String),
}

impl Input {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Input::Empty,
            "/quit" | "/exit" => Input::Quit,
            "/clear" => Input::Clear,
            message => Input::Message(message.to_string()),
        }
    }
}

/// Run the chat loop until `/quit` or end of input.
pub async fn run(client: &ConciergeClient, session_id: Option<String>, stream: bool) -> Result<()> {
    let mut state = match session_id {
        Some(id) => ChatState::new(id),
        None => ChatState::default(),
    };
    println!("Session {}. Type /clear for a new session, /quit to exit.", state.session_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt("> ")?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Input::parse(&line) {
            Input::Empty => continue,
            Input::Quit => break,
            Input::Clear => {
                state = reduce(&state, ChatAction::ClearMessages);
                println!("Started session {}", state.session_id);
            }
            Input::Message(message) => {
                state = send(client, state, message, stream).await;
                if let Some(error) = &state.error {
                    eprintln!("Error: {}", error);
                }
            }
        }
    }

    Ok(())
}

/// Send one turn and fold the reply into the state.
async fn send(
    client: &ConciergeClient,
    state: ChatState,
    message: String,
    stream: bool,
) -> ChatState {
    let state = reduce(
        &state,
        ChatAction::AddMessage(ChatMessage::new(ChatRole::User, message.clone())),
    );
    let state = reduce(&state, ChatAction::SendStarted);
    let request = ChatRequest::new(message).with_session_id(state.session_id.clone());

    if stream {
        send_streaming(client, state, &request).await
    } else {
        match client.chat(&request).await {
            Ok(response) => {
                println!("{}", response.data.response);
                finish(&state, vec![response.data.response], &response.data.session_id)
            }
            Err(e) => reduce(&state, ChatAction::Failed(e.to_string())),
        }
    }
}

async fn send_streaming(
    client: &ConciergeClient,
    mut state: ChatState,
    request: &ChatRequest,
) -> ChatState {
    let events = match client.chat_stream(request).await {
        Ok(events) => events,
        Err(e) => return reduce(&state, ChatAction::Failed(e.to_string())),
    };
    tokio::pin!(events);

    while let Some(event) = events.next().await {
        match event {
            Ok(StreamEvent::Chunk(chunk)) => {
                print!("{}", chunk);
                let _ = std::io::stdout().flush();
                state = reduce(&state, ChatAction::StreamChunk(chunk));
            }
            Ok(StreamEvent::Done(response)) => {
                println!();
                return finish(&state, Vec::new(), &response.data.session_id);
            }
            Ok(StreamEvent::Error(error)) => {
                println!();
                return reduce(&state, ChatAction::Failed(error));
            }
            Err(e) => {
                println!();
                return reduce(&state, ChatAction::Failed(e.to_string()));
            }
        }
    }

    reduce(&state, ChatAction::Failed("Stream ended early".to_string()))
}

/// Apply the remaining chunks and close the turn, adopting the server's
/// session id.
fn finish(state: &ChatState, chunks: Vec<String>, session_id: &str) -> ChatState {
    let state = chunks
        .into_iter()
        .fold(state.clone(), |state, chunk| reduce(&state, ChatAction::StreamChunk(chunk)));
    let state = reduce(&state, ChatAction::StreamFinished);
    reduce(&state, ChatAction::SetSessionId(session_id.to_string()))
}

fn prompt(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
