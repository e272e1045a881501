//! Pretty output formatting.

use chrono::{DateTime, Utc};

use concierge_core::agent::ToolResponse;
use concierge_core::chat::ChatReply;
use concierge_core::session::SessionTranscript;
use concierge_core::summary::summarize;
use concierge_core::tool::Operation;

use super::format_json_pretty;
use crate::client::health::{DebugReport, HealthStatus};

fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Format a tool response: the operation's summary, or its data as JSON when
/// there is no summary for it.
pub fn format_tool_response(operation: Operation, response: &ToolResponse) -> String {
    if let Some(error) = &response.error {
        let mut output = format!("Error ({}): {}", error.error_type, error.message);
        if let Some(action) = &error.action_required {
            output.push_str(&format!("\n  Action: {}", action));
        }
        if error.retry_suggested {
            match error.retry_delay_seconds {
                Some(seconds) => output.push_str(&format!("\n  Retry in {}s", seconds)),
                None => output.push_str("\n  Retry suggested"),
            }
        }
        return output;
    }

    match &response.data {
        Some(data) => summarize(operation, data).unwrap_or_else(|| format_json_pretty(data)),
        None => format!("{} returned no data.", operation.name()),
    }
}

/// Format a chat reply for display.
pub fn format_chat_reply(reply: &ChatReply) -> String {
    let mut output = reply.response.clone();
    if !reply.citations.is_empty() {
        output.push_str("\n\nSources:");
        for citation in &reply.citations {
            for source in &citation.sources {
                output.push_str(&format!("\n  - {}", source));
            }
        }
    }
    output.push_str(&format!(
        "\n\n[{} | session {}]",
        reply.model, reply.session_id
    ));
    if let Some(reason) = &reply.trace.reason {
        output.push_str(&format!("\n[fallback: {}]", reason));
    }
    output
}

/// Format a recorded session for display.
pub fn format_transcript(transcript: &SessionTranscript) -> String {
    let mut output = format!(
        "SESSION {}\n  Created: {}\n  Messages: {}\n",
        transcript.session.session_id,
        format_time(&transcript.session.created_at),
        transcript.messages.len()
    );
    output.push_str(&"-".repeat(40));
    for message in &transcript.messages {
        output.push_str(&format!(
            "\n[{}] {}",
            format_time(&message.timestamp),
            message.role.as_str()
        ));
        if let Some(source) = message.source {
            output.push_str(&format!(" ({})", source.as_str()));
        }
        output.push_str(&format!("\n{}\n", message.content));
    }
    output
}

/// Format server status for display.
pub fn format_health(health: &HealthStatus) -> String {
    format!(
        "Status: {}\n  Version: {}\n  Cloud: {}\n  Storage: {}\n  Cache entries: {}\n  Agent configured: {}",
        health.status,
        health.version,
        health.cloud,
        health.storage,
        health.cache_entries,
        if health.agent_configured { "yes" } else { "no" }
    )
}

/// Format connectivity probes for display.
pub fn format_probes(report: &DebugReport) -> String {
    let mut output = format!("PROBES (request {})\n", report.request_id);
    output.push_str(&"-".repeat(40));
    for (name, probe) in &report.tests {
        output.push_str(&format!("\n{:<22} {}", name, probe.status));
        for (key, value) in &probe.details {
            let value = value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string());
            output.push_str(&format!("\n  {}: {}", key, value));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::health::ProbeResult;
    use chrono::TimeZone;
    use concierge_core::agent::ResponseMetadata;
    use concierge_core::chat::{ChatRole, ChatTrace, ReplySource};
    use concierge_core::session::{ChatSession, MessageRecord};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn test_tool_response_without_summary_falls_back_to_json() {
        let response = ToolResponse::success(
            Operation::ResourceDetails.name(),
            json!("unexpected shape"),
            ResponseMetadata::new("req-1", at(0)),
        );
        let output = format_tool_response(Operation::ResourceDetails, &response);
        assert_eq!(output, "\"unexpected shape\"");
    }

    #[test]
    fn test_chat_reply_shows_fallback_reason() {
        let reply = ChatReply {
            response: "Hello".to_string(),
            session_id: "session-1".to_string(),
            citations: Vec::new(),
            trace: ChatTrace::fallback("Agent not configured"),
            model: "demo (simulated)".to_string(),
            timestamp: at(0),
        };
        let output = format_chat_reply(&reply);
        assert!(output.starts_with("Hello\n\n[demo (simulated) | session session-1]"));
        assert!(output.ends_with("[fallback: Agent not configured]"));
    }

    #[test]
    fn test_transcript_lists_messages() {
        let transcript = SessionTranscript {
            session: ChatSession::new("session-1", at(0), 7),
            messages: vec![
                MessageRecord::new("session-1", ChatRole::User, "hi", at(1), 7),
                MessageRecord::new("session-1", ChatRole::Assistant, "hello", at(2), 7)
                    .with_source(ReplySource::Agent),
            ],
        };
        let output = format_transcript(&transcript);
        assert!(output.contains("Messages: 2"));
        assert!(output.contains("1970-01-01 00:00:01 UTC] user\nhi"));
        assert!(output.contains("assistant (agent)\nhello"));
    }

    #[test]
    fn test_probes_output() {
        let report = DebugReport {
            request_id: "req-1".to_string(),
            tests: BTreeMap::from([(
                "ec2_access".to_string(),
                ProbeResult {
                    status: "SUCCESS".to_string(),
                    details: BTreeMap::from([("region".to_string(), json!("us-east-1"))]),
                },
            )]),
        };
        let output = format_probes(&report);
        assert!(output.contains("ec2_access"));
        assert!(output.contains("SUCCESS"));
        assert!(output.contains("  region: us-east-1"));
    }
}
