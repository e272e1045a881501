//! Audit trail emitted through `tracing` under the `audit` target.
//!
//! Every record is one log line carrying `event_type`, `request_id` and the
//! JSON `details`. Filter with `RUST_LOG=audit=info` to get only the trail.

use chrono::Utc;

use concierge_core::agent::ErrorSeverity;
use concierge_core::audit::{AuditEvent, AuditLevel, AuditRecord};

/// Audit logger bound to one request.
#[derive(Debug, Clone)]
pub struct AuditLog {
    request_id: String,
}

impl AuditLog {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn record(&self, event: AuditEvent) {
        record(Some(&self.request_id), event);
    }
}

/// Emits one audit record.
pub fn record(request_id: Option<&str>, event: AuditEvent) {
    let event_type = event.event_type().as_str();
    let level = event.level();
    let alert = matches!(
        event,
        AuditEvent::ErrorOccurred {
            severity: ErrorSeverity::Error,
            ..
        }
    );
    let record = AuditRecord::new(request_id, Utc::now(), event);
    let details = match serde_json::to_string(&record) {
        Ok(json) => json,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to serialize audit record");
            return;
        }
    };
    let request_id = request_id.unwrap_or("-");

    match level {
        AuditLevel::Info => {
            tracing::info!(target: "audit", event_type, request_id, %details, "audit event")
        }
        AuditLevel::Warn => {
            tracing::warn!(target: "audit", event_type, request_id, %details, "audit event")
        }
        AuditLevel::Error => {
            tracing::error!(target: "audit", event_type, request_id, %details, alert, "audit event")
        }
    }
}
