pub mod agent;
pub mod chat;
pub mod debug;
pub mod error;
pub mod health;
pub mod sessions;
pub mod tools;

pub use error::AppError;

use uuid::Uuid;

use crate::audit::AuditLog;

/// Audit log for a new request with a fresh request id.
fn request_audit() -> AuditLog {
    AuditLog::new(Uuid::new_v4().to_string())
}
