//! Tool operations, parameters and errors shared by the REST API and the
//! Bedrock action group.

mod error;
mod operation;
mod params;

pub use error::{Result, ToolError};
pub use operation::Operation;
pub use params::ToolParams;

/// Region used when a request does not name one.
pub const DEFAULT_REGION: &str = "us-east-1";
