//! Bedrock Agent action-group protocol: events in, envelopes out.

mod envelope;
mod errors;
mod event;

pub use envelope::{
    ActionGroupResponse, ActionResponse, ResponseBody, ResponseMetadata, ToolResponse,
    MESSAGE_VERSION, RESPONSE_VERSION,
};
pub use errors::{classify_error, tool_error_to_status_code, ErrorInfo, ErrorSeverity};
pub use event::{ActionGroupEvent, BodyContent, EventParameter, EventParameters, RequestBody};
