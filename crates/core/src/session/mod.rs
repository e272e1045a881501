mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::SessionRepository;
pub use types::{
    expiry_epoch, live_messages, sort_messages, ChatSession, MessageRecord, SessionTranscript,
    DEFAULT_TTL_DAYS, MAX_TTL_DAYS,
};
