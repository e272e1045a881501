//! Chat requests and replies, the agent fallback and the client-side reducer.

mod fallback;
mod reducer;
mod types;

pub use fallback::{fallback_reason, fallback_reply, simulated_model, Topic, SIMULATED_SUFFIX};
pub use reducer::{chunk_words, reduce, ChatAction, ChatPhase, ChatState, DEFAULT_CHUNK_WORDS};
pub use types::{
    new_session_id, ChatError, ChatMessage, ChatMetadata, ChatReply, ChatRequest, ChatResponse,
    ChatRole, ChatTrace, ReplySource, ValidChatRequest,
};
