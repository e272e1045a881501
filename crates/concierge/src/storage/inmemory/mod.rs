//! In-memory session storage.
//!
//! Sessions and messages live in `HashMap`s behind `Arc<RwLock<_>>`. Useful
//! for the demo and for tests; nothing survives a restart.

mod repository;

pub use repository::InMemorySessionRepository;
