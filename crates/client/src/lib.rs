//! concierge_client - CLI client for the concierge API.

pub mod cli;
pub mod client;
pub mod error;
pub mod interactive;
pub mod output;

pub use client::ConciergeClient;
pub use error::{ClientError, Result};
