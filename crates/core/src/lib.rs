//! concierge_core - functional core for the AWS AI concierge.
//!
//! Pure domain logic for cost, security and inventory tooling, the chat
//! fallback and reducer, session records, Bedrock action-group envelopes and
//! audit classification. I/O lives behind the async traits in [`cloud`],
//! [`session`] and [`cache`]; implementations live in the server crate.

pub mod agent;
pub mod audit;
pub mod cache;
pub mod chat;
pub mod cloud;
pub mod cost;
pub mod inventory;
pub mod security;
pub mod serde;
pub mod session;
pub mod summary;
pub mod tool;

/// Rounds a monetary or percentage value to two decimals.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
