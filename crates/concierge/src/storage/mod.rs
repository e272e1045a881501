//! Session storage backends.
//!
//! Implements `concierge_core::session::SessionRepository`. The backend is
//! selected at compile time:
//!
//! - `inmemory` (default): process-local maps, lost on restart
//! - `dynamodb`: single-table DynamoDB with a `ttl` attribute
//!
//! ```bash
//! cargo build -p concierge --no-default-features --features dynamodb,demo
//! ```

#[cfg(all(feature = "inmemory", feature = "dynamodb"))]
compile_error!(
    "Features 'inmemory' and 'dynamodb' are mutually exclusive. \
    Enable only one session storage backend at a time."
);

#[cfg(not(any(feature = "inmemory", feature = "dynamodb")))]
compile_error!(
    "No session storage backend selected. Enable 'inmemory' or 'dynamodb' feature. \
    Example: cargo build -p concierge --features inmemory"
);

#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "dynamodb")]
pub mod dynamodb;

#[cfg(any(feature = "inmemory", test))]
pub use inmemory::InMemorySessionRepository;

#[cfg(feature = "dynamodb")]
pub use dynamodb::DynamoDbSessionRepository;
