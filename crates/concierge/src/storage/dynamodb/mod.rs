//! DynamoDB session storage.
//!
//! Single-table layout, one partition per session:
//!
//! | item    | PK              | SK                                 |
//! |---------|-----------------|------------------------------------|
//! | session | `SESSION#<id>`  | `META`                             |
//! | message | `SESSION#<id>`  | `MSG#<rfc3339 timestamp>#<msg id>` |
//!
//! Items carry a numeric `ttl` attribute so DynamoDB expires them on its own.

mod conversions;
mod error;
mod keys;
mod repository;

pub use repository::DynamoDbSessionRepository;
