//! Result cache abstractions.

mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{operation_from_key, tool_key};
pub use serialization::{deserialize_value, serialize_value};
pub use traits::Cache;
