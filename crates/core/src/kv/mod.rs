//! Contracts for the key-value storage tier.
//!
//! Each [`Table`](crate::storage::Table) is one key whose value is the JSON
//! array of all its records.

mod error;
mod serialization;
mod traits;

pub use error::{Result, StoreError};
pub use serialization::{decode_table, encode_table};
pub use traits::KeyValueStore;
