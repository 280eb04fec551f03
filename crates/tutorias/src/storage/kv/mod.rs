//! Key-value storage backends.
//!
//! - [`MemoryStore`]: process memory, always available
//! - [`LocalStore`]: a directory of JSON files, the local-storage tier
//! - `RedisStore` (feature `redis`): the async key-value tier
//!
//! [`KvRepository`] turns any of them into a full `TutoringStore`.

mod local;
mod memory;
#[cfg(feature = "redis")]
mod redis_store;
mod repository;

pub use local::LocalStore;
pub use memory::MemoryStore;
#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
pub use repository::KvRepository;
