//! Storage backend implementations.
//!
//! This module provides concrete implementations of the repository traits
//! defined in `tutorias_core::storage`. Unlike a single compile-time choice,
//! several backends can be compiled in and the selector in
//! [`crate::backend`] picks one at startup.
//!
//! # Feature Flags
//!
//! - `sqlite` (default): SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//! - `redis`: Redis key-value store using the `redis` crate
//!
//! The in-memory and local-storage key-value stores are always available.

pub mod kv;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod conformance;
