//! Functional core for tutorias.
//!
//! Domain types, pure operations and the storage contracts shared by every
//! backend. Nothing in this crate performs I/O.

pub mod kv;
pub mod storage;
pub mod tutoring;
