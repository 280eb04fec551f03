//! tutorias - storage facade for the tutoring scheduler.
//!
//! Picks a backend at startup ([`backend::select_backend`]) and exposes every
//! persistence call through [`service::TutoringService`].

pub mod backend;
pub mod cli;
pub mod config;
pub mod output;
pub mod seed;
pub mod service;
pub mod storage;

pub use backend::{select_backend, BackendKind, Platform, SelectedBackend};
pub use config::Config;
pub use service::TutoringService;
