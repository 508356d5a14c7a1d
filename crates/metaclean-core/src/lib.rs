//! Metaclean Core Library
//!
//! This crate provides the error taxonomy, configuration and small shared helpers
//! used by the processing and API crates.

pub mod config;
pub mod engine_kind;
pub mod error;
pub mod time;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use engine_kind::EngineKind;
pub use error::{AppError, ErrorMetadata, LogLevel};
