//! Metaclean API Library
//!
//! HTTP handlers, request extraction and application setup for the
//! metadata-clearing service.

pub mod constants;
pub mod error;
mod handlers;
pub mod setup;
pub mod state;
mod telemetry;
mod utils;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
