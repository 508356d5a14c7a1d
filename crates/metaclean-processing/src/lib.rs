//! Metaclean Processing Library
//!
//! Metadata rewrite engines, per-request temporary file staging, and the
//! clearing pipeline that ties them together.

pub mod clearer;
pub mod engine;
pub mod exiftool;
pub mod factory;
pub mod native;
pub mod staging;

pub use clearer::{CleanedFile, ClearError, MetadataClearer};
pub use engine::{EngineError, MetadataEngine};
pub use exiftool::ExifToolEngine;
pub use factory::create_engine;
pub use native::NativeEngine;
pub use staging::{sanitize_filename, StagedFile, StagingArea};
