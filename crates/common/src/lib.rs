//! Codereel Common Utilities
//!
//! Shared infrastructure for all Codereel crates:
//! - Error types and result aliases
//! - Clock and timing utilities for frame stamping
//! - Tracing/logging initialization
//! - Persisted user settings

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
