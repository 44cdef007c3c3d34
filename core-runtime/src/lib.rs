//! # Runtime Support
//!
//! Shared bootstrap for Waveline binaries: structured logging configuration
//! over `tracing-subscriber`. Kept separate from the service crates so tests
//! and future binaries initialize logging the same way.

pub mod error;
pub mod logging;

pub use error::{Error, Result};
pub use logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
