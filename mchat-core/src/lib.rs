//! Mchat Core - shared data structures for the session gateway
//!
//! Domain types, configuration, the error type and the logging bootstrap.
//! Nothing in here depends on an HTTP framework.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
