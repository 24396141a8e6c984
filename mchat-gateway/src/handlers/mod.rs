//! HTTP request handlers for the session gateway

pub mod config;
pub mod health;
pub mod session;
pub mod types;

pub use config::*;
pub use health::*;
pub use session::*;
pub use types::*;
