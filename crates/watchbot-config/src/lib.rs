//! # Watchbot Config
//!
//! Configuration management for watchbot: the TOML schema, a loader with
//! `.env` and `${VAR}` support, and a validator.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{
    ConfigValidator, MAX_INTERVAL_SECS, MAX_PING_DELAY_SECS, MAX_POLL_TIMEOUT_SECS,
    MAX_PROBE_TIMEOUT_SECS, ValidationError, ValidationResult, ValidationWarning,
};
