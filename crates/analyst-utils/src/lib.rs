//! Shared utilities for the stock analyst bot
//!
//! Logging setup and environment-variable helpers used by the bot binary and
//! its configuration layer.

pub mod config;
pub mod logging;

pub use config::{ConfigError, Environment, env_or, env_parse, require_env};
pub use logging::{LogFormat, init_tracing};
