//! Tether Core - Shared types for reachability probing
//!
//! This crate provides the foundational types for the Tether system:
//! - Probe policy (attempt budget and per-attempt timeout)
//! - Probe events delivered to presenters
//! - Error taxonomy for terminal probe failures
//! - TOML configuration model and loading

pub mod config;
pub mod error;
pub mod event;
pub mod policy;

pub use config::{load_config, CheckConfig, CheckMethod, Config, ConfigError, ProbeConfig};
pub use error::ProbeError;
pub use event::ProbeEvent;
pub use policy::{ProbePolicy, DEFAULT_ATTEMPT_COUNT, DEFAULT_ATTEMPT_TIMEOUT_MS, ECHO_PORT};
