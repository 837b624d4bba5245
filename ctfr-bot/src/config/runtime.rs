//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `ctfr-core::config`.
//! This module re-exports them for convenience.

pub use ctfr_core::config::{
    BotConfig, EventKey, RuntimeConfig, SourceConfig, TwitterCredentials,
};
