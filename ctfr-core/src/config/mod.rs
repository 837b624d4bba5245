//! Configuration types for the CTF reminder.
//!
//! These types represent the validated runtime configuration handed to the
//! processors' constructors. The actual config loading/parsing is handled
//! by the binary crate.

mod bot;
mod source;

pub use bot::BotConfig;
pub use ctfr_sdk::oauth::OAuthCredentials as TwitterCredentials;
pub use source::{EventKey, SourceConfig};

/// Everything a single run needs.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bot: BotConfig,
    pub source: SourceConfig,
    /// Present whenever the bot runs in production mode.
    pub twitter: Option<TwitterCredentials>,
}
