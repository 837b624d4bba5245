//! TOML file configuration structures.
//!
//! These structs directly map to the `ctfr-config.toml` file format.

use crate::config::runtime::EventKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub bot: BotSection,
    #[serde(default)]
    pub source: SourceSection,
    /// Twitter credentials, required in production mode.
    #[serde(default)]
    pub twitter: Option<TwitterSection>,
}

/// Bot configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotSection {
    /// Post for real instead of printing.
    #[serde(default)]
    pub production: bool,
    /// Where the notification record is kept.
    #[serde(default = "default_state_path")]
    pub state_path: PathBuf,
    /// Optional file receiving a copy of the logs.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    /// `User-Agent` for every outbound request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            production: false,
            state_path: default_state_path(),
            log_file: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Event listing section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    #[serde(default = "default_events_url")]
    pub events_url: Url,
    #[serde(default = "default_team_url")]
    pub team_url: Url,
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub event_key: EventKey,
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            events_url: default_events_url(),
            team_url: default_team_url(),
            horizon_days: default_horizon_days(),
            limit: default_limit(),
            event_key: EventKey::default(),
        }
    }
}

/// Twitter API credentials of the posting account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TwitterSection {
    #[serde(default)]
    pub consumer_key: String,
    #[serde(default)]
    pub consumer_secret: String,
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub access_token_secret: String,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("./ctfreminder-db.json")
}

fn default_user_agent() -> String {
    format!("ctf-reminder-bot/{}", env!("CARGO_PKG_VERSION"))
}

fn default_events_url() -> Url {
    Url::parse("https://ctftime.org/api/v1/events/").expect("valid default events url")
}

fn default_team_url() -> Url {
    Url::parse("https://ctftime.org/team/").expect("valid default team url")
}

fn default_horizon_days() -> u32 {
    365
}

fn default_limit() -> u32 {
    1000
}
