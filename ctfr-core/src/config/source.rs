//! Event listing settings.

use serde::{Deserialize, Serialize};
use url::Url;

/// Which listing field identifies an event in the notification record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKey {
    /// The per-edition event id (`id`).
    #[default]
    Event,
    /// The CTF series id (`ctf_id`), shared across editions. State files of
    /// older deployments are keyed this way.
    Ctf,
}

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// The event listing endpoint.
    pub events_url: Url,
    /// Prefix of organizer profile pages; must end with `/`.
    pub team_url: Url,
    /// How far ahead to query.
    pub horizon: time::Duration,
    /// Maximum number of events requested per run.
    pub limit: u32,
    pub event_key: EventKey,
}
