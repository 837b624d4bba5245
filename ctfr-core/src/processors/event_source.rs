//! Event Source Adapter.
//!
//! Fetches the events starting between `now` and `now + horizon` from the
//! listing service and normalizes them into [`Event`]s, preserving the
//! listing order.

use crate::config::{EventKey, SourceConfig};
use crate::entities::{AccessRestriction, Event, EventId, OrganizerRef};
use async_trait::async_trait;
use ctfr_sdk::client::{ClientError, CtftimeClient};
use ctfr_sdk::objects::{CtftimeEvent, EventListQuery};
use thiserror::Error;
use tracing::{debug, error};

/// Errors that can occur while fetching the event window.
///
/// Every variant means the listing is unavailable for this run.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The listing responded with a non-success status.
    #[error("listing responded with status {status}")]
    Unavailable { status: u16 },

    /// Transport failure.
    #[error("listing request failed: {0}")]
    Request(ClientError),

    /// The response body is not a well-formed event listing.
    #[error("listing response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),

    /// `now + horizon` is not a representable instant.
    #[error("query window of {horizon} from {now} is out of range")]
    WindowOutOfRange {
        now: time::OffsetDateTime,
        horizon: time::Duration,
    },
}

impl From<ClientError> for SourceError {
    fn from(value: ClientError) -> Self {
        match value {
            ClientError::Api { status, .. } => SourceError::Unavailable {
                status: status.as_u16(),
            },
            ClientError::Json(e) => SourceError::Decode(e),
            other => SourceError::Request(other),
        }
    }
}

/// Trait for event listing implementations.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetch every event starting within the configured horizon of `now`.
    async fn fetch_window(&self, now: time::OffsetDateTime) -> Result<Vec<Event>, SourceError>;
}

/// Event source backed by the CTFtime API.
pub struct CtftimeEventSource {
    client: CtftimeClient,
    horizon: time::Duration,
    limit: u32,
    event_key: EventKey,
}

impl CtftimeEventSource {
    /// Create a new CtftimeEventSource.
    ///
    /// # Arguments
    ///
    /// * `client` - CTFtime client carrying the configured `User-Agent`
    /// * `config` - Horizon, result limit and identifier field
    pub fn new(client: CtftimeClient, config: &SourceConfig) -> Self {
        Self {
            client,
            horizon: config.horizon,
            limit: config.limit,
            event_key: config.event_key,
        }
    }
}

#[async_trait]
impl EventSource for CtftimeEventSource {
    async fn fetch_window(&self, now: time::OffsetDateTime) -> Result<Vec<Event>, SourceError> {
        let finish = now
            .checked_add(self.horizon)
            .ok_or(SourceError::WindowOutOfRange {
                now,
                horizon: self.horizon,
            })?;
        let query = EventListQuery {
            limit: self.limit,
            start: now.unix_timestamp(),
            finish: finish.unix_timestamp(),
        };

        debug!(
            start = query.start,
            finish = query.finish,
            limit = query.limit,
            "Querying event listing"
        );

        let raw = self.client.fetch_events(query).await.map_err(|e| {
            let e = SourceError::from(e);
            error!(error = %e, "Event listing unavailable");
            e
        })?;

        let events: Vec<Event> = raw
            .into_iter()
            .map(|event| normalize(event, self.event_key))
            .collect();

        debug!(count = events.len(), "Fetched event listing");

        Ok(events)
    }
}

/// Convert a listing entry into an [`Event`].
pub fn normalize(raw: CtftimeEvent, key: EventKey) -> Event {
    let id = match key {
        EventKey::Event => raw.id,
        EventKey::Ctf => raw.ctf_id,
    };
    let logo_url = Some(raw.logo.trim().to_string()).filter(|logo| !logo.is_empty());
    let organizer_ref = raw.organizers.first().map(|org| OrganizerRef(org.id));

    Event {
        id: EventId(id),
        title: raw.title,
        start_time: raw.start.to_offset(time::UtcOffset::UTC),
        is_onsite: raw.onsite,
        access_restriction: AccessRestriction::parse(&raw.restrictions),
        detail_url: raw.ctftime_url,
        logo_url,
        organizer_ref,
    }
}
