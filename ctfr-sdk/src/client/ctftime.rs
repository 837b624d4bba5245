//! CTFtime client (event listing and team pages).

use reqwest::Client;
use url::Url;

use super::{ClientError, ensure_success, parse_response};
use crate::objects::ctftime::{CtftimeEvent, EventListQuery};

/// Typed HTTP client for the public CTFtime site and API.
///
/// CTFtime rejects requests without a descriptive `User-Agent`, so the
/// `reqwest::Client` passed in should carry one (see
/// [`build_http_client`](super::build_http_client)).
#[derive(Debug, Clone)]
pub struct CtftimeClient {
    http: Client,
    events_url: Url,
    team_url: Url,
}

impl CtftimeClient {
    pub const EVENTS_URL: &str = "https://ctftime.org/api/v1/events/";
    pub const TEAM_URL: &str = "https://ctftime.org/team/";

    /// Create a new `CtftimeClient`.
    ///
    /// * `events_url` – the event listing endpoint.
    /// * `team_url` – prefix of team profile pages; the team id is appended.
    pub fn new(http: Client, events_url: Url, team_url: Url) -> Self {
        Self {
            http,
            events_url,
            team_url,
        }
    }

    /// `GET /api/v1/events/?limit=&start=&finish=` – events starting inside
    /// the given unix-timestamp window, in listing order.
    pub async fn fetch_events(&self, query: EventListQuery) -> Result<Vec<CtftimeEvent>, ClientError> {
        let resp = self
            .http
            .get(self.events_url.clone())
            .query(&query)
            .send()
            .await?;

        parse_response(resp).await
    }

    /// `GET /team/{id}` – the raw HTML of a team profile page.
    pub async fn fetch_team_page(&self, team_id: u64) -> Result<String, ClientError> {
        let url = self.team_url.join(&team_id.to_string())?;

        let resp = self.http.get(url).send().await?;
        let resp = ensure_success(resp).await?;
        Ok(resp.text().await?)
    }
}
