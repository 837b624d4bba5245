//! Organizer handle lookup.
//!
//! The listing does not expose organizers' social accounts, so the handle is
//! scraped from the organizer's profile page. Page markup changes break this
//! silently; every failure degrades to "no handle".

use crate::entities::{Handle, OrganizerRef};
use async_trait::async_trait;
use ctfr_sdk::client::{ClientError, CtftimeClient};
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum LookupError {
    /// Profile page could not be fetched.
    #[error("profile page request failed: {0}")]
    Request(#[from] ClientError),

    /// A handle pattern failed to compile.
    #[error("invalid handle pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Resolves an organizer reference to a social handle.
#[async_trait]
pub trait OrganizerLookup: Send + Sync {
    /// `Ok(None)` when the organizer has no recognizable handle.
    async fn lookup(&self, organizer: OrganizerRef) -> Result<Option<Handle>, LookupError>;
}

/// Lookup that never finds a handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrganizerLookup;

#[async_trait]
impl OrganizerLookup for NoOrganizerLookup {
    async fn lookup(&self, _organizer: OrganizerRef) -> Result<Option<Handle>, LookupError> {
        Ok(None)
    }
}

/// Patterns locating the Twitter handle on a CTFtime team page.
#[derive(Debug, Clone)]
pub struct HandleExtractor {
    row: Regex,
    link: Regex,
    plain: Regex,
}

impl HandleExtractor {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            row: Regex::new(r"<p>Twitter: (.*?)</p>")?,
            link: Regex::new(r"(?:^|[/.])(?:twitter|x)\.com/@?([A-Za-z0-9_]{1,15})")?,
            plain: Regex::new(r"^@?[A-Za-z0-9_]{1,15}$")?,
        })
    }

    /// Extract the handle from a profile page.
    ///
    /// The `Twitter:` row either links to the account or holds the bare
    /// name, with or without a leading `@`.
    pub fn extract(&self, page: &str) -> Option<Handle> {
        let Some(row) = self.row.captures(page).and_then(|c| c.get(1)) else {
            debug!("No Twitter row on profile page");
            return None;
        };
        let row = row.as_str().trim();
        debug!(row, "Found Twitter row");

        if let Some(name) = self.link.captures(row).and_then(|c| c.get(1)) {
            return Handle::new(name.as_str());
        }
        if self.plain.is_match(row) {
            return Handle::new(row);
        }
        None
    }
}

/// Lookup scraping CTFtime team pages.
pub struct CtftimeOrganizerLookup {
    client: CtftimeClient,
    extractor: HandleExtractor,
}

impl CtftimeOrganizerLookup {
    pub fn new(client: CtftimeClient) -> Result<Self, LookupError> {
        Ok(Self {
            client,
            extractor: HandleExtractor::new()?,
        })
    }
}

#[async_trait]
impl OrganizerLookup for CtftimeOrganizerLookup {
    async fn lookup(&self, organizer: OrganizerRef) -> Result<Option<Handle>, LookupError> {
        debug!(organizer = %organizer, "Fetching organizer profile page");

        let page = self.client.fetch_team_page(organizer.0).await?;
        let handle = self.extractor.extract(&page);

        if let Some(handle) = &handle {
            info!(organizer = %organizer, handle = %handle, "Resolved organizer handle");
        }

        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(page: &str) -> Option<String> {
        HandleExtractor::new()
            .unwrap()
            .extract(page)
            .map(|h| h.as_str().to_string())
    }

    #[test]
    fn test_link_row() {
        let page = r#"<div><p>Twitter: <a href="https://twitter.com/th3jackers">https://twitter.com/th3jackers</a></p></div>"#;
        assert_eq!(extract(page).as_deref(), Some("@th3jackers"));
    }

    #[test]
    fn test_x_link_row() {
        let page = r#"<p>Twitter: <a href="https://x.com/pwn_team">x</a></p>"#;
        assert_eq!(extract(page).as_deref(), Some("@pwn_team"));
    }

    #[test]
    fn test_plain_rows() {
        assert_eq!(extract("<p>Twitter: @redrocket</p>").as_deref(), Some("@redrocket"));
        assert_eq!(extract("<p>Twitter: redrocket</p>").as_deref(), Some("@redrocket"));
    }

    #[test]
    fn test_missing_or_unrecognized_row() {
        assert_eq!(extract("<p>Website: https://example.org</p>"), None);
        assert_eq!(extract("<p>Twitter: </p>"), None);
        assert_eq!(
            extract(r#"<p>Twitter: <a href="https://mastodon.social/@team">m</a></p>"#),
            None
        );
    }

    #[test]
    fn test_first_row_wins() {
        let page = "<p>Twitter: first</p><p>Twitter: second</p>";
        assert_eq!(extract(page).as_deref(), Some("@first"));
    }

    #[tokio::test]
    async fn test_no_lookup_finds_nothing() {
        assert!(NoOrganizerLookup.lookup(OrganizerRef(1)).await.unwrap().is_none());
    }
}
