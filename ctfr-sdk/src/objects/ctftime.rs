//! Objects returned by the CTFtime public API (`/api/v1/events/`).

use serde::{Deserialize, Serialize};

/// Query parameters of the event listing endpoint.
///
/// `start` and `finish` are unix timestamps bounding the event start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EventListQuery {
    pub limit: u32,
    pub start: i64,
    pub finish: i64,
}

/// One entry of the event listing.
///
/// Only the fields the bot relies on are modelled; unknown fields are
/// ignored. `logo` and `organizers` are frequently empty upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtftimeEvent {
    /// Identifier of this particular event (unique per edition).
    pub id: u64,
    /// Identifier of the CTF series, shared by every edition.
    pub ctf_id: u64,
    pub title: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start: time::OffsetDateTime,
    pub onsite: bool,
    /// Participation restriction, `"Open"` for unrestricted events.
    pub restrictions: String,
    pub ctftime_url: String,
    /// Logo URL, the empty string when the event has none.
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub organizers: Vec<CtftimeOrganizer>,
}

/// An organizing team as referenced from an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtftimeOrganizer {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"[
      {
        "organizers": [{"id": 10498, "name": "th3jackers"}],
        "onsite": false,
        "finish": "2026-11-02T12:00:00+00:00",
        "description": "Yearly jeopardy CTF.",
        "weight": 24.5,
        "title": "Example CTF 2026",
        "url": "https://example-ctf.org",
        "restrictions": "Open",
        "format": "Jeopardy",
        "start": "2026-10-31T12:00:00+00:00",
        "ctftime_url": "https://ctftime.org/event/2871/",
        "logo": "",
        "id": 2871,
        "ctf_id": 1010
      },
      {
        "onsite": true,
        "title": "Finals",
        "restrictions": "Invited",
        "start": "2026-12-01T08:30:00+01:00",
        "ctftime_url": "https://ctftime.org/event/2900/",
        "id": 2900,
        "ctf_id": 1010
      }
    ]"#;

    #[test]
    fn test_listing_parsing() {
        let events: Vec<CtftimeEvent> = serde_json::from_str(LISTING).unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.id, 2871);
        assert_eq!(first.ctf_id, 1010);
        assert_eq!(first.restrictions, "Open");
        assert!(first.logo.is_empty());
        assert_eq!(first.organizers[0].id, 10498);
        assert_eq!(first.start.unix_timestamp(), 1_793_448_000);

        let second = &events[1];
        assert!(second.organizers.is_empty());
        assert_eq!(second.start.offset().whole_hours(), 1);
    }

    #[test]
    fn test_malformed_listing_is_rejected() {
        let missing_start = r#"[{"id": 1, "ctf_id": 1, "title": "x", "onsite": false,
            "restrictions": "Open", "ctftime_url": "u"}]"#;
        assert!(serde_json::from_str::<Vec<CtftimeEvent>>(missing_start).is_err());

        let bad_start = r#"[{"id": 1, "ctf_id": 1, "title": "x", "start": "tomorrow",
            "onsite": false, "restrictions": "Open", "ctftime_url": "u"}]"#;
        assert!(serde_json::from_str::<Vec<CtftimeEvent>>(bad_start).is_err());

        assert!(serde_json::from_str::<Vec<CtftimeEvent>>("{'id': 1}").is_err());
    }
}
