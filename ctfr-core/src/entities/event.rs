//! Normalized CTF event as seen by the decision engine.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Stable identifier of an event within the listing service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to the organizing team, resolved to a handle on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrganizerRef(pub u64);

impl std::fmt::Display for OrganizerRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Social media handle, always starting with `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(CompactString);

impl Handle {
    /// Normalize a raw handle or account name, prefixing `@` when missing.
    ///
    /// Returns `None` for names that are empty after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_start_matches('@');
        if name.is_empty() {
            return None;
        }
        let mut handle = CompactString::with_capacity(name.len() + 1);
        handle.push('@');
        handle.push_str(name);
        Some(Self(handle))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who may take part in an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AccessRestriction {
    /// Anyone may register.
    Open,
    /// A known participation restriction (prequalified, invited, academic…).
    Restricted(CompactString),
    /// A value the listing service introduced that is not recognized.
    Other(CompactString),
}

impl AccessRestriction {
    const KNOWN_RESTRICTIONS: &[&str] = &[
        "Prequalified",
        "Invited",
        "Academic",
        "High-school",
        "Individual",
    ];

    /// Map the listing's `restrictions` string.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == "Open" {
            return AccessRestriction::Open;
        }
        if Self::KNOWN_RESTRICTIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(raw))
        {
            AccessRestriction::Restricted(raw.into())
        } else {
            AccessRestriction::Other(raw.into())
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, AccessRestriction::Open)
    }
}

/// An upcoming event, immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    /// Start time in UTC.
    pub start_time: time::OffsetDateTime,
    pub is_onsite: bool,
    pub access_restriction: AccessRestriction,
    /// Event page on the listing service.
    pub detail_url: String,
    pub logo_url: Option<String>,
    pub organizer_ref: Option<OrganizerRef>,
}
