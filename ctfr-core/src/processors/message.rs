//! Notification text.
//!
//! Messages must fit [`MAX_MESSAGE_CHARS`]. When the full message (title,
//! organizer handle, start time) is too long, a minimal message with only
//! the event URL (and the start time for new events) is used instead.

use crate::entities::{Event, Handle, NotificationKind};
use crate::utils::time_window::format_start;

/// Character budget of a single post.
pub const MAX_MESSAGE_CHARS: usize = 140;

/// Render the notification text for `event`.
pub fn compose(kind: NotificationKind, event: &Event, handle: Option<&Handle>) -> String {
    let full = match kind {
        NotificationKind::NewEvent => new_event(event, handle),
        NotificationKind::Reminder => reminder(event, handle),
    };
    if fits(&full) {
        return full;
    }
    match kind {
        NotificationKind::NewEvent => format!(
            "New CTF, starts {}. {}",
            format_start(event.start_time),
            event.detail_url
        ),
        NotificationKind::Reminder => format!("Starting in less than 24h: {}", event.detail_url),
    }
}

/// Whether `text` fits the post budget.
pub fn fits(text: &str) -> bool {
    text.chars().count() <= MAX_MESSAGE_CHARS
}

fn new_event(event: &Event, handle: Option<&Handle>) -> String {
    let start = format_start(event.start_time);
    match handle {
        Some(handle) => format!(
            "New CTF: {} by {}, starts {}. {}",
            event.title, handle, start, event.detail_url
        ),
        None => format!("New CTF: {}, starts {}. {}", event.title, start, event.detail_url),
    }
}

fn reminder(event: &Event, handle: Option<&Handle>) -> String {
    match handle {
        Some(handle) => format!(
            "Reminder: {} by {} starts in less than 24h! {}",
            event.title, handle, event.detail_url
        ),
        None => format!(
            "Reminder: {} starts in less than 24h! {}",
            event.title, event.detail_url
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccessRestriction, EventId};
    use time::macros::datetime;

    fn event(title: &str) -> Event {
        Event {
            id: EventId(2871),
            title: title.to_string(),
            start_time: datetime!(2026-10-31 12:00 UTC),
            is_onsite: false,
            access_restriction: AccessRestriction::Open,
            detail_url: "https://ctftime.org/event/2871/".to_string(),
            logo_url: None,
            organizer_ref: None,
        }
    }

    #[test]
    fn test_new_event_with_handle() {
        let handle = Handle::new("team").unwrap();
        assert_eq!(
            compose(NotificationKind::NewEvent, &event("Example CTF"), Some(&handle)),
            "New CTF: Example CTF by @team, starts 2026-10-31 12:00:00 UTC. https://ctftime.org/event/2871/"
        );
    }

    #[test]
    fn test_new_event_without_handle() {
        assert_eq!(
            compose(NotificationKind::NewEvent, &event("Example CTF"), None),
            "New CTF: Example CTF, starts 2026-10-31 12:00:00 UTC. https://ctftime.org/event/2871/"
        );
    }

    #[test]
    fn test_reminder_variants() {
        let handle = Handle::new("@team").unwrap();
        assert_eq!(
            compose(NotificationKind::Reminder, &event("Example CTF"), Some(&handle)),
            "Reminder: Example CTF by @team starts in less than 24h! https://ctftime.org/event/2871/"
        );
        assert_eq!(
            compose(NotificationKind::Reminder, &event("Example CTF"), None),
            "Reminder: Example CTF starts in less than 24h! https://ctftime.org/event/2871/"
        );
    }

    #[test]
    fn test_long_title_falls_back_to_minimal_message() {
        let long = event(&"A very long CTF name ".repeat(6));
        let new = compose(NotificationKind::NewEvent, &long, None);
        assert_eq!(
            new,
            "New CTF, starts 2026-10-31 12:00:00 UTC. https://ctftime.org/event/2871/"
        );
        assert!(fits(&new));

        let reminder = compose(NotificationKind::Reminder, &long, None);
        assert_eq!(reminder, "Starting in less than 24h: https://ctftime.org/event/2871/");
    }

    #[test]
    fn test_budget_counts_chars_not_bytes() {
        let text = "é".repeat(MAX_MESSAGE_CHARS);
        assert!(fits(&text));
        assert!(!fits(&format!("{text}é")));
    }

    #[test]
    fn test_handle_can_push_message_over_budget() {
        // 140 - len("New CTF: , starts 2026-10-31 12:00:00 UTC. https://ctftime.org/event/2871/")
        let title = "x".repeat(140 - 74);
        assert_eq!(
            compose(NotificationKind::NewEvent, &event(&title), None).chars().count(),
            140
        );
        let handle = Handle::new("organizer").unwrap();
        assert!(
            compose(NotificationKind::NewEvent, &event(&title), Some(&handle))
                .starts_with("New CTF, starts")
        );
    }
}
