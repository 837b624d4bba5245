use time::macros::format_description;

/// How long before an event's start its reminder becomes due.
pub const REMINDER_WINDOW: time::Duration = time::Duration::hours(24);

/// Default forward window queried from the listing.
pub const DEFAULT_HORIZON: time::Duration = time::Duration::days(365);

/// Returns true if `start` is less than `window` away from `now`.
///
/// Already started events (negative distance) count as within the window.
pub fn starts_within(
    start: time::OffsetDateTime,
    now: time::OffsetDateTime,
    window: time::Duration,
) -> bool {
    start - now < window
}

/// Render a start time as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_start(start: time::OffsetDateTime) -> String {
    let utc = start.to_offset(time::UtcOffset::UTC);
    utc.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second] UTC"
    ))
        .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_starts_within() {
        let now = datetime!(2026-10-18 12:00 UTC);
        assert!(starts_within(now + time::Duration::hours(20), now, REMINDER_WINDOW));
        assert!(starts_within(now + time::Duration::minutes(1), now, REMINDER_WINDOW));
        assert!(!starts_within(now + time::Duration::hours(24), now, REMINDER_WINDOW));
        assert!(!starts_within(now + time::Duration::days(10), now, REMINDER_WINDOW));
    }

    #[test]
    fn test_format_start_converts_to_utc() {
        assert_eq!(
            format_start(datetime!(2026-10-31 12:00:05 UTC)),
            "2026-10-31 12:00:05 UTC"
        );
        assert_eq!(
            format_start(datetime!(2026-12-01 08:30 +01:00)),
            "2026-12-01 07:30:00 UTC"
        );
    }
}
