//! Eligibility Filter.

use crate::entities::Event;

/// Whether an event is a candidate for notification at all.
///
/// True iff the event starts strictly after `now`, is not on-site and is
/// open to everyone.
pub fn is_eligible(event: &Event, now: time::OffsetDateTime) -> bool {
    event.start_time > now && !event.is_onsite && event.access_restriction.is_open()
}
