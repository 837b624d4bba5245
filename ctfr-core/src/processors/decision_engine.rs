//! Notification Decision Engine.
//!
//! Every event id moves through `UNSEEN -> ANNOUNCED -> REMINDED`:
//!
//! 1. `UNSEEN -> ANNOUNCED` as soon as an eligible event is first seen.
//! 2. `ANNOUNCED -> REMINDED` once the event starts within the reminder
//!    window.
//!
//! A transition commits only after its notification was posted, and the
//! record is persisted right after each commit. A crash between posting and
//! persisting can therefore duplicate a notification on the next run but
//! never lose one. Both transitions can fire for one event in the same run.
//!
//! The record is append-only: an event that later becomes ineligible keeps
//! its recorded state.

use crate::entities::{Event, EventId, Handle, NotificationKind, NotificationRecord, Transition};
use crate::processors::eligibility::is_eligible;
use crate::processors::event_source::{EventSource, SourceError};
use crate::processors::message::compose;
use crate::processors::notifier::Notifier;
use crate::processors::organizer_lookup::OrganizerLookup;
use crate::processors::state_store::{StateStore, StoreError};
use crate::utils::time_window::{REMINDER_WINDOW, starts_within};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The persisted record is unreadable. Nothing was posted.
    #[error("notification state is corrupt: {0}")]
    CorruptState(#[source] StoreError),

    /// The persisted record could not be read. Nothing was posted.
    #[error("failed to load notification state: {0}")]
    LoadState(#[source] StoreError),

    /// The event listing could not be fetched. Nothing was posted.
    #[error("event source unavailable: {0}")]
    SourceUnavailable(#[from] SourceError),

    /// A committed transition could not be persisted.
    #[error("failed to persist notification state: {0}")]
    Persist(#[source] StoreError),
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Events returned by the listing.
    pub fetched: usize,
    /// Events skipped by the eligibility filter.
    pub ineligible: usize,
    /// Events announced in this run, in processing order.
    pub announced: Vec<EventId>,
    /// Events reminded about in this run, in processing order.
    pub reminded: Vec<EventId>,
    /// Notifications that failed to post and will be retried next run.
    pub failed: Vec<(EventId, NotificationKind)>,
}

impl RunReport {
    /// Number of notifications posted.
    pub fn posted(&self) -> usize {
        self.announced.len() + self.reminded.len()
    }
}

/// The next transition due for `event`, if any.
pub fn next_transition(
    record: &NotificationRecord,
    event: &Event,
    now: time::OffsetDateTime,
    reminder_window: time::Duration,
) -> Option<Transition> {
    if record.is_reminded(event.id) {
        return None;
    }
    if !record.is_announced(event.id) {
        return Some(Transition::Announce);
    }
    if starts_within(event.start_time, now, reminder_window) {
        return Some(Transition::Remind);
    }
    None
}

/// Runs one polling pass over the event listing.
pub struct NotificationEngine<S, N, L, St> {
    source: S,
    notifier: N,
    lookup: L,
    store: St,
    reminder_window: time::Duration,
}

impl<S, N, L, St> NotificationEngine<S, N, L, St>
where
    S: EventSource,
    N: Notifier,
    L: OrganizerLookup,
    St: StateStore,
{
    /// Create a new NotificationEngine with the 24 hour reminder window.
    pub fn new(source: S, notifier: N, lookup: L, store: St) -> Self {
        Self {
            source,
            notifier,
            lookup,
            store,
            reminder_window: REMINDER_WINDOW,
        }
    }

    pub fn with_reminder_window(mut self, reminder_window: time::Duration) -> Self {
        self.reminder_window = reminder_window;
        self
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    /// Run one pass at time `now`.
    ///
    /// Fails only if the record cannot be loaded or persisted, or if the
    /// listing is unavailable. Per-event posting failures are reported in
    /// [`RunReport::failed`] and retried on the next run.
    pub async fn run(&self, now: time::OffsetDateTime) -> Result<RunReport, RunError> {
        info!("Reading notification record");
        let mut record = self.store.load().map_err(|e| {
            if e.is_corrupt() {
                RunError::CorruptState(e)
            } else {
                RunError::LoadState(e)
            }
        })?;

        info!("Fetching upcoming events");
        let events = self.source.fetch_window(now).await?;

        let mut report = RunReport {
            fetched: events.len(),
            ..RunReport::default()
        };

        // The listing is oldest-appearing-last; process it reversed.
        for event in events.iter().rev() {
            if !is_eligible(event, now) {
                debug!(event_id = %event.id, title = %event.title, "Skipping ineligible event");
                report.ineligible += 1;
                continue;
            }
            self.process_event(event, now, &mut record, &mut report)
                .await?;
        }

        info!(
            fetched = report.fetched,
            ineligible = report.ineligible,
            announced = report.announced.len(),
            reminded = report.reminded.len(),
            failed = report.failed.len(),
            "Run complete"
        );

        Ok(report)
    }

    /// Fire every due transition of a single eligible event.
    async fn process_event(
        &self,
        event: &Event,
        now: time::OffsetDateTime,
        record: &mut NotificationRecord,
        report: &mut RunReport,
    ) -> Result<(), RunError> {
        // Resolved at most once per event and run.
        let mut handle: Option<Option<Handle>> = None;

        while let Some(transition) = next_transition(record, event, now, self.reminder_window) {
            let kind = transition.notification();

            if handle.is_none() {
                handle = Some(self.resolve_handle(event).await);
            }
            let text = compose(kind, event, handle.as_ref().and_then(Option::as_ref));

            info!(event_id = %event.id, title = %event.title, kind = %kind, "Posting notification");

            let posted = match &event.logo_url {
                Some(logo_url) => self.notifier.post_with_image(&text, logo_url).await,
                None => self.notifier.post(&text).await,
            };

            if let Err(e) = posted {
                error!(
                    event_id = %event.id,
                    kind = %kind,
                    error = %e,
                    "Notification failed, will retry next run"
                );
                report.failed.push((event.id, kind));
                return Ok(());
            }

            record.apply(event.id, transition);
            self.store.save(record).map_err(RunError::Persist)?;

            match transition {
                Transition::Announce => report.announced.push(event.id),
                Transition::Remind => report.reminded.push(event.id),
            }
        }

        Ok(())
    }

    async fn resolve_handle(&self, event: &Event) -> Option<Handle> {
        let organizer = event.organizer_ref?;
        match self.lookup.lookup(organizer).await {
            Ok(handle) => handle,
            Err(e) => {
                warn!(
                    event_id = %event.id,
                    organizer = %organizer,
                    error = %e,
                    "Organizer lookup failed, continuing without handle"
                );
                None
            }
        }
    }
}
