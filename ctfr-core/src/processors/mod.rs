//! Processors of a single polling run.
//!
//! - `EventSource`: fetches the upcoming events for the query horizon
//! - `eligibility`: decides whether an event is a notification candidate
//! - `StateStore`: loads and atomically saves the `NotificationRecord`
//! - `OrganizerLookup`: resolves an organizer to a social handle
//! - `message`: renders notification text within the length budget
//! - `Notifier`: posts notifications, for real or as a dry run
//! - `NotificationEngine`: drives the per-event state machine

pub mod decision_engine;
pub mod eligibility;
pub mod event_source;
pub mod message;
pub mod notifier;
pub mod organizer_lookup;
pub mod state_store;

pub use decision_engine::{NotificationEngine, RunError, RunReport, next_transition};
pub use eligibility::is_eligible;
pub use event_source::{CtftimeEventSource, EventSource, SourceError};
pub use notifier::{DryRunNotifier, NotifyError, Notifier, TwitterNotifier};
pub use organizer_lookup::{CtftimeOrganizerLookup, LookupError, NoOrganizerLookup, OrganizerLookup};
pub use state_store::{JsonFileStateStore, StateStore, StoreError};
