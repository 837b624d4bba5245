pub mod event;
pub mod notification;
pub mod notification_record;

pub use event::{AccessRestriction, Event, EventId, Handle, OrganizerRef};
pub use notification::{NotificationKind, Transition};
pub use notification_record::NotificationRecord;
