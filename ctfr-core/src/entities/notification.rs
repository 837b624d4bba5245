/// The two kinds of outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// First announcement of an event.
    NewEvent,
    /// The event starts within the reminder window.
    Reminder,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::NewEvent => write!(f, "new_event"),
            NotificationKind::Reminder => write!(f, "reminder"),
        }
    }
}

/// A state change of a single event: `UNSEEN -> ANNOUNCED -> REMINDED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// `UNSEEN -> ANNOUNCED`
    Announce,
    /// `ANNOUNCED -> REMINDED`
    Remind,
}

impl Transition {
    /// The notification that must succeed before the transition commits.
    pub fn notification(self) -> NotificationKind {
        match self {
            Transition::Announce => NotificationKind::NewEvent,
            Transition::Remind => NotificationKind::Reminder,
        }
    }
}
