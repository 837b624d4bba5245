//! Which events have been announced and which have been reminded about.

use super::event::EventId;
use super::notification::Transition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Persistent notification state of every event ever seen.
///
/// Invariant: `reminder_sent ⊆ new_announced`. Both sets only ever grow.
///
/// Serialized as `{"mentioned_once": [...], "mentioned_twice": [...]}`,
/// the layout of existing state files; `new_announced` and `reminder_sent`
/// are accepted as field names on read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "mentioned_once", alias = "new_announced")]
    new_announced: BTreeSet<EventId>,
    #[serde(rename = "mentioned_twice", alias = "reminder_sent")]
    reminder_sent: BTreeSet<EventId>,
}

impl NotificationRecord {
    /// The empty record of a fresh deployment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from raw sets, restoring the subset invariant.
    pub fn from_sets(
        new_announced: impl IntoIterator<Item = EventId>,
        reminder_sent: impl IntoIterator<Item = EventId>,
    ) -> Self {
        let mut record = Self {
            new_announced: new_announced.into_iter().collect(),
            reminder_sent: reminder_sent.into_iter().collect(),
        };
        record.repair();
        record
    }

    pub fn is_announced(&self, id: EventId) -> bool {
        self.new_announced.contains(&id)
    }

    pub fn is_reminded(&self, id: EventId) -> bool {
        self.reminder_sent.contains(&id)
    }

    pub fn new_announced(&self) -> &BTreeSet<EventId> {
        &self.new_announced
    }

    pub fn reminder_sent(&self) -> &BTreeSet<EventId> {
        &self.reminder_sent
    }

    /// Record a committed transition. Returns `false` if it was already
    /// recorded.
    pub fn apply(&mut self, id: EventId, transition: Transition) -> bool {
        match transition {
            Transition::Announce => self.new_announced.insert(id),
            Transition::Remind => {
                // A reminder implies the announcement.
                self.new_announced.insert(id);
                self.reminder_sent.insert(id)
            }
        }
    }

    /// Add every reminded id that is missing from the announced set.
    ///
    /// Returns the ids that had to be added. Adding only ever suppresses
    /// notifications.
    pub fn repair(&mut self) -> Vec<EventId> {
        let missing: Vec<EventId> = self
            .reminder_sent
            .difference(&self.new_announced)
            .copied()
            .collect();
        self.new_announced.extend(missing.iter().copied());
        missing
    }

    pub fn is_consistent(&self) -> bool {
        self.reminder_sent.is_subset(&self.new_announced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_layout_round_trip() {
        let json = r#"{"mentioned_once": [3, 1, 2, 2], "mentioned_twice": [1]}"#;
        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.new_announced().len(), 3);
        assert!(record.is_reminded(EventId(1)));

        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"mentioned_once":[1,2,3],"mentioned_twice":[1]}"#
        );
    }

    #[test]
    fn test_alias_field_names() {
        let json = r#"{"new_announced": [7], "reminder_sent": []}"#;
        let record: NotificationRecord = serde_json::from_str(json).unwrap();
        assert!(record.is_announced(EventId(7)));
        assert!(!record.is_reminded(EventId(7)));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        assert!(serde_json::from_str::<NotificationRecord>(r#"{"mentioned_once": []}"#).is_err());
        assert!(serde_json::from_str::<NotificationRecord>(r#"{"mentioned_once": ["a"], "mentioned_twice": []}"#).is_err());
    }

    #[test]
    fn test_repair_restores_subset() {
        let mut record: NotificationRecord =
            serde_json::from_str(r#"{"mentioned_once": [1], "mentioned_twice": [1, 5]}"#).unwrap();
        assert!(!record.is_consistent());
        assert_eq!(record.repair(), vec![EventId(5)]);
        assert!(record.is_consistent());
        assert!(record.is_announced(EventId(5)));
        assert!(record.repair().is_empty());
    }

    #[test]
    fn test_apply_is_idempotent() {
        let mut record = NotificationRecord::new();
        assert!(record.apply(EventId(9), Transition::Announce));
        assert!(!record.apply(EventId(9), Transition::Announce));
        assert!(record.apply(EventId(9), Transition::Remind));
        assert!(!record.apply(EventId(9), Transition::Remind));
        assert!(record.is_consistent());
    }

    #[test]
    fn test_from_sets_repairs() {
        let record = NotificationRecord::from_sets([EventId(1)], [EventId(2)]);
        assert!(record.is_consistent());
        assert!(record.is_announced(EventId(2)));
    }
}
