use crate::{
    participant::DisplayEntry,
    pending::{
        PendingRemoval,
        Timestamp,
    },
};
use roster_simulator_config::UserId;
use serde::Serialize;

/// Read-only snapshot of a roster, published to the view layer after every trigger.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RosterView {
    /// Session time the snapshot was taken at.
    pub now: Timestamp,
    pub entries: Vec<DisplayEntry>,
    pub live: Vec<UserId>,
    pub pending: Vec<PendingRemoval>,
    pub removed: Vec<UserId>,
    pub next_removal_at: Option<Timestamp>,
    /// Set once the scripted live feed has delivered all of its events.
    pub feed_finished: bool,
}

impl RosterView {
    pub fn identities(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.display_identity.as_str()).collect()
    }

    pub fn entry(&self, identity: &str) -> Option<&DisplayEntry> {
        self.entries
            .iter()
            .find(|entry| entry.display_identity.as_str() == identity)
    }

    /// Nothing is left to happen without outside input.
    pub fn is_settled(&self) -> bool {
        self.feed_finished && self.next_removal_at.is_none()
    }
}
