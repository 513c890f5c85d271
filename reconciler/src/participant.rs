use derive_more::Display;
use roster_simulator_config::{
    CallStatus,
    RosterParticipant,
    UserId,
};
use serde::{
    Deserialize,
    Serialize,
};

/// A participant currently present on the live connection feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveParticipant {
    pub identity: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl LiveParticipant {
    pub fn new(identity: impl Into<UserId>, session_id: Option<String>) -> Self {
        Self {
            identity: identity.into(),
            session_id,
        }
    }

    /// Connect event made up on behalf of a roster participant, e.g. when the viewer connects
    /// someone by id.
    pub fn synthesized(identity: impl Into<UserId>) -> Self {
        let identity = identity.into();
        let session_id = Some(format!("sid_{identity}"));
        Self { identity, session_id }
    }
}

/// A roster participant that is shown without being on the live feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineParticipant {
    pub user_id: UserId,
}

/// One entry of the merged roster.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum VideoParticipant {
    #[display("live:{}", _0.identity)]
    Live(LiveParticipant),
    #[display("offline:{}", _0.user_id)]
    Offline(OfflineParticipant),
}

impl VideoParticipant {
    pub fn display_identity(&self) -> &UserId {
        match self {
            VideoParticipant::Live(participant) => &participant.identity,
            VideoParticipant::Offline(participant) => &participant.user_id,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, VideoParticipant::Live(_))
    }
}

/// What the view layer renders for a merged participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    pub display_identity: UserId,
    pub label: String,
    pub status: CallStatus,
    pub is_live: bool,
    pub is_local_viewer: bool,
    /// Whether the viewer may force a disconnect of this participant.
    pub is_removable: bool,
    pub removal_pending: bool,
}

impl DisplayEntry {
    pub(crate) fn new(
        participant: &VideoParticipant,
        info: &RosterParticipant,
        local_viewer: &UserId,
        removal_pending: bool,
    ) -> Self {
        let is_local_viewer = participant.display_identity() == local_viewer;
        Self {
            display_identity: participant.display_identity().clone(),
            label: format!("{}:{} ({})", info.id, info.name, info.status),
            status: info.status,
            is_live: participant.is_live(),
            is_local_viewer,
            is_removable: !info.status.is_terminal() && !is_local_viewer,
            removal_pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_identity_of_both_shapes() {
        let live = VideoParticipant::Live(LiveParticipant::synthesized("2"));
        let offline = VideoParticipant::Offline(OfflineParticipant { user_id: "1".into() });

        assert_eq!(live.display_identity(), &UserId::from("2"));
        assert_eq!(offline.display_identity(), &UserId::from("1"));
        assert_eq!(live.to_string(), "live:2");
        assert_eq!(offline.to_string(), "offline:1");
    }

    #[test]
    fn synthesized_session_id() {
        assert_eq!(LiveParticipant::synthesized("5").session_id.as_deref(), Some("sid_5"));
    }

    #[test]
    fn terminal_and_local_entries_are_not_removable() {
        let viewer = UserId::from("3");
        let hung_up = RosterParticipant::new("1", "pirmas", CallStatus::Hangup);
        let in_call = RosterParticipant::new("2", "antras", CallStatus::InCall);
        let me = RosterParticipant::new("3", "trecias", CallStatus::InCall);

        let entry = DisplayEntry::new(
            &VideoParticipant::Offline(OfflineParticipant { user_id: "1".into() }),
            &hung_up,
            &viewer,
            true,
        );
        assert_eq!(entry.label, "1:pirmas (HANGUP)");
        assert!(!entry.is_removable);
        assert!(entry.removal_pending);

        let entry = DisplayEntry::new(
            &VideoParticipant::Live(LiveParticipant::synthesized("2")),
            &in_call,
            &viewer,
            false,
        );
        assert!(entry.is_removable);
        assert!(entry.is_live);

        let entry = DisplayEntry::new(
            &VideoParticipant::Live(LiveParticipant::synthesized("3")),
            &me,
            &viewer,
            false,
        );
        assert!(entry.is_local_viewer);
        assert!(!entry.is_removable);
    }
}
