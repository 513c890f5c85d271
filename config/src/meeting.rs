use derive_more::{
    Deref,
    Display,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::borrow::Borrow;
use strum::{
    EnumIter,
    EnumString,
};

/// Identifier of a meeting user. Live participants use the same value as their identity.
#[derive(Debug, Default, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl ToString) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Session lifecycle state of a roster entry, as the meeting service reports it.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    strum::Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CallStatus {
    #[default]
    Calling,
    InCall,
    Hangup,
    Kicked,
    NoAnswer,
    Completed,
}

impl CallStatus {
    /// States from which a participant does not come back without a fresh connect event.
    pub const TERMINAL: [CallStatus; 4] = [
        CallStatus::Hangup,
        CallStatus::Kicked,
        CallStatus::NoAnswer,
        CallStatus::Completed,
    ];

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }
}

/// A participant as known by the meeting roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterParticipant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: CallStatus,
    pub user_id: UserId,
}

impl RosterParticipant {
    pub fn new(id: impl ToString, name: impl ToString, status: CallStatus) -> Self {
        let id = id.to_string();
        Self {
            user_id: UserId::new(&id),
            id,
            name: name.to_string(),
            status,
        }
    }
}

#[derive(Debug, Clone, Copy, strum::Display, EnumIter, EnumString, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FeedEventKind {
    Connect,
    Disconnect,
}

/// One scripted event of the simulated live feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    /// Offset from the start of the session.
    pub after_ms: u64,
    pub event: FeedEventKind,
    pub identity: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr as _;
    use strum::IntoEnumIterator as _;

    #[test]
    fn terminal_statuses() {
        let terminal = CallStatus::iter().filter(|s| s.is_terminal()).collect::<Vec<_>>();
        assert_eq!(terminal, CallStatus::TERMINAL.to_vec());
        assert!(!CallStatus::InCall.is_terminal());
        assert!(!CallStatus::Calling.is_terminal());
    }

    #[test]
    fn status_names_match_the_meeting_service() {
        assert_eq!(CallStatus::NoAnswer.to_string(), "NO_ANSWER");
        assert_eq!(CallStatus::from_str("IN_CALL").unwrap(), CallStatus::InCall);
        assert_eq!(serde_yml::to_string(&CallStatus::Hangup).unwrap().trim(), "HANGUP");
    }

    #[test]
    fn roster_participant_from_yaml() {
        let yaml = "id: '7'\nname: septintas\nstatus: KICKED\nuser_id: '7'\n";
        let participant: RosterParticipant = serde_yml::from_str(yaml).unwrap();
        assert_eq!(participant, RosterParticipant::new("7", "septintas", CallStatus::Kicked));
    }
}
