use super::components::participants::ParticipantsAction;
use serde::{
    Deserialize,
    Serialize,
};
use serde_yml::with::singleton_map_recursive;
use strum::Display;

#[derive(Display, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Quit,
    ClearScreen,
    Error(String),

    Activate(ActivateAction),
    FocusNext,

    #[allow(clippy::enum_variant_names)]
    #[serde(with = "singleton_map_recursive")]
    #[allow(private_interfaces)]
    ParticipantsAction(ParticipantsAction),

    /// Bring a roster user into the live list, see `RosterSession::manual_connect`.
    ManualConnect(String),
    /// Force a participant out of the live list, see `RosterSession::manual_disconnect`.
    ManualDisconnect(String),
}

#[derive(Display, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivateAction {
    Participants,
    Logs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn actions_survive_yaml() {
        for action in [
            Action::Activate(ActivateAction::Logs),
            Action::ManualDisconnect("2".to_string()),
            Action::ParticipantsAction(ParticipantsAction::MoveDown),
        ] {
            let yaml = serde_yml::to_string(&action).unwrap();
            let parsed: Action = serde_yml::from_str(&yaml).unwrap();
            assert_eq!(parsed, action);
        }
    }

    #[test]
    fn display_uses_the_variant_name() {
        assert_eq!(Action::ManualConnect("4".to_string()).to_string(), "ManualConnect");
        assert_eq!(Action::FocusNext.to_string(), "FocusNext");
    }
}
