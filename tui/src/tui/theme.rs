use ratatui::style::{
    Color,
    Modifier,
    Style,
};
use roster_simulator_config::CallStatus;

#[derive(Clone, Copy, Debug)]
pub(super) struct Theme {
    pub(super) default: Style,
    pub(super) text_default: Style,
    pub(super) text_selected: Style,
    pub(super) text_offline: Style,
    pub(super) border_focused: Style,
    pub(super) border_unfocused: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            default: Style::default().bg(Color::Black).fg(Color::Gray),
            text_default: Style::default(),
            text_selected: Style::default().fg(Color::Yellow),
            text_offline: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            border_focused: Style::default().fg(Color::White),
            border_unfocused: Style::default().fg(Color::DarkGray),
        }
    }
}

impl Theme {
    pub(super) fn border(&self, focused: bool) -> Style {
        if focused {
            self.border_focused
        } else {
            self.border_unfocused
        }
    }

    pub(super) fn status(&self, status: CallStatus) -> Style {
        match status {
            CallStatus::Calling => Style::default().fg(Color::Cyan),
            CallStatus::InCall => Style::default().fg(Color::Green),
            CallStatus::Hangup | CallStatus::NoAnswer => Style::default().fg(Color::Red),
            CallStatus::Kicked => Style::default().fg(Color::Magenta),
            CallStatus::Completed => Style::default().fg(Color::Gray),
        }
    }
}
