use crate::tui::{
    layout::header_summary_and_table,
    widgets::TextInput,
    Action,
    ActivateAction,
    Component,
    Theme,
};
use color_eyre::Result;
use crossterm::event::{
    KeyCode,
    KeyEvent,
};
use ratatui::{
    layout::{
        Constraint,
        Rect,
    },
    style::{
        Color,
        Style,
    },
    text::Line,
    widgets::{
        Block,
        Borders,
        Cell,
        Row,
        Table,
    },
    Frame,
};
use roster_simulator_reconciler::{
    DisplayEntry,
    RosterView,
};
use strum::Display;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq, Display, serde::Serialize, serde::Deserialize)]
pub(crate) enum ParticipantsAction {
    MoveUp,
    MoveDown,
    StartConnect,
}

/// Table of the merged roster, in display order.
#[derive(Debug)]
pub struct Participants {
    focused: bool,
    visible: bool,
    view: watch::Receiver<RosterView>,
    selected: Option<String>,
    connect_input: Option<TextInput>,
}

impl Participants {
    pub(crate) fn new(view: watch::Receiver<RosterView>) -> Self {
        Self {
            focused: true,
            visible: true,
            view,
            selected: None,
            connect_input: None,
        }
    }

    fn identities(&self) -> Vec<String> {
        self.view
            .borrow()
            .entries
            .iter()
            .map(|entry| entry.display_identity.to_string())
            .collect()
    }

    fn selected_entry(&self) -> Option<DisplayEntry> {
        let selected = self.selected.as_deref()?;
        self.view.borrow().entry(selected).cloned()
    }

    fn move_up(&mut self) {
        let keys = self.identities();
        self.selected = match self.selected.as_ref().and_then(|key| keys.iter().position(|x| x == key)) {
            Some(index) if index > 0 => keys.get(index - 1).cloned(),
            Some(_) => None,
            None => keys.last().cloned(),
        };
    }

    fn move_down(&mut self) {
        let keys = self.identities();
        self.selected = match self.selected.as_ref().and_then(|key| keys.iter().position(|x| x == key)) {
            Some(index) if index + 1 < keys.len() => keys.get(index + 1).cloned(),
            Some(_) => None,
            None => keys.first().cloned(),
        };
    }

    /// Drops the selection once its participant has left the merged view.
    fn sync_selection(&mut self) {
        if let Some(selected) = &self.selected {
            if self.view.borrow().entry(selected).is_none() {
                self.selected = self.identities().first().cloned();
            }
        }
    }

    fn handle_connect_input(&mut self, mut input: TextInput, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Enter => input.finish().map(Action::ManualConnect),
            KeyCode::Esc => None,
            _ => {
                input.handle_key_event(key);
                self.connect_input = Some(input);
                None
            }
        }
    }
}

impl Component for Participants {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn is_focused(&self) -> bool {
        self.focused
    }

    fn is_editing(&self) -> bool {
        self.connect_input.is_some()
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        match action {
            Action::Activate(ActivateAction::Participants) => {
                self.focused = true;
                self.visible = true;
            }
            Action::Activate(_) => {
                self.focused = false;
                self.visible = false;
                self.connect_input = None;
            }
            Action::Render => self.sync_selection(),
            Action::ParticipantsAction(inner) => match inner {
                ParticipantsAction::MoveUp => self.move_up(),
                ParticipantsAction::MoveDown => self.move_down(),
                ParticipantsAction::StartConnect => {
                    self.connect_input = Some(TextInput::new(" Connect user ", "roster user id"));
                }
            },
            _ => {}
        }
        Ok(None)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(input) = self.connect_input.take() {
            return Ok(self.handle_connect_input(input, key));
        }

        let selected = self.selected_entry();
        let action = match (key.code, selected) {
            (KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d'), Some(entry)) if entry.is_removable => {
                Some(Action::ManualDisconnect(entry.display_identity.to_string()))
            }
            (KeyCode::Char('r'), Some(entry)) if !entry.is_live => {
                Some(Action::ManualConnect(entry.display_identity.to_string()))
            }
            (KeyCode::Char('c'), _) => Some(Action::ParticipantsAction(ParticipantsAction::StartConnect)),

            // navigation
            (KeyCode::Up | KeyCode::Char('k'), _) => Some(Action::ParticipantsAction(ParticipantsAction::MoveUp)),
            (KeyCode::Down | KeyCode::Char('j'), _) => Some(Action::ParticipantsAction(ParticipantsAction::MoveDown)),

            _ => None,
        };

        Ok(action)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let theme = Theme::default();
        let [_, _, area] = header_summary_and_table(area)?;

        let help = match self.selected_entry() {
            Some(entry) if entry.is_removable && !entry.is_live => {
                " <del> to disconnect, <r>econnect, <c>onnect a user "
            }
            Some(entry) if entry.is_removable => " <del> to disconnect, <c>onnect a user ",
            Some(entry) if !entry.is_live => " <r>econnect, <c>onnect a user ",
            _ => " <c>onnect a user, <up>/<down> to select ",
        };

        let view = self.view.borrow();
        if view.entries.is_empty() {
            let empty = Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(self.focused))
                .title("No participants")
                .title_bottom(Line::from(help).centered());
            frame.render_widget(empty, area);
        } else {
            let header_cells = ["Identity", "Participant", "Status", "Presence", "Removal"]
                .iter()
                .map(|h| Cell::from(*h).style(Style::default().fg(Color::White)));
            let header = Row::new(header_cells)
                .style(Style::default().bg(Color::DarkGray).fg(Color::White))
                .height(1);

            let rows: Vec<Row> = view
                .entries
                .iter()
                .map(|entry| {
                    let identity = if entry.is_local_viewer {
                        format!("{} (you)", entry.display_identity)
                    } else {
                        entry.display_identity.to_string()
                    };
                    let cells = vec![
                        Cell::from(identity),
                        Cell::from(entry.label.clone()),
                        Cell::from(entry.status.to_string()).style(theme.status(entry.status)),
                        Cell::from(if entry.is_live { "live" } else { "offline" }),
                        Cell::from(format_removal(entry)),
                    ];
                    let style = if Some(entry.display_identity.as_str()) == self.selected.as_deref() {
                        theme.text_selected
                    } else if entry.is_live {
                        theme.text_default
                    } else {
                        theme.text_offline
                    };
                    Row::new(cells).style(style).height(1)
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Percentage(15), // Identity
                    Constraint::Percentage(40), // Participant
                    Constraint::Percentage(15), // Status
                    Constraint::Percentage(15), // Presence
                    Constraint::Percentage(15), // Removal
                ],
            )
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(theme.border(self.focused))
                    .title("Participants")
                    .title_bottom(Line::from(help).centered()),
            )
            .column_spacing(1);

            frame.render_widget(table, area);
        }
        drop(view);

        if let Some(input) = &self.connect_input {
            input.draw(frame, area);
        }

        Ok(())
    }
}

fn format_removal(entry: &DisplayEntry) -> &'static str {
    match (entry.removal_pending, entry.is_removable) {
        (true, _) => "pending",
        (false, true) => "[x]",
        (false, false) => "[ ]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use roster_simulator_config::{
        CallStatus,
        ReconcilerConfig,
        RosterParticipant,
    };
    use roster_simulator_reconciler::{
        LiveParticipant,
        Reconciler,
    };

    fn view() -> RosterView {
        let mut reconciler = Reconciler::new(
            ReconcilerConfig::new("3"),
            vec![
                RosterParticipant::new("1", "pirmas", CallStatus::Calling),
                RosterParticipant::new("2", "antras", CallStatus::InCall),
                RosterParticipant::new("3", "trecias", CallStatus::InCall),
            ],
            0,
        );
        reconciler.on_participant_connect(LiveParticipant::synthesized("2"), 0);
        reconciler.on_participant_connect(LiveParticipant::synthesized("3"), 0);
        reconciler.view(0)
    }

    fn press(participants: &mut Participants, code: KeyCode) -> Option<Action> {
        let action = participants
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
            .unwrap();
        // Component-local actions come back through `update`, like the app loop does.
        if let Some(Action::ParticipantsAction(_)) = &action {
            participants.update(action.clone().unwrap()).unwrap();
        }
        action
    }

    #[test]
    fn selection_walks_the_display_order() {
        let (_tx, rx) = watch::channel(view());
        let mut participants = Participants::new(rx);

        press(&mut participants, KeyCode::Down);
        assert_eq!(participants.selected.as_deref(), Some("1"));
        press(&mut participants, KeyCode::Down);
        press(&mut participants, KeyCode::Down);
        assert_eq!(participants.selected.as_deref(), Some("3"));
        press(&mut participants, KeyCode::Down);
        assert_eq!(participants.selected, None);
        press(&mut participants, KeyCode::Up);
        assert_eq!(participants.selected.as_deref(), Some("3"));
    }

    #[test]
    fn delete_disconnects_removable_participants_only() {
        let (_tx, rx) = watch::channel(view());
        let mut participants = Participants::new(rx);

        participants.selected = Some("2".to_string());
        assert_eq!(
            press(&mut participants, KeyCode::Delete),
            Some(Action::ManualDisconnect("2".to_string()))
        );

        participants.selected = Some("3".to_string());
        assert_eq!(press(&mut participants, KeyCode::Delete), None);
    }

    #[test]
    fn reconnect_only_for_offline_entries() {
        let (_tx, rx) = watch::channel(view());
        let mut participants = Participants::new(rx);

        participants.selected = Some("1".to_string());
        assert_eq!(
            press(&mut participants, KeyCode::Char('r')),
            Some(Action::ManualConnect("1".to_string()))
        );

        participants.selected = Some("2".to_string());
        assert_eq!(press(&mut participants, KeyCode::Char('r')), None);
    }

    #[test]
    fn connect_popup_emits_the_typed_user() {
        let (_tx, rx) = watch::channel(view());
        let mut participants = Participants::new(rx);

        press(&mut participants, KeyCode::Char('c'));
        assert!(participants.is_editing());
        // keys go to the editor while it is open
        assert_eq!(press(&mut participants, KeyCode::Char('d')), None);
        press(&mut participants, KeyCode::Backspace);
        press(&mut participants, KeyCode::Char('4'));

        assert_eq!(
            press(&mut participants, KeyCode::Enter),
            Some(Action::ManualConnect("4".to_string()))
        );
        assert!(!participants.is_editing());
    }

    #[test]
    fn selection_follows_the_view() {
        let (tx, rx) = watch::channel(view());
        let mut participants = Participants::new(rx);
        participants.selected = Some("1".to_string());

        tx.send_modify(|view| view.entries.retain(|entry| entry.display_identity.as_str() != "1"));
        participants.update(Action::Render).unwrap();

        assert_eq!(participants.selected.as_deref(), Some("2"));
    }
}
