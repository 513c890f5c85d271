use super::{
    action::Action,
    components::{
        header::Header,
        logs::Logs,
        participants::Participants,
        summary::Summary,
        Component,
    },
    tui::{
        Event,
        Tui,
    },
    ActivateAction,
};
use color_eyre::Result;
use crossterm::event::{
    KeyCode,
    KeyEvent,
    KeyModifiers,
};
use ratatui::prelude::Rect;
use roster_simulator_config::{
    Args,
    Config,
};
use roster_simulator_reconciler::RosterSession;
use serde::{
    Deserialize,
    Serialize,
};
use tokio::sync::mpsc;

pub struct App {
    config: Config,
    session: RosterSession,
    components: Vec<Box<dyn Component>>,
    focused: FocusedTopLevelComponent,
    should_quit: bool,
}

#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusedTopLevelComponent {
    #[default]
    Participants,
    Logs,
}

impl FocusedTopLevelComponent {
    fn next(self) -> Self {
        match self {
            Self::Participants => Self::Logs,
            Self::Logs => Self::Participants,
        }
    }

    fn activate(self) -> ActivateAction {
        match self {
            Self::Participants => ActivateAction::Participants,
            Self::Logs => ActivateAction::Logs,
        }
    }
}

type ActionSender = mpsc::UnboundedSender<Action>;
type ActionReceiver = mpsc::UnboundedReceiver<Action>;

impl App {
    pub fn new(args: Args) -> Result<Self> {
        let config = Config::new(args)?;
        let session = RosterSession::spawn(&config)?;
        info!(viewer = %session.local_viewer(), roster = config.roster.len(), "Roster session started");

        Ok(Self {
            components: vec![
                Box::new(Participants::new(session.view.clone())),
                Box::new(Header::new(
                    session.local_viewer().clone(),
                    session.created,
                    session.view.clone(),
                )),
                Box::new(Summary::new(
                    config.reconciler_config().removal_delay,
                    session.view.clone(),
                )),
                Box::new(Logs::new()),
            ],
            focused: FocusedTopLevelComponent::default(),
            should_quit: false,
            session,
            config,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?
            .tick_rate(self.config.tick_rate)
            .frame_rate(self.config.frame_rate);
        tui.enter()?;

        let (action_tx, mut action_rx) = mpsc::unbounded_channel();

        let config = self.config.clone();
        let size = tui.size()?;
        for component in self.components.iter_mut() {
            component.register_action_handler(action_tx.clone())?;
            component.register_config_handler(config.clone())?;
            component.init(size)?;
        }

        loop {
            self.handle_events(&mut tui, action_tx.clone()).await?;
            self.handle_actions(&mut tui, action_tx.clone(), &mut action_rx)?;
            if self.should_quit {
                tui.stop()?;
                break;
            }
        }
        tui.exit()?;
        self.session.close();

        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui, action_tx: ActionSender) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            action_tx.send(Action::Quit)?;
            return Ok(());
        };
        match event {
            Event::Init => action_tx.send(Action::Activate(self.focused.activate()))?,
            Event::Error => action_tx.send(Action::Error("terminal input failed".to_string()))?,
            Event::Tick => action_tx.send(Action::Tick)?,
            Event::Render => action_tx.send(Action::Render)?,
            Event::Resize(x, y) => action_tx.send(Action::Resize(x, y))?,
            Event::Key(key) => {
                if let Some(action) = self.global_action(key) {
                    action_tx.send(action)?;
                    return Ok(());
                }
            }
        }

        for component in self.components.iter_mut() {
            if component.is_focused() {
                if let Some(action) = component.handle_events(Some(event.clone()))? {
                    action_tx.send(action)?;
                }
            }
        }

        Ok(())
    }

    /// Keys that work on every screen. While the connect popup is open only Ctrl-C is global.
    fn global_action(&self, key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c')) {
            return Some(Action::Quit);
        }
        if self.components.iter().any(|component| component.is_focused() && component.is_editing()) {
            return None;
        }
        match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::Char('1') => Some(Action::Activate(ActivateAction::Participants)),
            KeyCode::Char('2') => Some(Action::Activate(ActivateAction::Logs)),
            _ => None,
        }
    }

    fn handle_actions(&mut self, tui: &mut Tui, action_tx: ActionSender, action_rx: &mut ActionReceiver) -> Result<()> {
        while let Ok(action) = action_rx.try_recv() {
            if action != Action::Tick && action != Action::Render {
                trace!("{action:?}");
            }
            match &action {
                Action::Tick => {}
                Action::Quit => self.should_quit = true,
                Action::ClearScreen => tui.terminal.clear()?,
                Action::Resize(w, h) => self.handle_resize(tui, *w, *h)?,
                Action::Render => self.render(tui)?,
                Action::Error(message) => error!("{message}"),
                Action::FocusNext => action_tx.send(Action::Activate(self.focused.next().activate()))?,
                Action::Activate(ActivateAction::Participants) => self.focused = FocusedTopLevelComponent::Participants,
                Action::Activate(ActivateAction::Logs) => self.focused = FocusedTopLevelComponent::Logs,
                Action::ManualConnect(user_id) => {
                    info!(user = %user_id, "Manual connect");
                    self.session.manual_connect(user_id.as_str());
                }
                Action::ManualDisconnect(identity) => {
                    info!(identity = %identity, "Manual disconnect");
                    self.session.manual_disconnect(identity.as_str());
                }
                Action::ParticipantsAction(_) => {}
            };

            for component in self.components.iter_mut() {
                if let Some(action) = component.update(action.clone())? {
                    action_tx.send(action)?
                };
            }
        }
        Ok(())
    }

    fn handle_resize(&mut self, tui: &mut Tui, w: u16, h: u16) -> Result<()> {
        tui.resize(Rect::new(0, 0, w, h))?;
        self.render(tui)?;
        Ok(())
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        let theme = crate::tui::Theme::default();
        tui.draw(|frame| {
            frame.render_widget(ratatui::widgets::Block::default().style(theme.default), frame.area());

            for component in self.components.iter_mut() {
                if component.is_visible() {
                    if let Err(err) = component.draw(frame, frame.area()) {
                        error!("Failed to draw: {:?}", err);
                    }
                }
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn focus_cycles_between_screens() {
        let focused = FocusedTopLevelComponent::default();
        assert_eq!(focused, FocusedTopLevelComponent::Participants);
        assert_eq!(focused.next(), FocusedTopLevelComponent::Logs);
        assert_eq!(focused.next().next(), focused);
        assert_eq!(focused.next().activate(), ActivateAction::Logs);
    }
}
