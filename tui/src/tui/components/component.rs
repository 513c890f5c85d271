use crate::tui::{
    Action,
    Event,
};
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{
        Rect,
        Size,
    },
    Frame,
};
use roster_simulator_config::Config;
use tokio::sync::mpsc::UnboundedSender;

/// A piece of the screen that reacts to terminal events and [`Action`]s and draws itself.
///
/// The app forwards terminal events only to focused components, while every component sees
/// every action.
pub(crate) trait Component {
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        let _ = config;
        Ok(())
    }

    fn init(&mut self, area: Size) -> Result<()> {
        let _ = area;
        Ok(())
    }

    fn is_visible(&self) -> bool {
        true
    }

    fn is_focused(&self) -> bool {
        false
    }

    /// A focused component that is editing text receives every key, global shortcuts included.
    fn is_editing(&self) -> bool {
        false
    }

    fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
        match event {
            Some(Event::Key(key)) => self.handle_key_event(key),
            _ => Ok(None),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let _ = key;
        Ok(None)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        let _ = action;
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()>;
}
