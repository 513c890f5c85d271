use crate::tui::{
    layout::header_and_main_area,
    Action,
    ActivateAction,
    Component,
};
use color_eyre::Result;
use crossterm::event::{
    KeyCode,
    KeyEvent,
};
use derive_more::Debug;
use ratatui::{
    layout::Rect,
    style::{
        Color,
        Style,
    },
    widgets::Widget as _,
    Frame,
};
use tui_logger::{
    TuiLoggerLevelOutput,
    TuiLoggerSmartWidget,
    TuiWidgetEvent,
    TuiWidgetState,
};

/// Full screen log view with the tui-logger target selector.
#[derive(Debug)]
pub struct Logs {
    active: bool,
    #[debug(skip)]
    state: TuiWidgetState,
}

impl Logs {
    pub fn new() -> Self {
        Self {
            active: false,
            state: TuiWidgetState::new()
                .set_default_display_level(tui_logger::LevelFilter::Debug)
                .set_level_for_target("log", tui_logger::LevelFilter::Info),
        }
    }
}

impl Component for Logs {
    fn is_visible(&self) -> bool {
        self.active
    }

    fn is_focused(&self) -> bool {
        self.active
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(target) = action {
            self.active = target == ActivateAction::Logs;
        }
        Ok(None)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let state = &mut self.state;
        // See https://github.com/gin66/tui-logger?tab=readme-ov-file#smart-widget-key-commands
        let event = match key.code {
            KeyCode::Char(' ') => TuiWidgetEvent::SpaceKey,
            KeyCode::Esc => return Ok(Some(Action::Activate(ActivateAction::Participants))),
            KeyCode::PageUp => TuiWidgetEvent::PrevPageKey,
            KeyCode::PageDown => TuiWidgetEvent::NextPageKey,
            KeyCode::Up => TuiWidgetEvent::UpKey,
            KeyCode::Down => TuiWidgetEvent::DownKey,
            KeyCode::Left => TuiWidgetEvent::LeftKey,
            KeyCode::Right => TuiWidgetEvent::RightKey,
            KeyCode::Char('+') => TuiWidgetEvent::PlusKey,
            KeyCode::Char('-') => TuiWidgetEvent::MinusKey,
            KeyCode::Char('h') => TuiWidgetEvent::HideKey,
            KeyCode::Char('f') => TuiWidgetEvent::FocusKey,
            _ => return Ok(None),
        };
        state.transition(event);

        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let [_header_area, area] = header_and_main_area(area)?;

        TuiLoggerSmartWidget::default()
            .style_error(Style::default().fg(Color::Red))
            .style_debug(Style::default().fg(Color::Green))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_trace(Style::default().fg(Color::Magenta))
            .style_info(Style::default().fg(Color::Cyan))
            .output_separator(':')
            .output_timestamp(Some("%H:%M:%S%.3f".to_string()))
            .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
            .output_target(true)
            .output_file(false)
            .output_line(false)
            .state(&self.state)
            .render(area, frame.buffer_mut());

        Ok(())
    }
}
