use crate::tui::layout;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::{
        Constraint,
        Rect,
    },
    style::Style,
    text::Line,
    widgets::{
        Block,
        Borders,
        Clear,
    },
    Frame,
};
use tui_textarea::TextArea;

/// Single line editor shown as a popup over the participant table.
#[derive(Debug)]
pub(crate) struct TextInput {
    editor: TextArea<'static>,
}

impl TextInput {
    pub(crate) fn new(title: &'static str, placeholder: &'static str) -> Self {
        let mut editor = TextArea::default();
        editor.set_cursor_line_style(Style::default());
        editor.set_placeholder_text(placeholder);
        editor.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_bottom(Line::from(" <enter> to confirm, <esc> to cancel ").centered()),
        );
        Self { editor }
    }

    pub(crate) fn draw(&self, frame: &mut Frame<'_>, area: Rect) {
        let area = layout::center(area, Constraint::Max(60), Constraint::Length(3));
        frame.render_widget(Clear, area);
        frame.render_widget(&self.editor, area);
    }

    /// Returns whether the editor consumed the key.
    pub(crate) fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        self.editor.input(key)
    }

    pub(crate) fn finish(self) -> Option<String> {
        let content = self.editor.into_lines().concat();
        let content = content.trim();
        (!content.is_empty()).then(|| content.to_string())
    }
}
