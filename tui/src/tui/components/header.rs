use crate::tui::{
    layout,
    Action,
    ActivateAction,
    Component,
};
use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use eyre::Result;
use ratatui::{
    layout::{
        Constraint,
        Layout,
    },
    style::{
        Color,
        Modifier,
        Style,
    },
    text::Line,
    widgets::{
        Block,
        Borders,
        Paragraph,
        Tabs,
    },
};
use roster_simulator_config::UserId;
use roster_simulator_reconciler::RosterView;
use tokio::sync::watch;

/// Screen tabs on the left, viewer and session age on the right.
#[derive(Debug)]
pub struct Header {
    screen: ActivateAction,
    local_viewer: UserId,
    started: DateTime<Utc>,
    view: watch::Receiver<RosterView>,
}

impl Header {
    pub(crate) fn new(local_viewer: UserId, started: DateTime<Utc>, view: watch::Receiver<RosterView>) -> Self {
        Self {
            screen: ActivateAction::Participants,
            local_viewer,
            started,
            view,
        }
    }

    fn status_line(&self, now: DateTime<Utc>) -> String {
        let view = self.view.borrow();
        format!(
            " viewer {} | {} shown | {} live | up {} ",
            self.local_viewer,
            view.entries.len(),
            view.live.len(),
            format_uptime(now - self.started),
        )
    }
}

impl Component for Header {
    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(screen) = action {
            self.screen = screen;
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut ratatui::Frame, area: ratatui::prelude::Rect) -> Result<()> {
        let [header_area, _main_area] = layout::header_and_main_area(area)?;
        let block = Block::new().borders(Borders::BOTTOM);
        let inner = block.inner(header_area);
        frame.render_widget(block, header_area);

        let [tabs_area, status_area] = Layout::horizontal([Constraint::Min(0), Constraint::Length(48)]).areas(inner);

        let selected_tab = match self.screen {
            ActivateAction::Participants => 0,
            ActivateAction::Logs => 1,
        };
        let tabs = Tabs::new(vec!["Roster [1]", "Logs [2]"])
            .select(selected_tab)
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            .divider(" | ");
        frame.render_widget(tabs, tabs_area);

        let status = Paragraph::new(Line::from(self.status_line(Utc::now())).right_aligned());
        frame.render_widget(status, status_area);

        Ok(())
    }
}

fn format_uptime(value: TimeDelta) -> String {
    let seconds = value.num_seconds().max(0);
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m{:02}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h{:02}m", seconds / 3600, (seconds % 3600) / 60)
    }
}
