use crate::tui::{
    layout::header_summary_and_table,
    Action,
    ActivateAction,
    Component,
    Theme,
};
use eyre::Result;
use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{
        Block,
        Borders,
        Paragraph,
    },
    Frame,
};
use roster_simulator_reconciler::RosterView;
use std::time::Duration;
use tokio::sync::watch;

/// Removal timer and feed progress above the participant table.
#[derive(Debug)]
pub struct Summary {
    visible: bool,
    removal_delay: Duration,
    view: watch::Receiver<RosterView>,
}

impl Summary {
    pub(crate) fn new(removal_delay: Duration, view: watch::Receiver<RosterView>) -> Self {
        Self {
            visible: true,
            removal_delay,
            view,
        }
    }

    fn lines(&self) -> [String; 2] {
        let view = self.view.borrow();

        let timer = match (view.next_removal_at, view.pending.first()) {
            (Some(at), _) => {
                let due = view
                    .pending
                    .iter()
                    .filter(|pending| !pending.remove_confirmed)
                    .map(|pending| pending.user_id.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("next removal at {at}ms, pending {due}")
            }
            (None, Some(_)) => format!("{} removals waiting", view.pending.len()),
            (None, None) => "no removals pending".to_string(),
        };
        let removed = if view.removed.is_empty() {
            "nobody removed".to_string()
        } else {
            let removed = view.removed.iter().map(ToString::to_string).collect::<Vec<_>>();
            format!("removed {}", removed.join(", "))
        };
        let feed = if view.feed_finished {
            "feed finished"
        } else {
            "feed running"
        };

        [
            format!("delay {}ms | {timer}", self.removal_delay.as_millis()),
            format!("{removed} | {feed} | t={}ms", view.now),
        ]
    }
}

impl Component for Summary {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>> {
        if let Action::Activate(screen) = action {
            self.visible = screen == ActivateAction::Participants;
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame<'_>, area: Rect) -> Result<()> {
        let theme = Theme::default();
        let [_, area, _] = header_summary_and_table(area)?;

        let lines = self.lines().map(Line::from);
        let paragraph = Paragraph::new(lines.to_vec()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border(false))
                .title("Session"),
        );
        frame.render_widget(paragraph, area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_simulator_config::{
        CallStatus,
        ReconcilerConfig,
        RosterParticipant,
    };
    use roster_simulator_reconciler::Reconciler;

    #[test]
    fn pending_removal_is_summarized() {
        let reconciler = Reconciler::new(
            ReconcilerConfig::new("3"),
            vec![
                RosterParticipant::new("1", "pirmas", CallStatus::Hangup),
                RosterParticipant::new("3", "trecias", CallStatus::InCall),
            ],
            0,
        );
        let (_tx, rx) = watch::channel(reconciler.view(0));
        let summary = Summary::new(Duration::from_millis(2000), rx);

        assert_eq!(
            summary.lines(),
            [
                "delay 2000ms | next removal at 2000ms, pending 1".to_string(),
                "nobody removed | feed running | t=0ms".to_string(),
            ]
        );
    }

    #[test]
    fn idle_session() {
        let view = RosterView {
            now: 4400,
            removed: vec!["1".into(), "2".into()],
            feed_finished: true,
            ..Default::default()
        };
        let (_tx, rx) = watch::channel(view);
        let summary = Summary::new(Duration::from_millis(500), rx);

        assert_eq!(
            summary.lines(),
            [
                "delay 500ms | no removals pending".to_string(),
                "removed 1, 2 | feed finished | t=4400ms".to_string(),
            ]
        );
    }
}
