use eyre::{
    Context as _,
    Result,
};
use roster_simulator_config::{
    Args,
    Config,
};
use roster_simulator_reconciler::{
    RosterSession,
    RosterView,
};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// One readable line per published view.
    Text,
    /// One JSON object per published view.
    Json,
}

/// Runs the configured meeting without a terminal UI until the roster has settled or the
/// process is interrupted.
pub async fn run_headless(args: Args) -> Result<()> {
    let format = if args.json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    };
    let config = Config::new(args)?;
    let session = RosterSession::spawn(&config)?;
    info!(viewer = %session.local_viewer(), roster = config.roster.len(), feed = config.feed.len(), "Running headless");

    let mut stdout = std::io::stdout().lock();
    tokio::select! {
        result = watch_session(&session, format, &mut stdout) => {
            let view = result?;
            info!(now = view.now, shown = view.entries.len(), removed = view.removed.len(), "Roster settled");
        }
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
    }
    session.close();

    Ok(())
}

/// Writes a report for every view the session publishes and returns the first settled one.
pub async fn watch_session(session: &RosterSession, format: ReportFormat, out: &mut impl Write) -> Result<RosterView> {
    let mut receiver = session.view.clone();
    loop {
        let view = receiver.borrow_and_update().clone();
        write_report(&view, format, out)?;
        if view.is_settled() {
            return Ok(view);
        }
        receiver.changed().await.context("Roster session stopped")?;
    }
}

fn write_report(view: &RosterView, format: ReportFormat, out: &mut impl Write) -> Result<()> {
    match format {
        ReportFormat::Json => serde_json::to_writer(&mut *out, view)?,
        ReportFormat::Text => {
            let entries = view
                .entries
                .iter()
                .map(|entry| {
                    let marker = match (entry.is_live, entry.removal_pending) {
                        (true, _) => "",
                        (false, true) => " offline, leaving",
                        (false, false) => " offline",
                    };
                    format!("{}{marker}", entry.label)
                })
                .collect::<Vec<_>>();
            write!(out, "[{:>6}ms] {}", view.now, entries.join(" | "))?;
        }
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_simulator_config::{
        FeedEvent,
        FeedEventKind,
        UserId,
    };

    #[tokio::test(start_paused = true)]
    async fn default_meeting_settles_once_the_hung_up_user_is_gone() {
        let session = RosterSession::spawn(&Config::default()).unwrap();
        let mut out = Vec::new();

        let view = watch_session(&session, ReportFormat::Text, &mut out).await.unwrap();

        assert_eq!(view.now, 2000);
        assert_eq!(view.identities(), vec!["2", "3"]);
        assert_eq!(view.removed, vec![UserId::from("1")]);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("1:pirmas (HANGUP) offline, leaving"));
        assert_eq!(
            output.lines().last(),
            Some("[  2000ms] 2:antras (IN_CALL) offline | 3:trecias (IN_CALL)")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn json_lines_follow_the_feed() {
        let mut config = Config::default();
        config.removal_delay_ms = 500;
        config.feed = vec![FeedEvent {
            after_ms: 100,
            event: FeedEventKind::Disconnect,
            identity: "3".into(),
            session_id: None,
        }];
        let session = RosterSession::spawn(&config).unwrap();
        let mut out = Vec::new();

        let view = watch_session(&session, ReportFormat::Json, &mut out).await.unwrap();
        assert!(view.is_settled());

        let output = String::from_utf8(out).unwrap();
        let last: serde_json::Value = serde_json::from_str(output.lines().last().unwrap()).unwrap();
        assert_eq!(last["feed_finished"], true);
        assert_eq!(last["next_removal_at"], serde_json::Value::Null);
        for line in output.lines() {
            serde_json::from_str::<serde_json::Value>(line).unwrap();
        }
    }
}
