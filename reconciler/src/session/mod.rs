use crate::{
    feed::LiveFeed,
    participant::LiveParticipant,
    reconciler::Reconciler,
    view::RosterView,
};
use chrono::Utc;
use eyre::Result;
use roster_simulator_config::{
    Config,
    FeedEvent,
    ReconcilerConfig,
    RosterParticipant,
    UserId,
};
use std::sync::Arc;
use tokio::{
    sync::{
        mpsc::{
            unbounded_channel,
            UnboundedSender,
        },
        watch,
    },
    time::Instant,
};
use tokio_util::sync::{
    CancellationToken,
    DropGuard,
};

mod inner;
mod messages;

use inner::RosterSessionInner;
pub use messages::RosterMessage;

/// Handle to a roster running on its own task.
///
/// All triggers go through one queue so they are applied strictly in order. The latest
/// [`RosterView`] is available through `view`. The task stops once the last handle is dropped.
#[derive(Debug, Clone)]
pub struct RosterSession {
    pub created: chrono::DateTime<chrono::Utc>,
    pub view: watch::Receiver<RosterView>,
    local_viewer: UserId,
    origin: Instant,
    cancellation_token: CancellationToken,
    _session_task_guard: Arc<DropGuard>,
    sender: UnboundedSender<RosterMessage>,
}

impl RosterSession {
    /// Starts a session for the configured meeting, connects the local viewer if asked to and
    /// replays the scripted feed.
    pub fn spawn(config: &Config) -> Result<Self> {
        config.validate()?;

        let session = Self::with_reconciler_config(config.reconciler_config(), config.roster.clone());
        if config.self_connect {
            session.connect(LiveParticipant::synthesized(config.local_viewer.clone()));
        }
        session.replay_feed(config.feed.clone());

        Ok(session)
    }

    pub fn with_reconciler_config(config: ReconcilerConfig, roster: Vec<RosterParticipant>) -> Self {
        let origin = Instant::now();
        let local_viewer = config.local_viewer.clone();
        let reconciler = Reconciler::new(config, roster, 0);

        let (sender, receiver) = unbounded_channel::<RosterMessage>();
        let cancellation_token = CancellationToken::new();
        let task_cancellation_guard = cancellation_token.clone().drop_guard();
        let (state_sender, state_receiver) = watch::channel(reconciler.view(0));

        tokio::task::spawn({
            let cancellation_token = cancellation_token.clone();
            async move {
                tokio::select! {
                    biased;
                    _ = cancellation_token.cancelled() => {},
                    _ = RosterSessionInner::run(reconciler, origin, receiver, state_sender) => {},
                };

                debug!("Roster session task canceled");
            }
        });

        Self {
            created: Utc::now(),
            view: state_receiver,
            local_viewer,
            origin,
            cancellation_token,
            _session_task_guard: Arc::new(task_cancellation_guard),
            sender,
        }
    }

    pub fn local_viewer(&self) -> &UserId {
        &self.local_viewer
    }

    /// Replays scripted live events relative to the start of the session.
    pub fn replay_feed(&self, events: Vec<FeedEvent>) {
        let feed = LiveFeed::new(events);
        info!(events = feed.len(), "Starting live feed");
        feed.spawn(self.origin, self.sender.clone(), self.cancellation_token.child_token());
    }

    pub fn send_message(&self, message: RosterMessage) {
        trace!(%message, "Sending roster message");
        if let Err(err) = self.sender.send(message) {
            error!("Was not able to send message {}, the roster session is closed", err.0);
        }
    }

    pub fn connect(&self, participant: LiveParticipant) {
        self.send_message(RosterMessage::Connect(participant));
    }

    pub fn disconnect(&self, participant: LiveParticipant) {
        self.send_message(RosterMessage::Disconnect(participant));
    }

    pub fn manual_connect(&self, user_id: impl Into<UserId>) {
        self.send_message(RosterMessage::ManualConnect(user_id.into()));
    }

    pub fn manual_disconnect(&self, identity: impl Into<UserId>) {
        let identity = identity.into();
        if identity == self.local_viewer {
            debug!(%identity, "Not disconnecting the local viewer");
            return;
        }
        self.send_message(RosterMessage::ManualDisconnect(identity));
    }

    /// Waits until a published view satisfies `predicate` and returns it.
    pub async fn wait_for(&self, mut predicate: impl FnMut(&RosterView) -> bool) -> Result<RosterView> {
        let mut receiver = self.view.clone();
        let view = receiver.wait_for(|view| predicate(view)).await?;
        Ok(view.clone())
    }

    /// Stops the session task and the live feed for every handle.
    pub fn close(&self) {
        self.cancellation_token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use roster_simulator_config::{
        CallStatus,
        FeedEventKind,
    };
    use std::time::Duration;

    fn scenario_roster() -> Vec<RosterParticipant> {
        vec![
            RosterParticipant::new("1", "pirmas", CallStatus::Hangup),
            RosterParticipant::new("2", "antras", CallStatus::InCall),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn removal_is_published_after_the_delay() {
        let session = RosterSession::with_reconciler_config(ReconcilerConfig::new("3"), scenario_roster());
        assert_eq!(session.view.borrow().identities(), ["1", "2"]);
        assert_eq!(session.view.borrow().next_removal_at, Some(2000));

        tokio::time::sleep(Duration::from_millis(1_990)).await;
        assert_eq!(session.view.borrow().identities(), ["1", "2"]);

        let view = session.wait_for(|view| !view.removed.is_empty()).await.unwrap();
        assert_eq!(view.identities(), ["2"]);
        assert_eq!(view.removed, [UserId::from("1")]);
        assert_eq!(view.now, 2000);
        assert_eq!(view.next_removal_at, None);
    }

    #[tokio::test(start_paused = true)]
    async fn reconnect_before_the_delay_keeps_the_participant() {
        let session = RosterSession::with_reconciler_config(ReconcilerConfig::new("3"), scenario_roster());

        tokio::time::sleep(Duration::from_millis(500)).await;
        session.connect(LiveParticipant::new("1", Some("sid_1".to_string())));

        let view = session
            .wait_for(|view| view.live.contains(&UserId::from("1")))
            .await
            .unwrap();
        assert!(view.pending.is_empty());
        assert_eq!(view.next_removal_at, None);

        tokio::time::sleep(Duration::from_millis(3_000)).await;
        let view = session.view.borrow().clone();
        assert!(view.removed.is_empty());
        assert_eq!(view.identities(), ["2", "1"]);
        assert_eq!(view.entry("1").map(|e| e.status), Some(CallStatus::InCall));
    }

    #[tokio::test(start_paused = true)]
    async fn configured_session_replays_the_feed_until_settled() {
        let mut config = Config::default();
        config.feed = vec![
            FeedEvent {
                after_ms: 100,
                event: FeedEventKind::Connect,
                identity: "2".into(),
                session_id: Some("sid_2".to_string()),
            },
            FeedEvent {
                after_ms: 400,
                event: FeedEventKind::Disconnect,
                identity: "2".into(),
                session_id: Some("sid_2".to_string()),
            },
        ];

        let session = RosterSession::spawn(&config).unwrap();
        let view = session.wait_for(|view| view.is_settled()).await.unwrap();

        // the second removal waits for the first one, which was re-armed at 400
        assert_eq!(view.now, 4_400);
        assert_eq!(view.identities(), ["3"]);
        assert_eq!(view.removed, [UserId::from("1"), UserId::from("2")]);
        assert!(view.entry("3").unwrap().is_local_viewer);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_triggers_go_through_the_session() {
        let session = RosterSession::with_reconciler_config(ReconcilerConfig::new("3"), scenario_roster());

        session.manual_connect("2");
        let view = session.wait_for(|view| !view.live.is_empty()).await.unwrap();
        assert_eq!(view.identities(), ["1", "2"]);
        assert!(view.entry("2").unwrap().is_live);

        session.manual_disconnect("2");
        let view = session.wait_for(|view| view.live.is_empty()).await.unwrap();
        let entry = view.entry("2").unwrap();
        assert_eq!(entry.status, CallStatus::Hangup);
        assert!(entry.removal_pending);
        assert!(!entry.is_removable);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_last_handle_stops_the_task() {
        let session = RosterSession::with_reconciler_config(ReconcilerConfig::new("3"), scenario_roster());
        let mut view = session.view.clone();
        drop(session);

        while view.changed().await.is_ok() {}
    }
}
