use crate::{
    participant::LiveParticipant,
    session::RosterMessage,
};
use roster_simulator_config::{
    FeedEvent,
    FeedEventKind,
};
use std::time::Duration;
use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::Instant,
};
use tokio_util::sync::CancellationToken;

/// Scripted stand-in for a real-time transport: replays connect and disconnect events at fixed
/// offsets from the start of a session.
#[derive(Debug, Clone, Default)]
pub struct LiveFeed {
    events: Vec<FeedEvent>,
}

impl LiveFeed {
    pub fn new(mut events: Vec<FeedEvent>) -> Self {
        // stable, events at the same offset keep their script order
        events.sort_by_key(|event| event.after_ms);
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[FeedEvent] {
        &self.events
    }

    pub fn message(event: &FeedEvent) -> RosterMessage {
        let participant = LiveParticipant::new(event.identity.clone(), event.session_id.clone());
        match event.event {
            FeedEventKind::Connect => RosterMessage::Connect(participant),
            FeedEventKind::Disconnect => RosterMessage::Disconnect(participant),
        }
    }

    /// Replays the feed into `sender`, then reports [`RosterMessage::FeedFinished`].
    pub fn spawn(
        self,
        origin: Instant,
        sender: UnboundedSender<RosterMessage>,
        cancellation_token: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::task::spawn(async move {
            tokio::select! {
                biased;
                _ = cancellation_token.cancelled() => {
                    debug!("Live feed canceled");
                },
                _ = self.replay(origin, &sender) => {},
            }
        })
    }

    async fn replay(self, origin: Instant, sender: &UnboundedSender<RosterMessage>) {
        let total = self.events.len();
        for (index, event) in self.events.into_iter().enumerate() {
            tokio::time::sleep_until(origin + Duration::from_millis(event.after_ms)).await;
            debug!(
                identity = %event.identity,
                event = %event.event,
                "feed event {}/{total}",
                index + 1
            );
            if sender.send(Self::message(&event)).is_err() {
                warn!("Roster session closed, stopping the live feed");
                return;
            }
        }

        if sender.send(RosterMessage::FeedFinished).is_err() {
            warn!("Roster session closed before the live feed finished");
        }
    }
}
