use super::messages::RosterMessage;
use crate::{
    pending::Timestamp,
    reconciler::Reconciler,
    view::RosterView,
};
use std::time::Duration;
use tokio::{
    sync::{
        mpsc::UnboundedReceiver,
        watch,
    },
    time::Instant,
};

/// Owns the reconciler on the session task. Messages and the removal timer are handled one at a
/// time; every one of them is followed by a fresh [`RosterView`].
#[derive(Debug)]
pub(super) struct RosterSessionInner {
    reconciler: Reconciler,
    origin: Instant,
    state: watch::Sender<RosterView>,
    feed_finished: bool,
}

impl RosterSessionInner {
    #[instrument(level = "debug", skip_all, fields(viewer = %reconciler.local_viewer()))]
    pub(super) async fn run(
        reconciler: Reconciler,
        origin: Instant,
        mut receiver: UnboundedReceiver<RosterMessage>,
        state: watch::Sender<RosterView>,
    ) {
        let mut inner = Self {
            reconciler,
            origin,
            state,
            feed_finished: false,
        };
        inner.publish();

        loop {
            let deadline = inner.reconciler.next_deadline();

            tokio::select! {
                biased;

                message = receiver.recv() => {
                    let Some(message) = message else {
                        debug!("all roster session handles dropped");
                        break;
                    };
                    inner.handle_message(message);
                },

                _ = sleep_until(deadline.map(|at| origin + Duration::from_millis(at))) => {
                    // elapsed() is truncated to whole milliseconds
                    let now = deadline.map_or_else(|| inner.now(), |at| inner.now().max(at));
                    if !inner.reconciler.on_timer(now) {
                        warn!(now, "removal timer woke up without a due alarm");
                    }
                },
            };

            inner.publish();
        }
    }

    fn now(&self) -> Timestamp {
        self.origin.elapsed().as_millis() as Timestamp
    }

    fn handle_message(&mut self, message: RosterMessage) {
        let now = self.now();
        trace!(%message, now, "handling roster message");

        match message {
            RosterMessage::Connect(participant) => self.reconciler.on_participant_connect(participant, now),
            RosterMessage::Disconnect(participant) => self.reconciler.on_participant_disconnect(&participant, now),
            RosterMessage::ManualConnect(user_id) => {
                if !self.reconciler.manual_connect(&user_id, now) {
                    info!(user = %user_id, "manual connect ignored");
                }
            }
            RosterMessage::ManualDisconnect(identity) => {
                if !self.reconciler.manual_disconnect(&identity, now) {
                    info!(identity = %identity, "manual disconnect ignored");
                }
            }
            RosterMessage::FeedFinished => {
                debug!("live feed finished");
                self.feed_finished = true;
            }
        }
    }

    fn publish(&self) {
        let mut view = self.reconciler.view(self.now());
        view.feed_finished = self.feed_finished;
        self.state.send_replace(view);
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
