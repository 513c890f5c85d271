use crate::{
    participant::{
        DisplayEntry,
        LiveParticipant,
        OfflineParticipant,
        VideoParticipant,
    },
    pending::{
        PendingRemovals,
        Timestamp,
    },
    scheduler::RemovalScheduler,
    view::RosterView,
};
use roster_simulator_config::{
    CallStatus,
    ReconcilerConfig,
    RosterParticipant,
    UserId,
};
use std::collections::BTreeSet;

/// Merges the meeting roster with the live connection feed.
///
/// Owns the roster, the live list, the pending removals and the removed set. The connect,
/// disconnect, manual connect/disconnect and timer triggers are the only mutators; each of them
/// recomputes the merged list before returning. Time is passed in by the caller so that the
/// reconciler itself never blocks or sleeps.
#[derive(Debug)]
pub struct Reconciler {
    config: ReconcilerConfig,
    roster: Vec<RosterParticipant>,
    live: Vec<LiveParticipant>,
    pending: PendingRemovals,
    removed: BTreeSet<UserId>,
    scheduler: RemovalScheduler,
    merged: Vec<VideoParticipant>,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig, roster: Vec<RosterParticipant>, now: Timestamp) -> Self {
        let scheduler = RemovalScheduler::new(config.removal_delay);
        let mut reconciler = Self {
            config,
            roster,
            live: Vec::new(),
            pending: PendingRemovals::default(),
            removed: BTreeSet::new(),
            scheduler,
            merged: Vec::new(),
        };
        reconciler.refresh(now);
        reconciler
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn local_viewer(&self) -> &UserId {
        &self.config.local_viewer
    }

    pub fn roster(&self) -> &[RosterParticipant] {
        &self.roster
    }

    pub fn roster_entry(&self, user_id: &UserId) -> Option<&RosterParticipant> {
        self.roster.iter().find(|participant| &participant.user_id == user_id)
    }

    pub fn live(&self) -> &[LiveParticipant] {
        &self.live
    }

    pub fn is_live(&self, identity: &UserId) -> bool {
        self.live.iter().any(|participant| &participant.identity == identity)
    }

    pub fn pending(&self) -> &PendingRemovals {
        &self.pending
    }

    pub fn removed(&self) -> &BTreeSet<UserId> {
        &self.removed
    }

    /// The merged list as of the last trigger: offline survivors, then the live list.
    pub fn merged(&self) -> &[VideoParticipant] {
        &self.merged
    }

    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.scheduler.deadline()
    }

    /// Walks the offline roster entries and decides for each whether it is still shown.
    ///
    /// Applies the side effects of that walk: confirmed removals move into the removed set and
    /// offline participants with a terminal status get a pending removal stamped with `now`.
    pub fn compute_merged_view(&mut self, now: Timestamp) -> Vec<VideoParticipant> {
        let candidates = self
            .roster
            .iter()
            .filter(|participant| !self.is_live(&participant.user_id))
            .map(|participant| (participant.user_id.clone(), participant.status))
            .collect::<Vec<_>>();

        let mut merged = Vec::with_capacity(candidates.len() + self.live.len());
        for (user_id, status) in candidates {
            if let Some(record) = self.pending.get(&user_id) {
                if record.remove_confirmed {
                    self.pending.remove(&user_id);
                    info!(user = %user_id, "participant removed from the roster view");
                    self.removed.insert(user_id);
                    continue;
                }
            } else if user_id == self.config.local_viewer || self.removed.contains(&user_id) {
                continue;
            } else if status.is_terminal() {
                debug!(user = %user_id, %status, "participant left, scheduling removal");
                self.pending.insert(user_id.clone(), now);
            }
            merged.push(VideoParticipant::Offline(OfflineParticipant { user_id }));
        }

        merged.extend(self.live.iter().cloned().map(VideoParticipant::Live));
        merged
    }

    /// A participant joined the live feed.
    pub fn on_participant_connect(&mut self, participant: LiveParticipant, now: Timestamp) {
        if self.config.ignore_duplicate_connects && self.is_live(&participant.identity) {
            debug!(identity = %participant.identity, "ignoring duplicate connect");
            return;
        }

        info!(identity = %participant.identity, session = ?participant.session_id, "participant connected");
        let identity = participant.identity.clone();
        self.live.push(participant);
        self.pending.remove(&identity);
        self.removed.remove(&identity);
        self.set_status(&identity, CallStatus::InCall);
        self.refresh(now);
    }

    /// A participant left the live feed. The roster entry is marked as hung up either way.
    pub fn on_participant_disconnect(&mut self, participant: &LiveParticipant, now: Timestamp) {
        let before = self.live.len();
        self.live.retain(|live| live.identity != participant.identity);
        if self.live.len() == before {
            debug!(identity = %participant.identity, "disconnect for a participant that is not live");
        } else {
            info!(identity = %participant.identity, "participant disconnected");
        }
        self.set_status(&participant.identity, CallStatus::Hangup);
        self.refresh(now);
    }

    /// Connects a roster participant on the viewer's behalf. Returns `false` when the user is
    /// unknown, is the viewer, or is already live.
    pub fn manual_connect(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        if user_id == &self.config.local_viewer {
            debug!(user = %user_id, "not connecting the local viewer manually");
            return false;
        }
        if self.is_live(user_id) {
            debug!(user = %user_id, "already connected");
            return false;
        }
        let Some(entry) = self.roster_entry(user_id) else {
            debug!(user = %user_id, "no such roster participant");
            return false;
        };

        let participant = LiveParticipant::synthesized(entry.user_id.clone());
        self.on_participant_connect(participant, now);
        true
    }

    /// Forces a participant off the call. Refused for the local viewer and for identities that
    /// are neither live nor on the roster.
    pub fn manual_disconnect(&mut self, identity: &UserId, now: Timestamp) -> bool {
        if identity == &self.config.local_viewer {
            debug!(identity = %identity, "the local viewer cannot be disconnected");
            return false;
        }

        let participant = match self.live.iter().find(|live| &live.identity == identity) {
            Some(live) => live.clone(),
            None if self.roster_entry(identity).is_some() => LiveParticipant::new(identity.clone(), None),
            None => {
                debug!(identity = %identity, "no such participant");
                return false;
            }
        };

        self.on_participant_disconnect(&participant, now);
        true
    }

    /// Confirms the removal the timer is armed for, if its deadline has passed.
    pub fn on_timer(&mut self, now: Timestamp) -> bool {
        let Some(alarm) = self.scheduler.take_due(now) else {
            return false;
        };

        debug!(user = %alarm.user_id, armed_at = alarm.armed_at, "removal delay elapsed");
        self.pending.confirm(&alarm.user_id, now);
        self.refresh(now);
        true
    }

    pub fn display(&self) -> Vec<DisplayEntry> {
        self.merged
            .iter()
            .filter_map(|participant| {
                let identity = participant.display_identity();
                let info = self.roster_entry(identity)?;
                Some(DisplayEntry::new(
                    participant,
                    info,
                    &self.config.local_viewer,
                    self.pending.contains(identity),
                ))
            })
            .collect()
    }

    pub fn view(&self, now: Timestamp) -> RosterView {
        RosterView {
            now,
            entries: self.display(),
            live: self.live.iter().map(|live| live.identity.clone()).collect(),
            pending: self.pending.iter().cloned().collect(),
            removed: self.removed.iter().cloned().collect(),
            next_removal_at: self.next_deadline(),
            feed_finished: false,
        }
    }

    fn set_status(&mut self, user_id: &UserId, status: CallStatus) {
        if let Some(entry) = self.roster.iter_mut().find(|participant| &participant.user_id == user_id) {
            if entry.status != status {
                trace!(user = %user_id, from = %entry.status, to = %status, "roster status changed");
                entry.status = status;
            }
        }
    }

    fn refresh(&mut self, now: Timestamp) {
        self.merged = self.compute_merged_view(now);
        self.scheduler.sync(&self.pending, now);
    }
}
