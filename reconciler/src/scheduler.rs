use crate::pending::{
    PendingRemovals,
    Timestamp,
};
use roster_simulator_config::UserId;
use serde::Serialize;
use std::time::Duration;

/// The single armed removal timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alarm {
    pub user_id: UserId,
    pub armed_at: Timestamp,
    pub deadline: Timestamp,
}

/// Where the removal timer should be armed for the given pending removals: on the earliest
/// record, `delay` after `now`. `None` disarms.
pub fn schedule(pending: &PendingRemovals, now: Timestamp, delay: Duration) -> Option<Alarm> {
    pending.earliest().map(|earliest| Alarm {
        user_id: earliest.user_id.clone(),
        armed_at: now,
        deadline: now.saturating_add(delay.as_millis() as u64),
    })
}

/// Single slot removal timer. Re-armed against [`schedule`] whenever the pending removals
/// change, left alone otherwise.
#[derive(Debug)]
pub struct RemovalScheduler {
    delay: Duration,
    alarm: Option<Alarm>,
    seen_generation: u64,
}

impl RemovalScheduler {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            alarm: None,
            seen_generation: 0,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn alarm(&self) -> Option<&Alarm> {
        self.alarm.as_ref()
    }

    pub fn deadline(&self) -> Option<Timestamp> {
        self.alarm.as_ref().map(|alarm| alarm.deadline)
    }

    /// Cancels and re-arms if `pending` changed since the last call. Returns whether it did.
    pub fn sync(&mut self, pending: &PendingRemovals, now: Timestamp) -> bool {
        if pending.generation() == self.seen_generation {
            return false;
        }
        self.seen_generation = pending.generation();

        let alarm = schedule(pending, now, self.delay);
        match (&self.alarm, &alarm) {
            (_, Some(next)) => trace!(user = %next.user_id, deadline = next.deadline, "removal timer armed"),
            (Some(_), None) => trace!("removal timer disarmed"),
            (None, None) => {}
        }
        self.alarm = alarm;
        true
    }

    /// Takes the alarm if its deadline has passed, leaving the scheduler disarmed.
    pub fn take_due(&mut self, now: Timestamp) -> Option<Alarm> {
        if self.deadline().is_some_and(|deadline| deadline <= now) {
            self.alarm.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DELAY: Duration = Duration::from_millis(2000);

    #[test]
    fn schedule_is_empty_for_no_pending_removals() {
        assert_eq!(schedule(&PendingRemovals::default(), 100, DELAY), None);
    }

    #[test]
    fn schedule_targets_the_earliest_record_from_now() {
        let mut pending = PendingRemovals::default();
        pending.insert("2".into(), 40);
        pending.insert("1".into(), 20);

        let alarm = schedule(&pending, 300, DELAY).unwrap();
        assert_eq!(
            alarm,
            Alarm {
                user_id: "1".into(),
                armed_at: 300,
                deadline: 2300,
            }
        );
    }

    #[test]
    fn sync_only_rearms_on_change() {
        let mut pending = PendingRemovals::default();
        let mut scheduler = RemovalScheduler::new(DELAY);

        assert!(!scheduler.sync(&pending, 0));
        assert_eq!(scheduler.deadline(), None);

        pending.insert("1".into(), 0);
        assert!(scheduler.sync(&pending, 0));
        assert_eq!(scheduler.deadline(), Some(2000));

        // nothing changed, the timer keeps running from its original arm time
        assert!(!scheduler.sync(&pending, 1500));
        assert_eq!(scheduler.deadline(), Some(2000));

        pending.insert("2".into(), 1500);
        assert!(scheduler.sync(&pending, 1500));
        assert_eq!(scheduler.alarm().map(|a| a.user_id.as_str()), Some("1"));
        assert_eq!(scheduler.deadline(), Some(3500));

        pending.remove(&"1".into());
        pending.remove(&"2".into());
        assert!(scheduler.sync(&pending, 1600));
        assert_eq!(scheduler.alarm(), None);
    }

    #[test]
    fn take_due_fires_once() {
        let mut pending = PendingRemovals::default();
        let mut scheduler = RemovalScheduler::new(DELAY);
        pending.insert("1".into(), 0);
        scheduler.sync(&pending, 0);

        assert_eq!(scheduler.take_due(1999), None);
        assert_eq!(scheduler.take_due(2000).map(|a| a.user_id), Some("1".into()));
        assert_eq!(scheduler.take_due(2500), None);
    }
}
