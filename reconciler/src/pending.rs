use roster_simulator_config::UserId;
use serde::Serialize;

/// Milliseconds on the session's monotonic clock.
pub type Timestamp = u64;

/// A participant that has left the live feed but is still shown until the removal is confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingRemoval {
    pub user_id: UserId,
    pub timestamp: Timestamp,
    pub remove_confirmed: bool,
}

/// Pending removals in creation order, at most one per user.
///
/// Every change bumps the generation so that the removal scheduler can tell when it has to
/// re-arm.
#[derive(Debug, Default, Clone)]
pub struct PendingRemovals {
    entries: Vec<PendingRemoval>,
    generation: u64,
}

impl PendingRemovals {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingRemoval> {
        self.entries.iter()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, user_id: &UserId) -> Option<&PendingRemoval> {
        self.entries.iter().find(|entry| &entry.user_id == user_id)
    }

    pub fn contains(&self, user_id: &UserId) -> bool {
        self.get(user_id).is_some()
    }

    /// Starts tracking `user_id`. Returns `false` if a record already exists.
    pub fn insert(&mut self, user_id: UserId, now: Timestamp) -> bool {
        if self.contains(&user_id) {
            return false;
        }
        self.entries.push(PendingRemoval {
            user_id,
            timestamp: now,
            remove_confirmed: false,
        });
        self.generation += 1;
        true
    }

    pub fn remove(&mut self, user_id: &UserId) -> Option<PendingRemoval> {
        let index = self.entries.iter().position(|entry| &entry.user_id == user_id)?;
        self.generation += 1;
        Some(self.entries.remove(index))
    }

    /// Marks the record as confirmed and moves its timestamp to `now`.
    pub fn confirm(&mut self, user_id: &UserId, now: Timestamp) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|entry| &entry.user_id == user_id) else {
            return false;
        };
        entry.remove_confirmed = true;
        entry.timestamp = now;
        self.generation += 1;
        true
    }

    /// The record with the smallest timestamp. On ties the most recently created record wins.
    pub fn earliest(&self) -> Option<&PendingRemoval> {
        self.entries
            .iter()
            .reduce(|a, b| if a.timestamp < b.timestamp { a } else { b })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_record_per_user() {
        let mut pending = PendingRemovals::default();
        assert!(pending.insert("1".into(), 10));
        assert!(!pending.insert("1".into(), 20));
        assert_eq!(pending.len(), 1);
        assert_eq!(pending.get(&"1".into()).map(|p| p.timestamp), Some(10));
    }

    #[test]
    fn earliest_prefers_oldest_then_newest_on_ties() {
        let mut pending = PendingRemovals::default();
        pending.insert("a".into(), 30);
        pending.insert("b".into(), 10);
        pending.insert("c".into(), 10);
        pending.insert("d".into(), 50);

        assert_eq!(pending.earliest().map(|p| p.user_id.as_str()), Some("c"));

        pending.remove(&"c".into());
        assert_eq!(pending.earliest().map(|p| p.user_id.as_str()), Some("b"));
    }

    #[test]
    fn confirm_refreshes_the_timestamp() {
        let mut pending = PendingRemovals::default();
        pending.insert("1".into(), 0);
        pending.insert("2".into(), 100);

        assert!(pending.confirm(&"1".into(), 2000));
        assert!(!pending.confirm(&"9".into(), 2000));

        let record = pending.get(&"1".into()).unwrap();
        assert!(record.remove_confirmed);
        assert_eq!(record.timestamp, 2000);
        assert_eq!(pending.earliest().map(|p| p.user_id.as_str()), Some("2"));
    }

    #[test]
    fn generation_moves_on_every_change_only() {
        let mut pending = PendingRemovals::default();
        let start = pending.generation();

        pending.insert("1".into(), 0);
        pending.insert("1".into(), 5);
        assert_eq!(pending.generation(), start + 1);

        assert!(pending.remove(&"9".into()).is_none());
        assert_eq!(pending.generation(), start + 1);

        pending.confirm(&"1".into(), 7);
        pending.remove(&"1".into());
        assert_eq!(pending.generation(), start + 3);
        assert!(pending.is_empty());
    }
}
