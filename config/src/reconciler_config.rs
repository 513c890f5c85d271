use super::UserId;
use std::time::Duration;

pub const DEFAULT_REMOVAL_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub local_viewer: UserId,
    pub removal_delay: Duration,
    pub ignore_duplicate_connects: bool,
}

impl ReconcilerConfig {
    pub fn new(local_viewer: impl Into<UserId>) -> Self {
        Self {
            local_viewer: local_viewer.into(),
            removal_delay: DEFAULT_REMOVAL_DELAY,
            ignore_duplicate_connects: false,
        }
    }

    pub fn with_removal_delay(mut self, delay: Duration) -> Self {
        self.removal_delay = delay;
        self
    }

    pub fn removal_delay_ms(&self) -> u64 {
        self.removal_delay.as_millis() as u64
    }
}

impl From<&super::Config> for ReconcilerConfig {
    fn from(config: &super::Config) -> Self {
        Self {
            local_viewer: config.local_viewer.clone(),
            removal_delay: Duration::from_millis(config.removal_delay_ms),
            ignore_duplicate_connects: config.ignore_duplicate_connects,
        }
    }
}
