#[macro_use]
extern crate tracing;

mod app_config;
mod args;
mod meeting;
mod reconciler_config;

use app_config::AppConfig;
pub use app_config::{
    get_config_dir,
    get_data_dir,
};
pub use args::Args;
use color_eyre::Result;
use eyre::bail;
pub use meeting::{
    CallStatus,
    CallStatusIter,
    FeedEvent,
    FeedEventKind,
    RosterParticipant,
    UserId,
};
pub use reconciler_config::{
    ReconcilerConfig,
    DEFAULT_REMOVAL_DELAY,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    collections::HashSet,
    path::Path,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten, skip_serializing)]
    pub app_config: AppConfig,
    pub local_viewer: UserId,
    pub removal_delay_ms: u64,
    /// Connect the local viewer to the live feed when the session starts.
    #[serde(default)]
    pub self_connect: bool,
    #[serde(default)]
    pub ignore_duplicate_connects: bool,
    pub tick_rate: f64,
    pub frame_rate: f64,
    #[serde(default)]
    pub roster: Vec<RosterParticipant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub feed: Vec<FeedEvent>,
}

const DEFAULT_CONFIG: &str = include_str!("default-config.yaml");

impl Default for Config {
    fn default() -> Self {
        serde_yml::from_str(DEFAULT_CONFIG).expect("Failed to parse default config")
    }
}

impl Config {
    pub fn new(args: Args) -> Result<Self> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?;

        builder = builder.add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Yaml));

        let config_files = [("config.yaml", config::FileFormat::Yaml)];

        for (file, format) in &config_files {
            let source = config::File::from(config_dir.join(file))
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
        }

        builder = builder.add_source(args);

        let cfg: Self = builder.build()?.try_deserialize()?;
        cfg.validate()?;
        debug!(viewer = %cfg.local_viewer, roster = cfg.roster.len(), feed = cfg.feed.len(), "Loaded config");

        Ok(cfg)
    }

    /// Rejects rosters that would break the one-entry-per-user assumption of the reconciler.
    pub fn validate(&self) -> Result<()> {
        if self.local_viewer.is_empty() {
            bail!("local_viewer must not be empty");
        }

        let mut seen = HashSet::new();
        for participant in &self.roster {
            if !seen.insert(&participant.user_id) {
                bail!("roster contains user {} more than once", participant.user_id);
            }
        }

        if let Some(event) = self.feed.iter().find(|event| event.identity.is_empty()) {
            bail!("feed event at {}ms has an empty identity", event.after_ms);
        }

        Ok(())
    }

    pub fn reconciler_config(&self) -> ReconcilerConfig {
        ReconcilerConfig::from(self)
    }

    pub fn data_dir(&self) -> &Path {
        &self.app_config.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[test]
    fn default_config_is_the_demo_meeting() {
        let config = Config::default();
        assert_eq!(config.local_viewer, UserId::from("3"));
        assert_eq!(config.removal_delay_ms, 2000);
        assert!(config.self_connect);
        assert_eq!(
            config.roster,
            vec![
                RosterParticipant::new("1", "pirmas", CallStatus::Hangup),
                RosterParticipant::new("2", "antras", CallStatus::InCall),
                RosterParticipant::new("3", "trecias", CallStatus::InCall),
            ]
        );
        config.validate().unwrap();
    }

    #[test]
    fn reconciler_config_follows_config() {
        let mut config = Config::default();
        config.removal_delay_ms = 500;
        config.ignore_duplicate_connects = true;

        let reconciler = config.reconciler_config();
        assert_eq!(reconciler.local_viewer, UserId::from("3"));
        assert_eq!(reconciler.removal_delay, Duration::from_millis(500));
        assert!(reconciler.ignore_duplicate_connects);
    }

    #[test]
    fn duplicate_roster_users_are_rejected() {
        let mut config = Config::default();
        config.roster.push(RosterParticipant::new("2", "antras again", CallStatus::Calling));

        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "roster contains user 2 more than once");
    }

    #[test]
    fn empty_feed_identity_is_rejected() {
        let mut config = Config::default();
        config.feed.push(FeedEvent {
            after_ms: 100,
            event: FeedEventKind::Connect,
            identity: UserId::default(),
            session_id: None,
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn feed_parses_from_yaml() {
        let yaml = "
- after_ms: 250
  event: connect
  identity: '2'
  session_id: sid_2
- after_ms: 900
  event: disconnect
  identity: '2'
";
        let feed: Vec<FeedEvent> = serde_yml::from_str(yaml).unwrap();
        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].event, FeedEventKind::Connect);
        assert_eq!(feed[0].session_id.as_deref(), Some("sid_2"));
        assert_eq!(feed[1].event, FeedEventKind::Disconnect);
        assert_eq!(feed[1].session_id, None);
    }
}
