use clap::Parser;

/// Roster Simulator
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version = version(), about, long_about = None)]
pub struct Args {
    /// User id of the local viewer. Overrides the stored configuration.
    #[clap(long, value_name = "USER_ID")]
    pub viewer: Option<String>,

    /// How long a participant stays visible after leaving, in milliseconds.
    #[clap(long = "removal-delay", value_name = "MILLIS")]
    pub removal_delay_ms: Option<u64>,

    /// Do not connect the local viewer to the live feed on start.
    #[clap(long = "no-self-connect", action)]
    pub no_self_connect: bool,

    /// Drop connect events for identities that are already live.
    #[clap(long = "ignore-duplicate-connects", action)]
    pub ignore_duplicate_connects: bool,

    /// Run the session and the scripted feed without a terminal UI.
    #[clap(long, action)]
    pub headless: bool,

    /// In headless mode, print every published roster view as a JSON line.
    #[clap(long, action, requires = "headless")]
    pub json: bool,

    /// Enables debug level logging.
    #[clap(long = "debug", action)]
    pub debug: bool,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            if let Some(viewer) = &self.viewer {
                cache.insert("local_viewer".to_string(), viewer.clone().into());
            }
            if let Some(delay) = self.removal_delay_ms {
                cache.insert("removal_delay_ms".to_string(), delay.into());
            }
            if self.no_self_connect {
                cache.insert("self_connect".to_string(), false.into());
            }
            if self.ignore_duplicate_connects {
                cache.insert("ignore_duplicate_connects".to_string(), true.into());
            }
            Ok(cache)
        }
    }
}

pub fn version() -> String {
    let author = clap::crate_authors!();
    let config_dir_path = crate::get_config_dir().display().to_string();
    let data_dir_path = crate::get_data_dir().display().to_string();

    format!(
        "\
Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}
