//! Client configuration loaded from the environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use runtime::{RuntimeConfig, SelectionStrategy};

/// Everything the headless client needs besides the scenario itself.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub runtime: RuntimeConfig,
    /// Scenario file; the bundled skirmish is used when unset.
    pub scenario: Option<PathBuf>,
    /// Directory for the log file. Logs go to stderr only when unset.
    pub log_dir: Option<PathBuf>,
    pub host_strategy: SelectionStrategy,
    pub guest_strategy: SelectionStrategy,
    /// Upper bound on one match.
    pub match_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            runtime: RuntimeConfig::default(),
            scenario: None,
            log_dir: None,
            host_strategy: SelectionStrategy::MobilityBased,
            guest_strategy: SelectionStrategy::Subsequent,
            match_timeout: Duration::from_secs(600),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `SKIRMISH_SCENARIO` - Path to a RON scenario (default: bundled)
    /// - `SKIRMISH_LOG_DIR` - Write `skirmish.log` into this directory
    /// - `SKIRMISH_HOST_STRATEGY` - `subsequent` or `mobility_based`
    /// - `SKIRMISH_GUEST_STRATEGY` - `subsequent` or `mobility_based`
    /// - `SKIRMISH_TIMEOUT_SECS` - Abort the match after this long (default: 600)
    ///
    /// Runtime variables are read by [`RuntimeConfig::from_env`].
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        config.scenario = env::var("SKIRMISH_SCENARIO").ok().map(PathBuf::from);
        config.log_dir = env::var("SKIRMISH_LOG_DIR").ok().map(PathBuf::from);

        if let Some(strategy) = read_env::<SelectionStrategy>("SKIRMISH_HOST_STRATEGY") {
            config.host_strategy = strategy;
        }
        if let Some(strategy) = read_env::<SelectionStrategy>("SKIRMISH_GUEST_STRATEGY") {
            config.guest_strategy = strategy;
        }
        if let Some(secs) = read_env::<u64>("SKIRMISH_TIMEOUT_SECS") {
            config.match_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
