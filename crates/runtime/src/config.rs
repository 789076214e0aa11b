//! Runtime configuration.
//!
//! Defaults are tuned for a watchable headless match; every field can be
//! overridden from the environment with [`RuntimeConfig::from_env`].

use std::env;
use std::time::Duration;

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of the session worker's command channel.
    pub command_buffer_size: usize,
    /// Capacity of each event topic.
    pub event_buffer_size: usize,
    pub automated: AutomatedConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            event_buffer_size: 100,
            automated: AutomatedConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(capacity) = read_env::<usize>("SESSION_COMMAND_BUFFER") {
            config.command_buffer_size = capacity.max(1);
        }
        if let Some(capacity) = read_env::<usize>("SESSION_EVENT_BUFFER") {
            config.event_buffer_size = capacity.max(1);
        }

        // Automated player pacing
        if let Some(ms) = read_env::<u64>("TURN_START_DELAY_MS") {
            config.automated.turn_start_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("UNIT_DELAY_MS") {
            config.automated.unit_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("MOVE_DELAY_MS") {
            config.automated.move_delay = Duration::from_millis(ms);
        }
        if let Some(debug) = read_env_bool("AI_DEBUG_MODE") {
            config.automated.debug_mode = debug;
        }

        config
    }
}

/// Pacing of automated turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatedConfig {
    /// Pause before an automated player looks at the board.
    pub turn_start_delay: Duration,
    /// Pause after a unit is selected and before its tree runs.
    pub unit_delay: Duration,
    /// Pause after a move inside the default unit tree.
    pub move_delay: Duration,
    /// Wait for an explicit step signal before each unit and log every
    /// candidate score.
    pub debug_mode: bool,
}

impl Default for AutomatedConfig {
    fn default() -> Self {
        Self {
            turn_start_delay: Duration::from_millis(500),
            unit_delay: Duration::from_millis(300),
            move_delay: Duration::from_millis(200),
            debug_mode: false,
        }
    }
}

impl AutomatedConfig {
    /// No pauses at all. Used by tests and offline simulations.
    pub fn instant() -> Self {
        Self {
            turn_start_delay: Duration::ZERO,
            unit_delay: Duration::ZERO,
            move_delay: Duration::ZERO,
            debug_mode: false,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
