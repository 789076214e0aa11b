//! Headless skirmish client.
//!
//! Composition root that loads a scenario and plays it on two session
//! instances linked in memory, each automating one seat. The match doubles
//! as a lockstep check: both instances must end with the same board.
//!
//! # Examples
//!
//! ```bash
//! # Bundled scenario, no pauses
//! TURN_START_DELAY_MS=0 UNIT_DELAY_MS=0 MOVE_DELAY_MS=0 cargo run -p skirmish-client
//!
//! # Custom scenario with AI decision traces in a log file
//! SKIRMISH_SCENARIO=maps/ridge.ron SKIRMISH_LOG_DIR=logs RUST_LOG=runtime::ai=trace \
//!     cargo run -p skirmish-client
//! ```

mod config;
mod logging;
mod skirmish;

use anyhow::Result;
use config::ClientConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = ClientConfig::from_env();
    let _guard = logging::setup_logging(config.log_dir.as_deref())?;

    let scenario = skirmish::load_scenario(&config)?;
    tracing::info!(
        players = scenario.players.len(),
        units = scenario.units.len(),
        width = scenario.width,
        height = scenario.height,
        "scenario loaded"
    );

    let report = skirmish::play(&config, &scenario).await?;
    tracing::info!(
        winners = ?report.result.winners,
        turns = report.turns,
        broadcasts = report.broadcasts,
        replayed = report.replayed,
        "match finished"
    );
    Ok(())
}
