//! A scenario played by two linked instances, one automated seat each.
use anyhow::{Context, Result, bail};
use game_core::{GameResult, Origin, PlayerNumber, Scenario};
use runtime::{Event, LocalTransport, Runtime, SessionEvent, Topic};
use tokio::sync::broadcast;

use crate::config::ClientConfig;

const BUNDLED: &str = include_str!("../scenarios/skirmish.ron");

const HOST_SEAT: PlayerNumber = PlayerNumber(0);
const GUEST_SEAT: PlayerNumber = PlayerNumber(1);

pub fn load_scenario(config: &ClientConfig) -> Result<Scenario> {
    match &config.scenario {
        Some(path) => Scenario::load(path)
            .with_context(|| format!("loading scenario {}", path.display())),
        None => Scenario::from_ron(BUNDLED).context("parsing bundled scenario"),
    }
}

/// Result of one match.
pub struct MatchReport {
    pub result: GameResult,
    pub turns: u32,
    pub broadcasts: u64,
    pub replayed: u64,
}

pub async fn play(config: &ClientConfig, scenario: &Scenario) -> Result<MatchReport> {
    if scenario.players.len() != 2 {
        bail!(
            "the skirmish client seats exactly two players, scenario has {}",
            scenario.players.len()
        );
    }
    let (host_link, guest_link) = LocalTransport::pair();

    let host = Runtime::builder()
        .config(config.runtime.clone())
        .world(scenario.build_world()?)
        .automated(HOST_SEAT, config.host_strategy)
        .remote(GUEST_SEAT)
        .transport(host_link)
        .build()
        .await?;
    let guest = Runtime::builder()
        .config(config.runtime.clone())
        .world(scenario.build_world()?)
        .remote(HOST_SEAT)
        .automated(GUEST_SEAT, config.guest_strategy)
        .transport(guest_link)
        .build()
        .await?;

    let mut host_events = host.subscribe(Topic::Lifecycle);
    let mut guest_events = guest.subscribe(Topic::Lifecycle);

    host.handle().initialize_game().await?;
    guest.handle().initialize_game().await?;
    // The guest starts first so it is ready for the host's opening commands.
    guest.handle().start_game(Origin::Local).await?;
    host.handle().start_game(Origin::Local).await?;
    tracing::info!(
        host = %config.host_strategy,
        guest = %config.guest_strategy,
        "match started"
    );

    let (host_result, guest_result) = tokio::time::timeout(config.match_timeout, async {
        tokio::join!(
            wait_for_end(&mut host_events),
            wait_for_end(&mut guest_events)
        )
    })
    .await
    .context("match did not finish in time")?;
    let (host_result, guest_result) = (host_result?, guest_result?);

    let host_view = host.handle().snapshot().await?;
    let guest_view = guest.handle().snapshot().await?;
    if host_result != guest_result || !same_board(&host_view.world, &guest_view.world) {
        bail!("instances diverged: host {host_result:?}, guest {guest_result:?}");
    }

    let host_metrics = host.replay().map(|r| r.metrics().snapshot()).unwrap_or_default();
    let guest_metrics = guest.replay().map(|r| r.metrics().snapshot()).unwrap_or_default();
    tracing::debug!(?host_metrics, ?guest_metrics, "replay metrics");

    host.shutdown().await?;
    guest.shutdown().await?;

    Ok(MatchReport {
        result: host_result,
        turns: host_view.turn.map_or(0, |t| t.turn),
        broadcasts: host_metrics.broadcasts + guest_metrics.broadcasts,
        replayed: host_metrics.applied + guest_metrics.applied,
    })
}

async fn wait_for_end(events: &mut broadcast::Receiver<Event>) -> Result<GameResult> {
    loop {
        match events.recv().await {
            Ok(Event::Session(SessionEvent::GameEnded { result })) => return Ok(result),
            Ok(Event::Session(SessionEvent::TurnStarted { context })) => {
                tracing::debug!(turn = context.turn, player = %context.current_player, "turn");
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "lifecycle events lagged");
            }
            Err(broadcast::error::RecvError::Closed) => bail!("session closed before the game ended"),
        }
    }
}

fn same_board(a: &game_core::World, b: &game_core::World) -> bool {
    let view = |w: &game_core::World| {
        w.units()
            .map(|u| (u.id, u.owner, u.cell, u.hit_points))
            .collect::<Vec<_>>()
    };
    view(a) == view(b)
}
