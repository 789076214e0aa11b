#![allow(dead_code)]

use std::time::Duration;

use game_core::{CellCoord, PlayerNumber, Topology, UnitId, UnitStats, World};
use runtime::{AutomatedConfig, Event, RuntimeConfig};
use tokio::sync::broadcast;

pub const P0: PlayerNumber = PlayerNumber(0);
pub const P1: PlayerNumber = PlayerNumber(1);

/// A `width x 1` strip with one unit per player at either end.
pub fn strip(width: i32, stats: [UnitStats; 2]) -> World {
    let mut world = World::with_players(Topology::Square, 2).unwrap();
    world.fill_rect(width, 1);
    world
        .add_unit(P0, Some(CellCoord::new(0, 0)), stats[0])
        .unwrap();
    world
        .add_unit(P1, Some(CellCoord::new(width - 1, 0)), stats[1])
        .unwrap();
    world
}

pub fn fragile() -> UnitStats {
    UnitStats {
        hit_points: 1,
        ..UnitStats::default()
    }
}

pub fn instant_config() -> RuntimeConfig {
    RuntimeConfig {
        automated: AutomatedConfig::instant(),
        ..RuntimeConfig::default()
    }
}

/// Lets every spawned task run until the runtime is idle.
///
/// Tests run with a paused clock, which only advances once nothing else is
/// runnable.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

pub fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Comparable view of the units on a board, ignoring presentation marks.
pub fn projection(world: &World) -> Vec<(UnitId, PlayerNumber, Option<CellCoord>, u32)> {
    let mut units: Vec<_> = world
        .units()
        .map(|u| (u.id, u.owner, u.cell, u.hit_points))
        .collect();
    units.sort_by_key(|(id, ..)| *id);
    units
}
