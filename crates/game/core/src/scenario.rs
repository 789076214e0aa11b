//! Scenario files: board layout, seats and initial unit placement.
//!
//! A scenario is pure data loaded from RON. Every instance of a session
//! builds its [`World`] from the same scenario, so unit ids and cell order
//! match across instances without being transmitted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::state::{
    Cell, CellCoord, PlayerNumber, PlayerSpec, Topology, UnitId, UnitStats, World, WorldError,
};

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid scenario: {0}")]
    World(#[from] WorldError),
}

/// Terrain that differs from a plain cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellOverride {
    pub coord: CellCoord,
    #[serde(default)]
    pub height: i32,
    #[serde(default = "default_movement_cost")]
    pub movement_cost: u32,
    #[serde(default = "default_traversable")]
    pub traversable: bool,
}

fn default_movement_cost() -> u32 {
    crate::GameConfig::DEFAULT_MOVEMENT_COST
}

fn default_traversable() -> bool {
    true
}

/// One unit to place at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub owner: PlayerNumber,
    pub cell: CellCoord,
    #[serde(default)]
    pub stats: UnitStats,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub topology: Topology,
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub cells: Vec<CellOverride>,
    pub players: Vec<PlayerSpec>,
    pub units: Vec<UnitSpec>,
}

impl Scenario {
    pub fn from_ron(source: &str) -> Result<Self, ScenarioError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron(&source)
    }

    /// Builds the initial world. Units are created in listing order, so the
    /// `n`th entry becomes `UnitId(n)`.
    pub fn build_world(&self) -> Result<World, ScenarioError> {
        let mut world = World::new(self.topology, self.players.clone())?;

        for spec in &self.cells {
            let mut cell = Cell::new(spec.coord)
                .with_height(spec.height)
                .with_movement_cost(spec.movement_cost);
            if !spec.traversable {
                cell = cell.blocked();
            }
            world.insert_cell(cell)?;
        }
        world.fill_rect(self.width, self.height);

        for unit in &self.units {
            world.add_unit(unit.owner, Some(unit.cell), unit.stats)?;
        }
        Ok(world)
    }

    /// Ids the scenario's units will receive.
    pub fn unit_ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        (0..self.units.len() as u32).map(UnitId)
    }
}
