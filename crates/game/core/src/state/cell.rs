use arrayvec::ArrayVec;

use crate::config::GameConfig;

use super::{CellCoord, UnitId};

/// Static terrain data plus the set of units standing on the cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub coord: CellCoord,
    /// Elevation, used by height-aware evaluators.
    pub height: i32,
    /// Movement points spent to enter this cell.
    pub movement_cost: u32,
    /// Whether units may stand on or pass through the cell at all.
    pub traversable: bool,
    occupants: ArrayVec<UnitId, { GameConfig::MAX_OCCUPANTS_PER_CELL }>,
}

impl Cell {
    pub fn new(coord: CellCoord) -> Self {
        Self {
            coord,
            height: 0,
            movement_cost: GameConfig::DEFAULT_MOVEMENT_COST,
            traversable: true,
            occupants: ArrayVec::new(),
        }
    }

    pub fn with_height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn with_movement_cost(mut self, movement_cost: u32) -> Self {
        self.movement_cost = movement_cost;
        self
    }

    pub fn blocked(mut self) -> Self {
        self.traversable = false;
        self
    }

    pub fn occupants(&self) -> &[UnitId] {
        &self.occupants
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    /// Returns `false` when the cell is already at capacity.
    pub(crate) fn add_occupant(&mut self, unit: UnitId) -> bool {
        if self.occupants.contains(&unit) {
            return true;
        }
        self.occupants.try_push(unit).is_ok()
    }

    pub(crate) fn remove_occupant(&mut self, unit: UnitId) {
        self.occupants.retain(|id| *id != unit);
    }
}
