//! Order in which an automated player moves its units.

use std::cmp::Reverse;

use game_core::{UnitId, World};

/// Pure function of `(units, world)`; every instance orders identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStrategy {
    /// Keep the playable-units order.
    #[default]
    Subsequent,
    /// Most free adjacent cells first. Units with equal mobility keep their
    /// relative order.
    MobilityBased,
}

impl SelectionStrategy {
    pub fn order(self, mut units: Vec<UnitId>, world: &World) -> Vec<UnitId> {
        match self {
            SelectionStrategy::Subsequent => units,
            SelectionStrategy::MobilityBased => {
                units.sort_by_key(|id| {
                    Reverse(world.unit(*id).map_or(0, |u| world.free_neighbour_count(u)))
                });
                units
            }
        }
    }
}
