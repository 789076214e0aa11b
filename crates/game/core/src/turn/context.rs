use crate::state::{PlayerNumber, UnitId, World};

/// Which units the current player may act with.
///
/// This is a query, not a snapshot: units can die mid-turn, so callers
/// evaluate it against the world at the moment they need the list.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayableUnits {
    /// Every unit the player owns.
    OwnedBy(PlayerNumber),
    /// A fixed roster, filtered to units still on the board.
    Listed(Vec<UnitId>),
}

impl PlayableUnits {
    pub fn evaluate(&self, world: &World) -> Vec<UnitId> {
        match self {
            PlayableUnits::OwnedBy(player) => world.friendly_units(*player).map(|u| u.id).collect(),
            PlayableUnits::Listed(ids) => ids
                .iter()
                .copied()
                .filter(|id| world.contains_unit(*id))
                .collect(),
        }
    }
}

/// The current player plus the units they may act with.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnContext {
    /// 1-based turn counter, incremented on every transition.
    pub turn: u32,
    pub current_player: PlayerNumber,
    pub playable: PlayableUnits,
}

impl TurnContext {
    pub fn new(turn: u32, current_player: PlayerNumber) -> Self {
        Self {
            turn,
            current_player,
            playable: PlayableUnits::OwnedBy(current_player),
        }
    }

    /// Evaluates [`PlayableUnits`] against the world as it is now.
    pub fn playable_units(&self, world: &World) -> Vec<UnitId> {
        self.playable.evaluate(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellCoord, Topology, UnitStats};

    #[test]
    fn playable_units_reflect_removals() {
        let mut world = World::with_players(Topology::Square, 2).unwrap();
        world.fill_rect(2, 2);
        let a = world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(0, 0)), UnitStats::default())
            .unwrap();
        let b = world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(1, 0)), UnitStats::default())
            .unwrap();
        world
            .add_unit(PlayerNumber(1), Some(CellCoord::new(1, 1)), UnitStats::default())
            .unwrap();

        let ctx = TurnContext::new(1, PlayerNumber(0));
        assert_eq!(ctx.playable_units(&world), vec![a, b]);

        world.remove_unit(a).unwrap();
        assert_eq!(ctx.playable_units(&world), vec![b]);

        let listed = PlayableUnits::Listed(vec![a, b]);
        assert_eq!(listed.evaluate(&world), vec![b]);
    }
}
