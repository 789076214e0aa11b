use crate::state::{PlayerNumber, World};

/// Final standings, produced once when the game ends.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameResult {
    pub winners: Vec<PlayerNumber>,
    pub losers: Vec<PlayerNumber>,
}

/// Checked after every executed command.
pub trait GameEndCondition: Send + Sync {
    fn evaluate(&self, world: &World) -> Option<GameResult>;
}

/// The game ends when at most one player still controls units.
///
/// A single-seat session ends once that seat has no units left.
#[derive(Debug, Clone, Copy, Default)]
pub struct DominationCondition;

impl GameEndCondition for DominationCondition {
    fn evaluate(&self, world: &World) -> Option<GameResult> {
        let (winners, losers): (Vec<_>, Vec<_>) = world
            .players()
            .iter()
            .map(|p| p.number)
            .partition(|number| world.has_units(*number));

        let over = if world.player_count() > 1 {
            winners.len() <= 1
        } else {
            winners.is_empty()
        };
        over.then_some(GameResult { winners, losers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellCoord, Topology, UnitStats};

    #[test]
    fn last_player_standing_wins() {
        let mut world = World::with_players(Topology::Square, 3).unwrap();
        world.fill_rect(3, 1);
        let a = world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(0, 0)), UnitStats::default())
            .unwrap();
        world
            .add_unit(PlayerNumber(2), Some(CellCoord::new(2, 0)), UnitStats::default())
            .unwrap();

        assert_eq!(DominationCondition.evaluate(&world), None);

        world.remove_unit(a).unwrap();
        assert_eq!(
            DominationCondition.evaluate(&world),
            Some(GameResult {
                winners: vec![PlayerNumber(2)],
                losers: vec![PlayerNumber(0), PlayerNumber(1)],
            })
        );
    }
}
