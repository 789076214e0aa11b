use crate::state::{PlayerNumber, World};

use super::TurnContext;

/// Errors that can occur while deciding who plays next.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnError {
    #[error("the session has no players")]
    NoPlayers,

    /// Every seat was examined and none controls a unit.
    #[error("no player after {after} controls any unit")]
    NoEligiblePlayer { after: PlayerNumber },
}

/// Decides turn order.
///
/// Implementations only read the world; the session applies the returned
/// context.
pub trait TurnResolver: Send + Sync {
    /// Context for the opening turn.
    fn resolve_start(&self, world: &World) -> Result<TurnContext, TurnError>;

    /// Context following `previous`.
    fn resolve_turn(&self, world: &World, previous: &TurnContext)
    -> Result<TurnContext, TurnError>;
}

/// Seats take turns in ascending numeric order, skipping seats without units.
///
/// The search examines each seat at most once, so a board where nobody has
/// units yields [`TurnError::NoEligiblePlayer`] instead of spinning forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubsequentTurnResolver;

impl TurnResolver for SubsequentTurnResolver {
    fn resolve_start(&self, world: &World) -> Result<TurnContext, TurnError> {
        let first = world
            .players()
            .iter()
            .map(|p| p.number)
            .min()
            .ok_or(TurnError::NoPlayers)?;
        Ok(TurnContext::new(1, first))
    }

    fn resolve_turn(
        &self,
        world: &World,
        previous: &TurnContext,
    ) -> Result<TurnContext, TurnError> {
        let player_count = world.player_count();
        if player_count == 0 {
            return Err(TurnError::NoPlayers);
        }

        let mut candidate = previous.current_player.next(player_count);
        for _ in 0..player_count {
            if world.has_units(candidate) {
                return Ok(TurnContext::new(previous.turn + 1, candidate));
            }
            candidate = candidate.next(player_count);
        }

        Err(TurnError::NoEligiblePlayer {
            after: previous.current_player,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellCoord, Topology, UnitStats};

    #[test]
    fn wraps_back_to_the_only_player_with_units() {
        let mut world = World::with_players(Topology::Square, 3).unwrap();
        world.fill_rect(3, 1);
        world
            .add_unit(PlayerNumber(1), Some(CellCoord::new(0, 0)), UnitStats::default())
            .unwrap();

        let resolver = SubsequentTurnResolver;
        let ctx = TurnContext::new(4, PlayerNumber(1));
        let next = resolver.resolve_turn(&world, &ctx).unwrap();

        assert_eq!(next.current_player, PlayerNumber(1));
        assert_eq!(next.turn, 5);
    }

    #[test]
    fn empty_board_is_reported() {
        let world = World::with_players(Topology::Square, 2).unwrap();
        let resolver = SubsequentTurnResolver;
        let ctx = TurnContext::new(1, PlayerNumber(0));

        assert_eq!(
            resolver.resolve_turn(&world, &ctx),
            Err(TurnError::NoEligiblePlayer {
                after: PlayerNumber(0)
            })
        );
    }
}
