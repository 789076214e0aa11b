//! Ability execution and turn bookkeeping.
//!
//! The [`GameEngine`] is the only writer of a [`World`]. It validates a
//! command against the board, applies it, and reports what changed so the
//! runtime can publish events without diffing state.

mod end;
mod errors;
mod turns;

pub use end::{DominationCondition, GameEndCondition, GameResult};
pub use errors::{AbilityError, ExecuteError};

use crate::action::CommandKind;
use crate::state::{CellCoord, Path, PlayerNumber, UnitId, World};

/// One observable effect of a command.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldChange {
    UnitMoved {
        unit: UnitId,
        from: CellCoord,
        path: Path,
    },
    UnitAttacked {
        attacker: UnitId,
        target: UnitId,
        damage: u32,
        remaining_hit_points: u32,
    },
    UnitRemoved {
        unit: UnitId,
        owner: PlayerNumber,
    },
}

/// Complete outcome of a command, in application order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecuteOutcome {
    pub changes: Vec<WorldChange>,
}

impl ExecuteOutcome {
    /// Units removed by this command.
    pub fn removed_units(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.changes.iter().filter_map(|change| match change {
            WorldChange::UnitRemoved { unit, .. } => Some(*unit),
            _ => None,
        })
    }
}

/// Applies commands to a borrowed world.
///
/// Every check runs before the first mutation, so a rejected command leaves
/// the world untouched.
pub struct GameEngine<'a> {
    world: &'a mut World,
}

impl<'a> GameEngine<'a> {
    pub fn new(world: &'a mut World) -> Self {
        Self { world }
    }

    pub fn world(&self) -> &World {
        self.world
    }

    /// Executes `kind` on behalf of `current`, the player whose turn it is.
    pub fn execute(
        &mut self,
        current: PlayerNumber,
        kind: &CommandKind,
    ) -> Result<ExecuteOutcome, ExecuteError> {
        self.validate_actor(current, kind.actor())?;

        match *kind {
            CommandKind::Move { unit, destination } => self.apply_move(unit, destination),
            CommandKind::Attack { attacker, target } => self.apply_attack(attacker, target),
        }
    }

    fn validate_actor(&self, current: PlayerNumber, unit: UnitId) -> Result<(), ExecuteError> {
        let owner = self.world.unit_or_err(unit)?.owner;
        if owner != current {
            return Err(ExecuteError::ActorNotCurrent {
                unit,
                owner,
                current,
            });
        }
        Ok(())
    }

    fn apply_move(
        &mut self,
        id: UnitId,
        destination: CellCoord,
    ) -> Result<ExecuteOutcome, ExecuteError> {
        let unit = self.world.unit_or_err(id)?;
        let from = unit.cell.ok_or(ExecuteError::Move(AbilityError::NotOnBoard(id)))?;
        if unit.movement_points == 0 {
            return Err(ExecuteError::Move(AbilityError::NoMovementPoints(id)));
        }
        let path = self.world.find_path(unit, destination).ok_or(ExecuteError::Move(
            AbilityError::Unreachable {
                unit: id,
                destination,
            },
        ))?;

        self.world.relocate_unit(id, destination)?;
        let unit = self.world.unit_mut(id)?;
        unit.movement_points = unit.movement_points.saturating_sub(path.cost);

        Ok(ExecuteOutcome {
            changes: vec![WorldChange::UnitMoved {
                unit: id,
                from,
                path,
            }],
        })
    }

    fn apply_attack(
        &mut self,
        attacker_id: UnitId,
        target_id: UnitId,
    ) -> Result<ExecuteOutcome, ExecuteError> {
        let attacker = self.world.unit_or_err(attacker_id)?;
        let target = self.world.unit_or_err(target_id)?;

        let reject = ExecuteError::Attack;
        if attacker.action_points == 0 {
            return Err(reject(AbilityError::NoActionPoints(attacker_id)));
        }
        if !attacker.is_enemy_of(target) {
            return Err(reject(AbilityError::FriendlyTarget {
                attacker: attacker_id,
                target: target_id,
            }));
        }
        let from = attacker
            .cell
            .ok_or(reject(AbilityError::NotOnBoard(attacker_id)))?;
        if !self.world.can_attack_from(attacker, from, target) {
            return Err(reject(AbilityError::OutOfRange {
                attacker: attacker_id,
                target: target_id,
            }));
        }

        let damage = attacker.damage_against(target);

        self.world.unit_mut(attacker_id)?.action_points -= 1;
        let target = self.world.unit_mut(target_id)?;
        target.hit_points = target.hit_points.saturating_sub(damage);
        let remaining_hit_points = target.hit_points;
        let owner = target.owner;

        let mut changes = vec![WorldChange::UnitAttacked {
            attacker: attacker_id,
            target: target_id,
            damage,
            remaining_hit_points,
        }];
        if remaining_hit_points == 0 {
            self.world.remove_unit(target_id)?;
            changes.push(WorldChange::UnitRemoved {
                unit: target_id,
                owner,
            });
        }

        Ok(ExecuteOutcome { changes })
    }
}
