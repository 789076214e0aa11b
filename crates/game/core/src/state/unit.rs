use super::{CellCoord, PlayerNumber, UnitId};

/// Base numbers a unit is created with.
///
/// Pure data supplied by the scenario; the engine attaches no meaning to
/// particular values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitStats {
    pub hit_points: u32,
    pub attack_factor: u32,
    pub defence_factor: u32,
    pub attack_range: u32,
    pub movement_points: u32,
    pub action_points: u32,
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            hit_points: 10,
            attack_factor: 3,
            defence_factor: 1,
            attack_range: 1,
            movement_points: 3,
            action_points: 1,
        }
    }
}

/// Presentation hint raised by the unit mutation hooks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitMark {
    #[default]
    Normal,
    /// Owned by the player whose turn it is.
    Friendly,
    /// Currently acting or picked by a human.
    Selected,
    /// Done for this turn.
    Finished,
}

/// A unit on the board.
///
/// Ability usage (`movement_points`, `action_points`) is spent by commands and
/// refilled by [`Unit::on_turn_start`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub id: UnitId,
    pub owner: PlayerNumber,
    pub cell: Option<CellCoord>,
    pub hit_points: u32,
    pub max_hit_points: u32,
    pub attack_factor: u32,
    pub defence_factor: u32,
    pub attack_range: u32,
    pub movement_points: u32,
    pub total_movement_points: u32,
    pub action_points: u32,
    pub total_action_points: u32,
    pub mark: UnitMark,
}

impl Unit {
    pub fn new(id: UnitId, owner: PlayerNumber, cell: Option<CellCoord>, stats: UnitStats) -> Self {
        Self {
            id,
            owner,
            cell,
            hit_points: stats.hit_points,
            max_hit_points: stats.hit_points,
            attack_factor: stats.attack_factor,
            defence_factor: stats.defence_factor,
            attack_range: stats.attack_range,
            movement_points: stats.movement_points,
            total_movement_points: stats.movement_points,
            action_points: stats.action_points,
            total_action_points: stats.action_points,
            mark: UnitMark::Normal,
        }
    }

    /// Refills per-turn ability points.
    pub fn on_turn_start(&mut self) {
        self.movement_points = self.total_movement_points;
        self.action_points = self.total_action_points;
        self.mark = UnitMark::Friendly;
    }

    pub fn on_turn_end(&mut self) {
        self.mark = UnitMark::Normal;
    }

    pub fn is_enemy_of(&self, other: &Unit) -> bool {
        self.owner != other.owner
    }

    /// Damage this unit deals to `target` with one attack (never below 1).
    pub fn damage_against(&self, target: &Unit) -> u32 {
        self.attack_factor
            .saturating_sub(target.defence_factor)
            .max(1)
    }

    pub fn health_ratio(&self) -> f32 {
        if self.max_hit_points == 0 {
            return 0.0;
        }
        self.hit_points as f32 / self.max_hit_points as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(attack: u32, defence: u32) -> Unit {
        Unit::new(
            UnitId(1),
            PlayerNumber(0),
            None,
            UnitStats {
                attack_factor: attack,
                defence_factor: defence,
                ..UnitStats::default()
            },
        )
    }

    #[test]
    fn damage_never_drops_below_one() {
        assert_eq!(unit(2, 0).damage_against(&unit(0, 5)), 1);
        assert_eq!(unit(7, 0).damage_against(&unit(0, 2)), 5);
    }

    #[test]
    fn turn_start_refills_points() {
        let mut u = unit(1, 1);
        u.movement_points = 0;
        u.action_points = 0;
        u.on_turn_start();
        assert_eq!(u.movement_points, u.total_movement_points);
        assert_eq!(u.action_points, u.total_action_points);
        assert_eq!(u.mark, UnitMark::Friendly);
    }
}
