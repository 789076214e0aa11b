use game_core::{Unit, World};

use super::UnitEvaluator;

/// 1.0 when one hit kills the target.
#[derive(Debug, Default, Clone, Copy)]
pub struct KillUnitEvaluator;

impl UnitEvaluator for KillUnitEvaluator {
    fn name(&self) -> &'static str {
        "kill"
    }

    fn evaluate(&self, target: &Unit, unit: &Unit, _world: &World) -> f32 {
        if unit.damage_against(target) >= target.hit_points {
            1.0
        } else {
            0.0
        }
    }
}

/// Damage of one hit relative to the target's remaining hit points.
#[derive(Debug, Default, Clone, Copy)]
pub struct DamageUnitEvaluator;

impl UnitEvaluator for DamageUnitEvaluator {
    fn name(&self) -> &'static str {
        "damage_unit"
    }

    fn evaluate(&self, target: &Unit, unit: &Unit, _world: &World) -> f32 {
        if target.hit_points == 0 {
            return 1.0;
        }
        (unit.damage_against(target) as f32 / target.hit_points as f32).min(1.0)
    }
}

/// Prefers targets that are already weakened.
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthUnitEvaluator;

impl UnitEvaluator for HealthUnitEvaluator {
    fn name(&self) -> &'static str {
        "health"
    }

    fn evaluate(&self, target: &Unit, _unit: &Unit, _world: &World) -> f32 {
        1.0 - target.health_ratio()
    }
}
