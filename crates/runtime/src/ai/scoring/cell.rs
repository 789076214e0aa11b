use game_core::{CellCoord, Unit, World};

use super::CellEvaluator;

/// Share of enemies the unit could attack from the cell.
#[derive(Debug, Default)]
pub struct DamageCellEvaluator {
    enemy_count: usize,
}

impl CellEvaluator for DamageCellEvaluator {
    fn name(&self) -> &'static str {
        "damage_cell"
    }

    fn initialize(&mut self, unit: &Unit, world: &World) {
        self.enemy_count = world.enemy_units(unit.owner).count();
    }

    fn evaluate(&self, cell: CellCoord, unit: &Unit, world: &World) -> f32 {
        if self.enemy_count == 0 {
            return 0.0;
        }
        let in_reach = world
            .enemy_units(unit.owner)
            .filter(|enemy| world.can_attack_from(unit, cell, enemy))
            .count();
        in_reach as f32 / self.enemy_count as f32
    }
}

/// Closeness to the nearest enemy, relative to the widest span of the map.
#[derive(Debug, Default)]
pub struct DistanceToEnemyEvaluator {
    max_distance: u32,
}

impl DistanceToEnemyEvaluator {
    fn map_span(world: &World) -> u32 {
        let mut cells = world.cells().map(|c| c.coord);
        let Some(first) = cells.next() else {
            return 0;
        };
        let (mut min, mut max) = (first, first);
        for coord in cells {
            min = CellCoord::new(min.x.min(coord.x), min.y.min(coord.y));
            max = CellCoord::new(max.x.max(coord.x), max.y.max(coord.y));
        }
        world.distance(min, max).max(world.distance(
            CellCoord::new(min.x, max.y),
            CellCoord::new(max.x, min.y),
        ))
    }
}

impl CellEvaluator for DistanceToEnemyEvaluator {
    fn name(&self) -> &'static str {
        "distance_to_enemy"
    }

    fn initialize(&mut self, _unit: &Unit, world: &World) {
        self.max_distance = Self::map_span(world).max(1);
    }

    fn evaluate(&self, cell: CellCoord, unit: &Unit, world: &World) -> f32 {
        let nearest = world
            .enemy_units(unit.owner)
            .filter_map(|enemy| enemy.cell)
            .map(|at| world.distance(cell, at))
            .min();
        match nearest {
            Some(distance) => (1.0 - distance as f32 / self.max_distance as f32).clamp(0.0, 1.0),
            None => 0.0,
        }
    }
}

/// Height relative to the highest cell on the map.
#[derive(Debug, Default)]
pub struct HeightCellEvaluator {
    max_height: i32,
}

impl CellEvaluator for HeightCellEvaluator {
    fn name(&self) -> &'static str {
        "height"
    }

    fn initialize(&mut self, _unit: &Unit, world: &World) {
        self.max_height = world.max_height();
    }

    fn evaluate(&self, cell: CellCoord, _unit: &Unit, world: &World) -> f32 {
        if self.max_height <= 0 {
            return 0.0;
        }
        let height = world.cell(cell).map_or(0, |c| c.height).max(0);
        height as f32 / self.max_height as f32
    }
}

#[cfg(test)]
mod tests {
    use game_core::{Cell, PlayerNumber, Topology, UnitStats};

    use super::*;
    use crate::ai::scoring::CellScorer;

    fn lane() -> (World, Unit) {
        let mut world = World::with_players(Topology::Square, 2).unwrap();
        world
            .insert_cell(Cell::new(CellCoord::new(1, 1)).with_height(3))
            .unwrap();
        world.fill_rect(5, 2);
        let id = world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(0, 0)), UnitStats::default())
            .unwrap();
        world
            .add_unit(PlayerNumber(1), Some(CellCoord::new(4, 0)), UnitStats::default())
            .unwrap();
        let unit = world.unit(id).unwrap().clone();
        (world, unit)
    }

    #[test]
    fn distance_is_normalized_by_map_span() {
        let (world, unit) = lane();
        let mut evaluator = DistanceToEnemyEvaluator::default();
        evaluator.initialize(&unit, &world);

        // Span of a 5x2 square board is 5.
        let near = evaluator.evaluate(CellCoord::new(3, 0), &unit, &world);
        assert!((near - 0.8).abs() < 1e-6);
        assert_eq!(evaluator.evaluate(CellCoord::new(0, 1), &unit, &world), 0.0);
    }

    #[test]
    fn height_prefers_high_ground() {
        let (world, unit) = lane();
        let mut evaluator = HeightCellEvaluator::default();
        evaluator.initialize(&unit, &world);

        assert_eq!(evaluator.evaluate(CellCoord::new(1, 1), &unit, &world), 1.0);
        assert_eq!(evaluator.evaluate(CellCoord::new(1, 0), &unit, &world), 0.0);
    }

    #[test]
    fn default_scorer_moves_into_attack_range() {
        let (world, unit) = lane();
        let mut scorer = CellScorer::default();
        let candidates = std::iter::once(unit.cell.unwrap()).chain(world.reachable_cells(&unit));

        let best = scorer.best(candidates, &unit, &world, false).unwrap();

        assert_eq!(best.candidate, CellCoord::new(3, 0));
    }
}
