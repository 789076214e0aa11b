//! Movement range and path search.
//!
//! Dijkstra over traversable cells, charging each cell's movement cost on
//! entry. The frontier is keyed by `(cost, coord)` so equal-cost expansions
//! happen in coordinate order and every instance derives the same paths.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use super::{CellCoord, Unit, World};

/// A route for one unit, excluding its starting cell.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    pub cells: Vec<CellCoord>,
    pub cost: u32,
}

impl Path {
    pub fn destination(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }
}

#[derive(Clone, Copy)]
struct Visit {
    cost: u32,
    previous: Option<CellCoord>,
}

impl World {
    /// Cells `unit` can end a move on this turn, in coordinate order.
    ///
    /// Excludes the unit's own cell.
    pub fn reachable_cells(&self, unit: &Unit) -> Vec<CellCoord> {
        let visits = self.explore(unit, unit.movement_points);
        visits
            .iter()
            .filter(|(coord, visit)| visit.previous.is_some() && self.can_stop_at(unit, **coord))
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Cheapest path to `destination` within the unit's remaining movement.
    pub fn find_path(&self, unit: &Unit, destination: CellCoord) -> Option<Path> {
        if !self.can_stop_at(unit, destination) {
            return None;
        }
        let visits = self.explore(unit, unit.movement_points);
        let total = visits.get(&destination)?.cost;

        let mut cells = Vec::new();
        let mut cursor = destination;
        while let Some(visit) = visits.get(&cursor) {
            let Some(previous) = visit.previous else {
                break;
            };
            cells.push(cursor);
            cursor = previous;
        }
        cells.reverse();

        if cells.is_empty() {
            return None;
        }
        Some(Path { cells, cost: total })
    }

    fn can_stop_at(&self, unit: &Unit, coord: CellCoord) -> bool {
        self.cell(coord)
            .is_some_and(|cell| self.is_cell_movable_to(unit, cell))
    }

    fn explore(&self, unit: &Unit, budget: u32) -> BTreeMap<CellCoord, Visit> {
        let mut visits = BTreeMap::new();
        let Some(start) = unit.cell else {
            return visits;
        };

        visits.insert(
            start,
            Visit {
                cost: 0,
                previous: None,
            },
        );
        let mut frontier = BinaryHeap::new();
        frontier.push(Reverse((0u32, start)));

        while let Some(Reverse((cost, coord))) = frontier.pop() {
            if visits.get(&coord).is_some_and(|v| v.cost < cost) {
                continue;
            }
            for next in self.neighbours(coord) {
                if !self.is_cell_traversable(unit, next) {
                    continue;
                }
                let next_cost = cost.saturating_add(self.movement_cost(next));
                if next_cost > budget {
                    continue;
                }
                let better = visits
                    .get(&next.coord)
                    .is_none_or(|existing| next_cost < existing.cost);
                if better {
                    visits.insert(
                        next.coord,
                        Visit {
                            cost: next_cost,
                            previous: Some(coord),
                        },
                    );
                    frontier.push(Reverse((next_cost, next.coord)));
                }
            }
        }

        visits
    }
}

#[cfg(test)]
mod tests {
    use crate::state::{Cell, PlayerNumber, Topology, UnitStats};

    use super::*;

    fn corridor() -> (World, crate::UnitId) {
        // 4x1 corridor with an expensive cell in the middle.
        let mut world = World::with_players(Topology::Square, 2).unwrap();
        world.insert_cell(Cell::new(CellCoord::new(0, 0))).unwrap();
        world
            .insert_cell(Cell::new(CellCoord::new(1, 0)).with_movement_cost(2))
            .unwrap();
        world.insert_cell(Cell::new(CellCoord::new(2, 0))).unwrap();
        world.insert_cell(Cell::new(CellCoord::new(3, 0))).unwrap();
        let id = world
            .add_unit(
                PlayerNumber(0),
                Some(CellCoord::new(0, 0)),
                UnitStats {
                    movement_points: 3,
                    ..UnitStats::default()
                },
            )
            .unwrap();
        (world, id)
    }

    #[test]
    fn movement_budget_limits_range() {
        let (world, id) = corridor();
        let unit = world.unit(id).unwrap();

        assert_eq!(
            world.reachable_cells(unit),
            vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]
        );
    }

    #[test]
    fn path_accumulates_entry_costs() {
        let (world, id) = corridor();
        let unit = world.unit(id).unwrap();

        let path = world.find_path(unit, CellCoord::new(2, 0)).unwrap();
        assert_eq!(path.cells, vec![CellCoord::new(1, 0), CellCoord::new(2, 0)]);
        assert_eq!(path.cost, 3);
        assert!(world.find_path(unit, CellCoord::new(3, 0)).is_none());
    }

    #[test]
    fn enemies_block_paths() {
        let (mut world, id) = corridor();
        world
            .add_unit(PlayerNumber(1), Some(CellCoord::new(1, 0)), UnitStats::default())
            .unwrap();
        let unit = world.unit(id).unwrap();

        assert!(world.reachable_cells(unit).is_empty());
    }

    #[test]
    fn friendly_units_can_be_passed_but_not_stopped_on() {
        let (mut world, id) = corridor();
        world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(1, 0)), UnitStats::default())
            .unwrap();
        let unit = world.unit(id).unwrap();

        assert_eq!(world.reachable_cells(unit), vec![CellCoord::new(2, 0)]);
    }

    #[test]
    fn units_on_the_coordinate_edge_can_still_move() {
        let mut world = World::with_players(Topology::Square, 2).unwrap();
        let edge = CellCoord::new(i32::MAX, 0);
        let inside = CellCoord::new(i32::MAX - 1, 0);
        world.insert_cell(Cell::new(edge)).unwrap();
        world.insert_cell(Cell::new(inside)).unwrap();
        let id = world
            .add_unit(PlayerNumber(0), Some(edge), UnitStats::default())
            .unwrap();
        let unit = world.unit(id).unwrap();

        assert_eq!(world.reachable_cells(unit), vec![inside]);
        assert_eq!(world.find_path(unit, inside).unwrap().cost, 1);
    }
}
