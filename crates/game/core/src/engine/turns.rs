use crate::state::{PlayerNumber, UnitMark};

use super::GameEngine;

/// Turn bookkeeping for GameEngine.
impl<'a> GameEngine<'a> {
    /// Refills the ability points of every unit `player` owns and marks them
    /// friendly. Everyone else's units return to normal.
    pub fn begin_turn(&mut self, player: PlayerNumber) {
        for unit in self.world.units_mut() {
            if unit.owner == player {
                unit.on_turn_start();
            } else {
                unit.mark = UnitMark::Normal;
            }
        }
    }

    /// Clears presentation marks on `player`'s units.
    pub fn end_turn(&mut self, player: PlayerNumber) {
        for unit in self.world.units_mut().filter(|u| u.owner == player) {
            unit.on_turn_end();
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::CommandKind;
    use crate::engine::GameEngine;
    use crate::state::{CellCoord, PlayerNumber, Topology, UnitMark, UnitStats, World};

    #[test]
    fn begin_turn_refills_points() {
        let mut world = World::with_players(Topology::Square, 2).unwrap();
        world.fill_rect(3, 1);
        let id = world
            .add_unit(PlayerNumber(0), Some(CellCoord::new(0, 0)), UnitStats::default())
            .unwrap();

        let mut engine = GameEngine::new(&mut world);
        engine
            .execute(
                PlayerNumber(0),
                &CommandKind::Move {
                    unit: id,
                    destination: CellCoord::new(2, 0),
                },
            )
            .unwrap();
        engine.begin_turn(PlayerNumber(0));

        let unit = world.unit(id).unwrap();
        assert_eq!(unit.movement_points, unit.total_movement_points);
        assert_eq!(unit.mark, UnitMark::Friendly);

        GameEngine::new(&mut world).end_turn(PlayerNumber(0));
        assert_eq!(world.unit(id).unwrap().mark, UnitMark::Normal);
    }
}
