use std::collections::BTreeMap;

use crate::config::GameConfig;

use super::{
    Cell, CellCoord, PlayerNumber, PlayerSpec, Topology, Unit, UnitId, UnitMark, UnitStats,
    WorldError,
};

/// Complete board state: cells, units and player seats.
///
/// Collections are ordered maps so iteration order is identical on every
/// instance of a session; AI tie-breaking and unit ordering rely on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct World {
    topology: Topology,
    cells: BTreeMap<CellCoord, Cell>,
    units: BTreeMap<UnitId, Unit>,
    players: Vec<PlayerSpec>,
    next_unit_id: u32,
}

impl World {
    /// Creates an empty board for the given seats.
    ///
    /// Player numbers must be unique and contiguous from zero.
    pub fn new(topology: Topology, mut players: Vec<PlayerSpec>) -> Result<Self, WorldError> {
        if players.is_empty() {
            return Err(WorldError::NoPlayers);
        }
        if players.len() > GameConfig::MAX_PLAYERS {
            return Err(WorldError::TooManyPlayers(players.len()));
        }
        players.sort_by_key(|p| p.number);
        for (expected, player) in players.iter().enumerate() {
            if player.number.index() != expected {
                return Err(WorldError::NonContiguousPlayers {
                    expected: expected as u8,
                    found: player.number,
                });
            }
        }

        Ok(Self {
            topology,
            cells: BTreeMap::new(),
            units: BTreeMap::new(),
            players,
            next_unit_id: 0,
        })
    }

    /// Convenience constructor for `count` anonymous seats.
    pub fn with_players(topology: Topology, count: u8) -> Result<Self, WorldError> {
        Self::new(
            topology,
            (0..count).map(|n| PlayerSpec::new(PlayerNumber(n))).collect(),
        )
    }

    pub fn insert_cell(&mut self, cell: Cell) -> Result<(), WorldError> {
        if self.cells.contains_key(&cell.coord) {
            return Err(WorldError::DuplicateCell(cell.coord));
        }
        self.cells.insert(cell.coord, cell);
        Ok(())
    }

    /// Fills `0..width` x `0..height` with default cells, keeping cells that
    /// already exist.
    pub fn fill_rect(&mut self, width: i32, height: i32) {
        for y in 0..height {
            for x in 0..width {
                let coord = CellCoord::new(x, y);
                self.cells.entry(coord).or_insert_with(|| Cell::new(coord));
            }
        }
    }

    /// Places a new unit and returns its id.
    pub fn add_unit(
        &mut self,
        owner: PlayerNumber,
        cell: Option<CellCoord>,
        stats: UnitStats,
    ) -> Result<UnitId, WorldError> {
        self.player(owner).ok_or(WorldError::UnknownPlayer(owner))?;

        let id = UnitId(self.next_unit_id);
        if let Some(coord) = cell {
            let target = self
                .cells
                .get_mut(&coord)
                .ok_or(WorldError::UnknownCell(coord))?;
            if !target.traversable {
                return Err(WorldError::CellBlocked(coord));
            }
            if !target.add_occupant(id) {
                return Err(WorldError::CellFull(coord));
            }
        }

        self.next_unit_id += 1;
        self.units.insert(id, Unit::new(id, owner, cell, stats));
        Ok(id)
    }

    /// Removes a unit from the board, vacating its cell.
    pub fn remove_unit(&mut self, id: UnitId) -> Result<Unit, WorldError> {
        let unit = self.units.remove(&id).ok_or(WorldError::UnknownUnit(id))?;
        if let Some(cell) = unit.cell.and_then(|coord| self.cells.get_mut(&coord)) {
            cell.remove_occupant(id);
        }
        Ok(unit)
    }

    /// Relocates a unit without any rule checks.
    pub(crate) fn relocate_unit(&mut self, id: UnitId, to: CellCoord) -> Result<(), WorldError> {
        let from = self.unit_or_err(id)?.cell;
        let target = self.cells.get_mut(&to).ok_or(WorldError::UnknownCell(to))?;
        if !target.add_occupant(id) {
            return Err(WorldError::CellFull(to));
        }
        if let Some(cell) = from
            .filter(|coord| *coord != to)
            .and_then(|coord| self.cells.get_mut(&coord))
        {
            cell.remove_occupant(id);
        }
        if let Some(unit) = self.units.get_mut(&id) {
            unit.cell = Some(to);
        }
        Ok(())
    }

    pub fn mark_unit(&mut self, id: UnitId, mark: UnitMark) -> Result<(), WorldError> {
        self.unit_mut(id)?.mark = mark;
        Ok(())
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.values()
    }

    pub fn cell(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    /// Units in creation order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_or_err(&self, id: UnitId) -> Result<&Unit, WorldError> {
        self.unit(id).ok_or(WorldError::UnknownUnit(id))
    }

    pub(crate) fn unit_mut(&mut self, id: UnitId) -> Result<&mut Unit, WorldError> {
        self.units.get_mut(&id).ok_or(WorldError::UnknownUnit(id))
    }

    pub(crate) fn units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    pub fn contains_unit(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn friendly_units(&self, player: PlayerNumber) -> impl Iterator<Item = &Unit> {
        self.units().filter(move |u| u.owner == player)
    }

    pub fn enemy_units(&self, player: PlayerNumber) -> impl Iterator<Item = &Unit> {
        self.units().filter(move |u| u.owner != player)
    }

    pub fn unit_count(&self, player: PlayerNumber) -> usize {
        self.friendly_units(player).count()
    }

    pub fn has_units(&self, player: PlayerNumber) -> bool {
        self.friendly_units(player).next().is_some()
    }

    /// Seats ordered by number.
    pub fn players(&self) -> &[PlayerSpec] {
        &self.players
    }

    pub fn player(&self, number: PlayerNumber) -> Option<&PlayerSpec> {
        self.players.get(number.index())
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // ========================================================================
    // Geometry predicates
    // ========================================================================

    pub fn distance(&self, a: CellCoord, b: CellCoord) -> u32 {
        self.topology.distance(a, b)
    }

    /// Existing cells adjacent to `coord`.
    pub fn neighbours(&self, coord: CellCoord) -> impl Iterator<Item = &Cell> {
        self.topology
            .neighbours(coord)
            .filter_map(|c| self.cells.get(&c))
    }

    /// `unit` may pass through `cell`: the cell is open terrain and holds no
    /// enemy of the unit.
    pub fn is_cell_traversable(&self, unit: &Unit, cell: &Cell) -> bool {
        cell.traversable
            && cell
                .occupants()
                .iter()
                .filter_map(|id| self.unit(*id))
                .all(|other| !other.is_enemy_of(unit))
    }

    /// `unit` may end a move on `cell`: the cell is open terrain and empty.
    pub fn is_cell_movable_to(&self, _unit: &Unit, cell: &Cell) -> bool {
        cell.traversable && !cell.is_occupied()
    }

    pub fn movement_cost(&self, cell: &Cell) -> u32 {
        cell.movement_cost
    }

    /// Number of adjacent cells `unit` could step onto.
    pub fn free_neighbour_count(&self, unit: &Unit) -> usize {
        let Some(coord) = unit.cell else {
            return 0;
        };
        self.neighbours(coord)
            .filter(|cell| self.is_cell_movable_to(unit, cell))
            .count()
    }

    /// Whether `attacker` could hit `target` from `from` (range and ownership
    /// only; ability points are checked by the engine).
    pub fn can_attack_from(&self, attacker: &Unit, from: CellCoord, target: &Unit) -> bool {
        attacker.is_enemy_of(target)
            && target
                .cell
                .is_some_and(|to| self.distance(from, to) <= attacker.attack_range)
    }

    /// Enemies `attacker` could hit from its current cell.
    pub fn attackable_targets<'a>(&'a self, attacker: &'a Unit) -> impl Iterator<Item = &'a Unit> {
        let from = attacker.cell;
        self.enemy_units(attacker.owner).filter(move |target| {
            from.is_some_and(|from| self.can_attack_from(attacker, from, target))
        })
    }

    pub fn max_height(&self) -> i32 {
        self.cells().map(|c| c.height).max().unwrap_or(0)
    }
}
