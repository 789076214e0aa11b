use std::fmt;

/// Seat of a participant in the session.
///
/// Numbers are contiguous from zero and stable for the whole session; turn
/// order is derived from them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PlayerNumber(pub u8);

impl PlayerNumber {
    /// Next seat in ascending order, wrapping at `player_count`.
    #[inline]
    pub fn next(self, player_count: usize) -> Self {
        debug_assert!(player_count > 0);
        Self(((self.0 as usize + 1) % player_count) as u8)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Unique identifier for a unit tracked by the world.
///
/// Allocated sequentially by [`crate::World::add_unit`], so every instance
/// that builds the same world hands out the same ids.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Discrete grid coordinate.
///
/// Interpreted as cartesian `(x, y)` on square grids and as axial `(q, r)`
/// on hex grids; see [`Topology`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shifted coordinate, or `None` if it leaves the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Grid connectivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Topology {
    /// Four-neighbourhood, Manhattan distance.
    #[default]
    Square,
    /// Axial coordinates, six-neighbourhood.
    Hex,
}

const SQUARE_NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const HEX_NEIGHBOURS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

impl Topology {
    /// Grid distance between two coordinates, saturating at `u32::MAX`.
    pub fn distance(self, a: CellCoord, b: CellCoord) -> u32 {
        let dx = i64::from(a.x) - i64::from(b.x);
        let dy = i64::from(a.y) - i64::from(b.y);
        let steps = match self {
            Topology::Square => dx.unsigned_abs() + dy.unsigned_abs(),
            Topology::Hex => {
                (dx.unsigned_abs() + dy.unsigned_abs() + (dx + dy).unsigned_abs()) / 2
            }
        };
        u32::try_from(steps).unwrap_or(u32::MAX)
    }

    /// Adjacent coordinates, in a fixed order.
    ///
    /// Existence of the neighbouring cells is the world's concern. Offsets
    /// past the edge of the coordinate space are skipped.
    pub fn neighbours(self, coord: CellCoord) -> impl Iterator<Item = CellCoord> {
        let offsets: &'static [(i32, i32)] = match self {
            Topology::Square => &SQUARE_NEIGHBOURS,
            Topology::Hex => &HEX_NEIGHBOURS,
        };
        offsets
            .iter()
            .filter_map(move |&(dx, dy)| coord.offset(dx, dy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_player_wraps() {
        assert_eq!(PlayerNumber(0).next(3), PlayerNumber(1));
        assert_eq!(PlayerNumber(2).next(3), PlayerNumber(0));
        assert_eq!(PlayerNumber(0).next(1), PlayerNumber(0));
    }

    #[test]
    fn square_distance_is_manhattan() {
        let d = Topology::Square.distance(CellCoord::new(0, 0), CellCoord::new(2, -3));
        assert_eq!(d, 5);
    }

    #[test]
    fn hex_distance_uses_axial_metric() {
        let origin = CellCoord::ORIGIN;
        for n in Topology::Hex.neighbours(origin) {
            assert_eq!(Topology::Hex.distance(origin, n), 1);
        }
        assert_eq!(Topology::Hex.distance(origin, CellCoord::new(2, -1)), 2);
        assert_eq!(Topology::Hex.distance(origin, CellCoord::new(3, 0)), 3);
    }

    #[test]
    fn edge_of_coordinate_space_has_fewer_neighbours() {
        let corner = CellCoord::new(i32::MAX, i32::MIN);
        let square: Vec<_> = Topology::Square.neighbours(corner).collect();
        assert_eq!(
            square,
            vec![CellCoord::new(i32::MAX - 1, i32::MIN), CellCoord::new(i32::MAX, i32::MIN + 1)]
        );
        assert_eq!(Topology::Hex.neighbours(corner).count(), 3);
    }

    #[test]
    fn distance_across_the_whole_range_saturates() {
        let far = CellCoord::new(i32::MAX, i32::MAX);
        let near = CellCoord::new(i32::MIN, i32::MIN);
        assert_eq!(Topology::Square.distance(far, near), u32::MAX);
        assert_eq!(Topology::Hex.distance(far, CellCoord::new(i32::MIN, 0)), u32::MAX);
        assert_eq!(Topology::Square.distance(far, CellCoord::new(i32::MAX - 2, i32::MAX)), 2);
    }
}
