use super::{CellCoord, PlayerNumber, UnitId};

/// Failures of world construction and lookups.
///
/// Every participant builds the same world, so a failed lookup by id means
/// the instances have diverged; callers treat these as fatal for the request.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorldError {
    #[error("unknown unit {0}")]
    UnknownUnit(UnitId),

    #[error("unknown cell {0}")]
    UnknownCell(CellCoord),

    #[error("unknown player {0}")]
    UnknownPlayer(PlayerNumber),

    #[error("cell {0} is defined twice")]
    DuplicateCell(CellCoord),

    #[error("player numbers must be contiguous from 0, found {found} at position {expected}")]
    NonContiguousPlayers { expected: u8, found: PlayerNumber },

    #[error("a session needs at least one player")]
    NoPlayers,

    #[error("too many players: {0}")]
    TooManyPlayers(usize),

    #[error("cell {0} cannot hold another unit")]
    CellFull(CellCoord),

    #[error("cell {0} is not traversable")]
    CellBlocked(CellCoord),
}
