/// Compile-time limits and defaults shared by every instance of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GameConfig;

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Upper bound on seats in one session.
    pub const MAX_PLAYERS: usize = 16;
    /// Units that may share one cell.
    pub const MAX_OCCUPANTS_PER_CELL: usize = 4;

    // ===== defaults =====
    pub const DEFAULT_MOVEMENT_COST: u32 = 1;
}
