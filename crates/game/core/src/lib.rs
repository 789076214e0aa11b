//! Deterministic game logic and data types shared by every session instance.
//!
//! `game-core` defines the canonical rules (board model, turn order, ability
//! execution, wire codec) and exposes pure APIs that the runtime drives. All
//! world mutation flows through [`engine::GameEngine`], and supporting crates
//! depend on the types re-exported here.
pub mod action;
pub mod config;
pub mod engine;
#[cfg(feature = "serde")]
pub mod scenario;
pub mod state;
pub mod turn;

pub use action::{
    Command, CommandDecoder, CommandKind, CommandRegistry, OpCode, Origin, TurnTransition,
    WireError, WireMessage, WirePayload,
};
pub use config::GameConfig;
pub use engine::{
    AbilityError, DominationCondition, ExecuteError, ExecuteOutcome, GameEndCondition, GameEngine,
    GameResult, WorldChange,
};
#[cfg(feature = "serde")]
pub use scenario::{Scenario, ScenarioError, UnitSpec};
pub use state::{
    Cell, CellCoord, Path, PlayerNumber, PlayerSpec, Topology, Unit, UnitId, UnitMark, UnitStats,
    World, WorldError,
};
pub use turn::{PlayableUnits, SubsequentTurnResolver, TurnContext, TurnError, TurnResolver};
