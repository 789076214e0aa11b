//! Authoritative board representation.
//!
//! This module owns the data structures that describe cells, units and
//! player seats, plus the geometry predicates and path search the rest of
//! the engine builds on. Runtime layers clone or query the world but mutate
//! it exclusively through [`crate::GameEngine`].
mod cell;
mod common;
mod error;
mod path;
mod player;
mod unit;
mod world;

pub use cell::Cell;
pub use common::{CellCoord, PlayerNumber, Topology, UnitId};
pub use error::WorldError;
pub use path::Path;
pub use player::PlayerSpec;
pub use unit::{Unit, UnitMark, UnitStats};
pub use world::World;
