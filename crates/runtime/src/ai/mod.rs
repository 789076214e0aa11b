//! Decision making for automated players.
//!
//! Each automated player owns one unit tree, built once and ticked for every
//! unit it moves:
//!
//! 1. **Selection**: [`SelectionStrategy`] orders the playable units
//! 2. **Decision**: the unit tree ([`presets`]) combines conditions and leaf
//!    actions from [`nodes`]
//! 3. **Scoring**: leaf actions enumerate candidate cells or targets and
//!    commit to the best weighted sum of [`scoring`] evaluators
//!
//! Leaves never mutate the world themselves; they submit commands through
//! the [`AiContext`]'s session handle like any other player.

pub mod context;
pub mod nodes;
pub mod presets;
pub mod scoring;
pub mod selection;

pub use context::AiContext;
pub use presets::UnitTree;
pub use selection::SelectionStrategy;
