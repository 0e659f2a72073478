//! Top-down survivors-style arena game
//!
//! Enemies spawn on a ring around the player, steer with a small state
//! machine plus obstacle repulsion, and drain health on contact. Kills
//! drive level and difficulty; pickups grant timed power-ups.

pub mod ai;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{AiState, ArenaState, PowerupKind, Screen};
pub use tick::{tick, TickInput};
