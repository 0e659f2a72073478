//! Side-view knight platformer
//!
//! AABB entities over a procedurally laid-out platform field. The knight
//! collects fruit to advance phases; slimes patrol, chase and hop. Same
//! fixed-step tick contract as the arena game.

pub mod level;
pub mod physics;
pub mod state;
pub mod tick;

pub use state::{PlatformerState, RunState, SlimeKind};
pub use tick::{tick, PlatformInput};
