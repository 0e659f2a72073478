//! Outputs the core publishes to the excluded collaborator layers
//!
//! Rendering, sprite animation, audio and the HUD live outside this crate.
//! Each tick returns the discrete signals they need: animation intents on
//! state change only, fire-and-forget audio cues, spawn/despawn mirroring
//! for the scene graph, and a once-per-tick HUD snapshot.

use glam::Vec2;

/// Discrete animation intent. Emitted only when it changes, never every
/// tick. `Attack`, `Hit` and `Die` are one-shot; the core times their
/// duration itself and emits the follow-up steady-state intent, so the
/// animation layer never calls back into game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationIntent {
    Idle,
    Run,
    Attack,
    Hit,
    Die,
}

/// Fire-and-forget audio cue; volume and mute live in the audio layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Hit,
    Death,
    Pickup,
}

/// Which collection an entity handle refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Enemy,
    Obstacle,
    Projectile,
    Powerup,
    Slime,
    Fruit,
}

/// Stable handle for scene-graph mirroring. Despawn events fire in the same
/// tick the entity leaves its owning collection, so the render layer never
/// holds a dangling reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityHandle {
    pub kind: EntityKind,
    pub id: u32,
}

/// One discrete signal from a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    PlayerAnim(AnimationIntent),
    Audio(AudioCue),
    Spawned(EntityHandle),
    Despawned(EntityHandle),
    LevelUp(u32),
    PhaseChange(u32),
}

/// Scalar HUD state for the arena game, published once per tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudSnapshot {
    pub hp: f32,
    pub score: f32,
    pub elapsed_secs: f32,
    pub level: u32,
    /// Display names of currently active timed power-ups
    pub powerups: Vec<&'static str>,
}

/// Scalar HUD state for the platformer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformerHud {
    pub lives: u32,
    pub score: u32,
    pub phase: u32,
    pub fruits_collected: u32,
}

/// Everything an arena tick hands back to the host
#[derive(Debug, Clone, Default)]
pub struct TickOutput {
    pub events: Vec<Event>,
    pub hud: HudSnapshot,
    /// World-to-screen translation: `player_world_pos - viewport_center`.
    /// Screen positions are derived from this every tick, never stored.
    pub camera: Vec2,
}

/// Everything a platformer tick hands back to the host
#[derive(Debug, Clone, Default)]
pub struct PlatformerOutput {
    pub events: Vec<Event>,
    pub hud: PlatformerHud,
}
