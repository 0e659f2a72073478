//! Wavelash - headless core for two small 2D games
//!
//! Core modules:
//! - `arena`: top-down survivors-style wave combat (AI steering, projectiles,
//!   kill-driven progression, timed power-ups)
//! - `platformer`: knight platformer (axis-separated platform physics, slime
//!   enemies, fruit-driven phase progression)
//! - `geom`: shared circle/AABB overlap tests and steering math
//! - `events`: what the core hands to the excluded render/audio/HUD layers
//! - `settings`: volume preferences (the only thing this crate persists)

pub mod arena;
pub mod events;
pub mod geom;
pub mod platformer;
pub mod settings;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death on tab-resume
    pub const MAX_SUBSTEPS: u32 = 8;

    // --- Arena (survivors) ---

    /// Viewport dimensions; the camera centers the player in this box
    pub const ARENA_VIEW_WIDTH: f32 = 1280.0;
    pub const ARENA_VIEW_HEIGHT: f32 = 720.0;

    pub const PLAYER_MAX_HP: f32 = 100.0;
    /// Player movement speed (px/s)
    pub const PLAYER_SPEED: f32 = 240.0;
    pub const PLAYER_RADIUS_DEFAULT: f32 = 20.0;
    pub const PLAYER_RADIUS_MIN: f32 = 14.0;

    pub const ENEMY_RADIUS_DEFAULT: f32 = 18.0;
    pub const ENEMY_RADIUS_MIN: f32 = 14.0;
    /// Distinct enemy sprite variants on the sheet
    pub const ENEMY_KINDS: u32 = 4;

    /// Obstacles are square boxes
    pub const OBSTACLE_SIZE: f32 = 64.0;
    /// Extra clearance agents try to keep around obstacles
    pub const OBSTACLE_AVOID_MARGIN: f32 = 30.0;
    /// Clearance used when pushing the player out of an obstacle
    pub const OBSTACLE_PLAYER_MARGIN: f32 = 20.0;

    /// Manual-fire projectile speed (px/s) and lifetime
    pub const PROJECTILE_SPEED: f32 = 600.0;
    pub const PROJECTILE_LIFE_TICKS: u32 = 180;
    /// Auto-fire projectiles are slower and shorter-lived
    pub const AUTO_PROJECTILE_SPEED: f32 = 480.0;
    pub const AUTO_PROJECTILE_LIFE_TICKS: u32 = 90;
    pub const PROJECTILE_RADIUS_DEFAULT: f32 = 8.0;
    pub const PROJECTILE_RADIUS_MIN: f32 = 6.0;
    pub const PROJECTILE_BASE_DAMAGE: f32 = 8.0;
    pub const AUTO_PROJECTILE_BASE_DAMAGE: f32 = 5.0;

    /// Cooldown between manual shots (~220 ms)
    pub const FIRE_COOLDOWN_TICKS: u32 = 13;
    /// Auto-fire cadence (~300 ms), halved while Rapid is active
    pub const AUTO_FIRE_INTERVAL_TICKS: u32 = 18;

    /// Fraction of an enemy's damage applied per tick of continuous contact
    pub const CONTACT_DAMAGE_FACTOR: f32 = 0.08;

    pub const MAX_LEVEL: u32 = 13;
    /// Ticks between enemy spawns at difficulty 0
    pub const INITIAL_SPAWN_DELAY: u32 = 100;
    pub const MIN_SPAWN_DELAY: u32 = 10;
    pub const INITIAL_OBSTACLES: usize = 8;

    /// Timed power-up duration (10 s)
    pub const POWERUP_DURATION_TICKS: u64 = 600;
    /// Power-up spawn roll cadence (8 s)
    pub const POWERUP_SPAWN_INTERVAL_TICKS: u32 = 480;
    pub const POWERUP_PICKUP_RADIUS: f32 = 30.0;
    pub const POWERUP_HP_RESTORE: f32 = 35.0;
    pub const POWERUP_SPEED_FACTOR: f32 = 1.6;
    pub const POWERUP_RAPID_FACTOR: f32 = 0.5;
    pub const POWERUP_DAMAGE_BONUS: f32 = 5.0;

    /// One-shot animation lockouts the core times itself
    pub const ATTACK_LOCKOUT_TICKS: u32 = 18;
    pub const DEATH_ANIM_TICKS: u32 = 40;

    // --- Platformer (knight) ---

    pub const SCENE_WIDTH: f32 = 800.0;
    pub const SCENE_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Gravity (px/s²) and knight kinematics
    pub const GRAVITY: f32 = 1800.0;
    pub const JUMP_VELOCITY: f32 = -720.0;
    pub const MOVE_SPEED: f32 = 240.0;

    pub const KNIGHT_WIDTH: f32 = 48.0;
    pub const KNIGHT_HEIGHT: f32 = 60.0;
    pub const KNIGHT_SPAWN_X: f32 = 100.0;
    pub const STARTING_LIVES: u32 = 3;
    pub const ATTACK_RANGE: f32 = 50.0;
    pub const ATTACK_VERTICAL_REACH: f32 = 30.0;
    pub const ATTACK_TICKS: u32 = 20;
    pub const INVULNERABLE_TICKS: u32 = 120;

    /// Slimes fall at half gravity and patrol slowly
    pub const SLIME_GRAVITY_SCALE: f32 = 0.5;
    pub const SLIME_PATROL_SPEED: f32 = 48.0;
    pub const SLIME_CHASE_RANGE: f32 = 180.0;
    pub const SLIME_HOP_VELOCITY: f32 = -360.0;
    pub const SLIME_HOP_CHANCE: f64 = 0.004;
    pub const SLIME_MAX_HEALTH: u32 = 2;
    pub const SLIME_HIT_COOLDOWN_TICKS: u32 = 40;
    pub const SLIME_WIDTH: f32 = 64.0;
    pub const SLIME_HEIGHT: f32 = 56.0;

    pub const FRUIT_SIZE: f32 = 40.0;
    /// Fruits collected before the phase advances
    pub const PHASE_FRUIT_TARGET: u32 = 4;

    /// Platform layout limits
    pub const PLATFORM_MIN_WIDTH: f32 = 80.0;
    pub const PLATFORM_MAX_WIDTH: f32 = 220.0;
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const PLATFORM_MIN_Y: f32 = 120.0;
    /// Approximate max jump height, used to keep platforms reachable
    pub const MAX_JUMP_HEIGHT: f32 = 140.0;
    pub const PLATFORM_PLACEMENT_TRIES: u32 = 20;
}

/// Normalize a vector, falling back to `fallback` for zero-length input.
///
/// Steering math feeds arbitrary sums through here; a stationary agent with
/// zero net force must get a defined direction, never NaN.
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > f32::EPSILON {
        v / len_sq.sqrt()
    } else {
        fallback
    }
}

/// Unit vector from `from` toward `to` (zero when the points coincide)
#[inline]
pub fn steer_toward(from: Vec2, to: Vec2) -> Vec2 {
    normalize_or(to - from, Vec2::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalize_or_is_always_finite(x in -1e6f32..1e6, y in -1e6f32..1e6) {
            let v = normalize_or(Vec2::new(x, y), Vec2::X);
            prop_assert!(v.x.is_finite() && v.y.is_finite());
            // Unit length, except for inputs that fell back
            prop_assert!((v.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn normalize_or_zero_vector_uses_fallback() {
        let fallback = Vec2::new(1.0, 0.0);
        assert_eq!(normalize_or(Vec2::ZERO, fallback), fallback);

        let v = normalize_or(Vec2::new(3.0, 4.0), fallback);
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert!(v.x.is_finite() && v.y.is_finite());
    }

    #[test]
    fn steer_toward_points_at_target() {
        let dir = steer_toward(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((dir - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert_eq!(steer_toward(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
    }
}
