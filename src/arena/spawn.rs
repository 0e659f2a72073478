//! Spawn functions for the arena
//!
//! Entities are created here (timer-driven from the tick, or in bulk on
//! reset), with stats scaled by the current level and difficulty. Collision
//! radii derive once from the display size the render layer reports; when a
//! texture failed to load and no size is available, conservative defaults
//! keep gameplay running.

use glam::Vec2;
use rand::Rng;

use super::state::{ArenaState, Enemy, Obstacle, Powerup, PowerupKind, Projectile};
use crate::consts::*;
use crate::events::AudioCue;

/// Display sizes reported by the render layer, if known. `None` means the
/// texture (or its dimensions) was unavailable; spawns fall back to default
/// radii rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpriteMetrics {
    pub player_width: Option<f32>,
    pub enemy_width: Option<f32>,
    pub projectile_width: Option<f32>,
}

/// Collision radius from an on-screen sprite width: 45% of the width,
/// floored at a conservative minimum. Derived once per entity life.
pub fn collision_radius(display_width: Option<f32>, min: f32, default: f32) -> f32 {
    match display_width {
        Some(w) if w > 0.0 => (w * 0.45).max(min),
        _ => default,
    }
}

/// Random offset on a ring around the player: `base..base+jitter` away on
/// each axis, with an independent random sign per axis.
fn ring_offset(state: &mut ArenaState, base: f32, jitter: f32) -> Vec2 {
    let rng = state.rng();
    let x = (base + rng.random::<f32>() * jitter) * if rng.random::<bool>() { 1.0 } else { -1.0 };
    let y = (base + rng.random::<f32>() * jitter) * if rng.random::<bool>() { 1.0 } else { -1.0 };
    Vec2::new(x, y)
}

/// Spawn one enemy near the player. Spawn ring tightens and stats grow as
/// the level rises; difficulty adds hit points on top.
pub fn spawn_enemy(state: &mut ArenaState) -> u32 {
    let level = state.level;
    let difficulty = state.difficulty;
    let kind = state.rng().random_range(0..ENEMY_KINDS);

    let spread = 600.0 - (level as f32 * 20.0).min(400.0);
    let pos = state.player.pos + ring_offset(state, spread, 300.0);

    let id = state.next_entity_id();
    let kf = kind as f32;
    let lf = level as f32;
    let enemy = Enemy {
        id,
        kind,
        pos,
        ai_state: super::state::AiState::Idle,
        wander_angle: state.rng().random_range(0.0..std::f32::consts::TAU),
        detection_radius: 220.0 + lf * 8.0,
        base_speed: 60.0 * (1.0 + lf * 0.08 + kf * 0.12),
        hp: 10.0 + difficulty as f32 * 4.0 + lf * 2.0 + kf * 2.0,
        damage: 1.0 + (level / 3) as f32 + kf,
        radius: collision_radius(state.metrics.enemy_width, ENEMY_RADIUS_MIN, ENEMY_RADIUS_DEFAULT),
    };
    log::debug!(
        "spawn enemy #{id} kind={kind} at ({:.0},{:.0}) hp={:.0}",
        enemy.pos.x,
        enemy.pos.y,
        enemy.hp
    );
    state.enemies.push(enemy);
    id
}

/// Spawn one square obstacle well away from the player
pub fn spawn_obstacle(state: &mut ArenaState) -> u32 {
    let pos = state.player.pos + ring_offset(state, 300.0, 700.0);
    let id = state.next_entity_id();
    state.obstacles.push(Obstacle {
        id,
        pos,
        size: OBSTACLE_SIZE,
    });
    id
}

/// Spawn a random power-up pickup somewhere around the player
pub fn spawn_powerup(state: &mut ArenaState) -> u32 {
    let kind = PowerupKind::ALL[state.rng().random_range(0..PowerupKind::ALL.len())];
    let pos = state.player.pos + ring_offset(state, 200.0, 800.0);
    let id = state.next_entity_id();
    state.powerups.push(Powerup {
        id,
        kind,
        pos,
        collected: false,
    });
    log::debug!("spawn powerup #{id} {}", kind.as_str());
    id
}

/// Fire a projectile from the player at the closest enemy, or in a random
/// direction when no enemy is alive. Returns the new entity id.
pub fn fire_projectile(state: &mut ArenaState, speed: f32, base_damage: f32, life: u32) -> u32 {
    let dir = match state.closest_enemy() {
        Some(enemy) => crate::steer_toward(state.player.pos, enemy.pos),
        None => {
            let angle = state.rng().random_range(0.0..std::f32::consts::TAU);
            Vec2::from_angle(angle)
        }
    };
    // A zero direction can only come from an enemy exactly on the player;
    // fire along +x rather than spawning a stationary projectile.
    let dir = crate::normalize_or(dir, Vec2::X);

    let damage = base_damage
        + if state.active_powerups.damage.active {
            POWERUP_DAMAGE_BONUS
        } else {
            0.0
        };

    let id = state.next_entity_id();
    state.projectiles.push(Projectile {
        id,
        pos: state.player.pos,
        vel: dir * speed,
        damage,
        life_ticks: life,
        radius: collision_radius(
            state.metrics.projectile_width,
            PROJECTILE_RADIUS_MIN,
            PROJECTILE_RADIUS_DEFAULT,
        ),
    });
    id
}

/// Audio cue for a pickup collection
pub fn pickup_cue() -> AudioCue {
    AudioCue::Pickup
}
