//! Enemy steering
//!
//! Two layers, kept deliberately separate: a discrete state machine decides
//! the enemy's intent each tick, then obstacle repulsion is summed into the
//! intent vector and the result is re-normalized to unit length and scaled
//! by the enemy's speed. Avoidance can locally dominate the motion but
//! never changes the discrete state.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{AiState, Enemy, Obstacle};
use crate::consts::OBSTACLE_AVOID_MARGIN;
use crate::{normalize_or, steer_toward};

/// Repulsion weight relative to the per-tick intent magnitudes below
const AVOID_WEIGHT: f32 = 2.2;
/// Wander heading perturbation per tick (radians, uniform ±half)
const WANDER_JITTER: f32 = 0.2;

/// Advance one enemy's AI state and return its unit steering direction.
///
/// The caller applies `dir * enemy.base_speed * dt`; intent magnitudes here
/// only set the blend weights against obstacle repulsion. They are expressed
/// in per-tick units (base_speed / 60) so the weights match across speeds.
pub fn steer(enemy: &mut Enemy, player_pos: Vec2, obstacles: &[Obstacle], level: u32, rng: &mut Pcg32) -> Vec2 {
    let to_player = player_pos - enemy.pos;
    let dist = to_player.length();

    // State transitions: detection wins outright; otherwise an occasional,
    // level-scaled roll sends the enemy circling instead of idling.
    if dist < enemy.detection_radius {
        enemy.ai_state = AiState::Pursue;
    } else if rng.random::<f64>() < 0.002 * f64::from(level.max(1)) {
        enemy.ai_state = AiState::Circling;
    } else {
        enemy.ai_state = AiState::Idle;
    }

    let tick_speed = enemy.base_speed / 60.0;
    let mut steer = match enemy.ai_state {
        AiState::Pursue => {
            // Slight boost over base speed, growing with level
            steer_toward(enemy.pos, player_pos) * (tick_speed * 1.1 + level as f32 * 0.05)
        }
        AiState::Circling => {
            // Perpendicular to the player-relative vector: an orbit
            let angle = to_player.y.atan2(to_player.x) + std::f32::consts::FRAC_PI_2;
            Vec2::from_angle(angle) * (tick_speed * 0.9)
        }
        AiState::Idle => {
            // Smooth random walk: perturb the heading, not the position
            enemy.wander_angle += (rng.random::<f32>() - 0.5) * WANDER_JITTER;
            Vec2::from_angle(enemy.wander_angle) * (tick_speed * 0.6)
        }
    };

    // Additive obstacle repulsion, blended before the final normalize.
    // Soft constraint: strong pursuit can still push into near-overlap.
    for obstacle in obstacles {
        let min_dist = obstacle.size / 2.0 + OBSTACLE_AVOID_MARGIN;
        steer += crate::geom::obstacle_repulsion(enemy.pos, obstacle.pos, min_dist) * AVOID_WEIGHT;
    }

    // Zero net force resolves to the last wander heading, never NaN
    normalize_or(steer, Vec2::from_angle(enemy.wander_angle))
}
