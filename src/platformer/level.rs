//! Procedural platform layout
//!
//! Raised platforms are placed one at a time with a bounded number of
//! constrained attempts: a candidate must not overlap an existing platform
//! and its top must be within jumping distance of some already-placed top
//! (the ground counts). After the attempt budget the last candidate is
//! taken as-is, so generation always terminates with a usable layout.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::Platform;
use crate::consts::*;
use crate::geom::aabb_overlap;

/// The ground: a degenerate platform spanning the full scene width
pub fn ground_platform() -> Platform {
    Platform {
        pos: Vec2::new(0.0, SCENE_HEIGHT - GROUND_HEIGHT),
        size: Vec2::new(SCENE_WIDTH, GROUND_HEIGHT),
    }
}

fn random_candidate(rng: &mut Pcg32) -> Platform {
    let width = rng.random_range(PLATFORM_MIN_WIDTH..PLATFORM_MAX_WIDTH);
    let x = rng.random_range(0.0..(SCENE_WIDTH - width));
    let max_y = SCENE_HEIGHT - GROUND_HEIGHT - 2.0 * PLATFORM_HEIGHT;
    let y = rng.random_range(PLATFORM_MIN_Y..max_y);
    Platform {
        pos: Vec2::new(x, y),
        size: Vec2::new(width, PLATFORM_HEIGHT),
    }
}

fn reachable_from(placed: &[Platform], candidate: &Platform) -> bool {
    placed
        .iter()
        .any(|p| (p.top() - candidate.top()).abs() <= MAX_JUMP_HEIGHT)
}

fn overlaps_any(placed: &[Platform], candidate: &Platform) -> bool {
    placed
        .iter()
        .any(|p| aabb_overlap(p.pos, p.size, candidate.pos, candidate.size))
}

/// Ground plus `count` raised platforms
pub fn generate_platforms(rng: &mut Pcg32, count: usize) -> Vec<Platform> {
    let mut platforms = vec![ground_platform()];
    for _ in 0..count {
        let mut candidate = random_candidate(rng);
        for _ in 0..PLATFORM_PLACEMENT_TRIES {
            if reachable_from(&platforms, &candidate) && !overlaps_any(&platforms, &candidate) {
                break;
            }
            candidate = random_candidate(rng);
        }
        // Attempt budget spent: keep the last roll rather than loop forever
        platforms.push(candidate);
    }
    log::debug!("generated {} platforms", platforms.len());
    platforms
}
