//! Axis-separated AABB movement against platforms
//!
//! Horizontal motion is applied and clamped to the scene first; vertical
//! motion then checks the foot line against every platform top. Landing
//! uses a crossing test on the previous and new bottom edges, so a fast
//! fall cannot tunnel through a thin platform in one step.

use glam::Vec2;

use super::state::Platform;
use crate::consts::{GRAVITY, SCENE_WIDTH};

/// Integrate gravity into a velocity. `scale` lets slimes fall slower.
pub fn apply_gravity(vel: &mut Vec2, scale: f32, dt: f32) {
    vel.y += GRAVITY * scale * dt;
}

/// Move one actor box for a step and resolve it against the platforms.
/// Returns whether the actor ended the step standing on a platform.
pub fn step_actor(pos: &mut Vec2, vel: &mut Vec2, size: Vec2, platforms: &[Platform], dt: f32) -> bool {
    // Horizontal first, clamped to the scene
    pos.x = (pos.x + vel.x * dt).clamp(0.0, SCENE_WIDTH - size.x);

    let prev_bottom = pos.y + size.y;
    pos.y += vel.y * dt;
    let new_bottom = pos.y + size.y;

    // Landing only applies while descending; jumping up through a
    // platform from below is allowed
    if vel.y < 0.0 {
        return false;
    }

    for platform in platforms {
        let top = platform.top();
        let horizontal = pos.x + size.x > platform.left() && pos.x < platform.right();
        if horizontal && prev_bottom <= top && new_bottom >= top {
            pos.y = top - size.y;
            vel.y = 0.0;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::level::ground_platform;
    use crate::consts::{GROUND_HEIGHT, PLATFORM_HEIGHT, SCENE_HEIGHT, SIM_DT};

    fn thin_platform(x: f32, y: f32, width: f32) -> Platform {
        Platform {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, PLATFORM_HEIGHT),
        }
    }

    #[test]
    fn test_falling_actor_lands_on_ground() {
        let platforms = [ground_platform()];
        let size = Vec2::new(48.0, 60.0);
        let mut pos = Vec2::new(100.0, 200.0);
        let mut vel = Vec2::ZERO;

        let mut on_ground = false;
        for _ in 0..600 {
            apply_gravity(&mut vel, 1.0, SIM_DT);
            on_ground = step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT);
            if on_ground {
                break;
            }
        }
        assert!(on_ground);
        assert_eq!(pos.y + size.y, SCENE_HEIGHT - GROUND_HEIGHT);
        assert_eq!(vel.y, 0.0);
    }

    #[test]
    fn test_fast_fall_does_not_tunnel_thin_platform() {
        let platforms = [thin_platform(0.0, 300.0, 400.0)];
        let size = Vec2::new(48.0, 60.0);
        let mut pos = Vec2::new(100.0, 230.0); // bottom at 290, 10 px above
        let mut vel = Vec2::new(0.0, 3000.0); // 50 px in one step

        let landed = step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT);
        assert!(landed);
        assert_eq!(pos.y + size.y, 300.0);
    }

    #[test]
    fn test_ascending_actor_passes_through_platform() {
        let platforms = [thin_platform(0.0, 300.0, 400.0)];
        let size = Vec2::new(48.0, 60.0);
        let mut pos = Vec2::new(100.0, 280.0); // bottom at 340, below the top
        let mut vel = Vec2::new(0.0, -600.0);

        let landed = step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT);
        assert!(!landed);
        assert!(pos.y < 280.0);
    }

    #[test]
    fn test_no_landing_outside_platform_span() {
        let platforms = [thin_platform(200.0, 300.0, 100.0)];
        let size = Vec2::new(48.0, 60.0);
        let mut pos = Vec2::new(0.0, 235.0);
        let mut vel = Vec2::new(0.0, 600.0);

        let landed = step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT);
        assert!(!landed);
    }

    #[test]
    fn test_horizontal_motion_clamped_to_scene() {
        let platforms = [ground_platform()];
        let size = Vec2::new(48.0, 60.0);
        let mut pos = Vec2::new(SCENE_WIDTH - 50.0, 100.0);
        let mut vel = Vec2::new(10_000.0, 0.0);

        step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT);
        assert_eq!(pos.x, SCENE_WIDTH - size.x);
    }

    #[test]
    fn test_grounded_actor_never_penetrates() {
        // Proptest-style sweep over fall heights and speeds: after landing,
        // the bottom edge sits exactly on the platform top
        let platforms = [ground_platform()];
        let size = Vec2::new(64.0, 56.0);
        let top = SCENE_HEIGHT - GROUND_HEIGHT;
        for start in [0.0_f32, 150.0, 350.0, 430.0] {
            for speed in [60.0_f32, 600.0, 2400.0, 9000.0] {
                let mut pos = Vec2::new(300.0, start);
                let mut vel = Vec2::new(0.0, speed);
                for _ in 0..1200 {
                    if step_actor(&mut pos, &mut vel, size, &platforms, SIM_DT) {
                        break;
                    }
                    apply_gravity(&mut vel, 1.0, SIM_DT);
                }
                assert!(pos.y + size.y <= top + 1e-3);
            }
        }
    }
}
