//! Overlap tests shared by both games
//!
//! Circles for the top-down arena, axis-aligned boxes for the platformer,
//! and the clamped closest-point test that bridges the two.

use glam::Vec2;

/// Circle/circle overlap: `distance < ra + rb`
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}

/// Closest point on an axis-aligned rectangle (given by center and half
/// extents) to `p`, computed by clamping each coordinate.
#[inline]
pub fn closest_point_on_rect(p: Vec2, center: Vec2, half: Vec2) -> Vec2 {
    Vec2::new(
        p.x.clamp(center.x - half.x, center.x + half.x),
        p.y.clamp(center.y - half.y, center.y + half.y),
    )
}

/// Circle vs axis-aligned rectangle overlap
#[inline]
pub fn circle_rect_overlap(p: Vec2, radius: f32, center: Vec2, half: Vec2) -> bool {
    let closest = closest_point_on_rect(p, center, half);
    p.distance_squared(closest) < radius * radius
}

/// AABB overlap for two boxes given by top-left corner and size
#[inline]
pub fn aabb_overlap(pos_a: Vec2, size_a: Vec2, pos_b: Vec2, size_b: Vec2) -> bool {
    pos_a.x < pos_b.x + size_b.x
        && pos_a.x + size_a.x > pos_b.x
        && pos_a.y < pos_b.y + size_b.y
        && pos_a.y + size_a.y > pos_b.y
}

/// Repulsion vector a square obstacle exerts on an agent at `agent_pos`.
///
/// Strength is `(min_dist - dist) / min_dist` along the separation
/// direction, zero outside `min_dist`. Soft by design: callers sum this
/// into a steering vector before normalizing, so a strong pursuit force can
/// still push an agent into near-overlap.
pub fn obstacle_repulsion(agent_pos: Vec2, obstacle_center: Vec2, min_dist: f32) -> Vec2 {
    let away = agent_pos - obstacle_center;
    let dist = away.length().max(1.0);
    if dist >= min_dist {
        return Vec2::ZERO;
    }
    let strength = (min_dist - dist) / min_dist;
    (away / dist) * strength
}
