//! Platformer entity records and session state
//!
//! Coordinates are canvas-style: y grows downward, positions are top-left
//! corners, collision is AABB throughout. The ground is an ordinary
//! full-width platform at the bottom of the list.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::level;
use crate::consts::*;
use crate::events::AnimationIntent;

/// Run gating; `phase` (the fruit-driven level counter) is separate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlimeKind {
    Green,
    Purple,
}

#[derive(Debug, Clone)]
pub struct Knight {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub on_ground: bool,
    pub facing_right: bool,
    pub attacking: bool,
    pub attack_ticks: u32,
    /// Post-hit grace window; contact damage is ignored while nonzero
    pub invulnerable_ticks: u32,
    pub anim: AnimationIntent,
}

impl Knight {
    /// Knight at the spawn point, standing on the ground
    pub fn spawn() -> Self {
        let size = Vec2::new(KNIGHT_WIDTH, KNIGHT_HEIGHT);
        Self {
            pos: Vec2::new(KNIGHT_SPAWN_X, SCENE_HEIGHT - GROUND_HEIGHT - size.y),
            vel: Vec2::ZERO,
            size,
            on_ground: true,
            facing_right: true,
            attacking: false,
            attack_ticks: 0,
            invulnerable_ticks: 0,
            anim: AnimationIntent::Idle,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

#[derive(Debug, Clone)]
pub struct Slime {
    pub id: u32,
    pub kind: SlimeKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub health: u32,
    /// Terminal flag; the prune step removes dead slimes
    pub alive: bool,
    pub on_ground: bool,
    /// Ticks before this slime can damage the knight again
    pub hit_cooldown_ticks: u32,
}

impl Slime {
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

#[derive(Debug, Clone)]
pub struct Fruit {
    pub id: u32,
    /// Sprite variant on the fruit sheet
    pub kind: u32,
    pub pos: Vec2,
    pub size: Vec2,
    pub collected: bool,
}

/// Static collision box. The ground is a degenerate platform spanning the
/// full scene width.
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Platform {
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn left(&self) -> f32 {
        self.pos.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// Complete platformer session state
#[derive(Debug, Clone)]
pub struct PlatformerState {
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub run_state: RunState,
    /// Fruit-driven level counter, starts at 1
    pub phase: u32,
    pub score: u32,
    pub lives: u32,
    /// Fruits collected toward the current phase target
    pub fruits_collected: u32,
    pub knight: Knight,
    pub slimes: Vec<Slime>,
    pub fruits: Vec<Fruit>,
    pub platforms: Vec<Platform>,
    pub time_ticks: u64,
    next_id: u32,
}

impl PlatformerState {
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            run_state: RunState::Playing,
            phase: 1,
            score: 0,
            lives: STARTING_LIVES,
            fruits_collected: 0,
            knight: Knight::spawn(),
            slimes: Vec::new(),
            fruits: Vec::new(),
            platforms: Vec::new(),
            time_ticks: 0,
            next_id: 1,
        };
        state.platforms = level::generate_platforms(&mut state.rng, 3);
        for _ in 0..6 {
            state.spawn_fruit();
        }
        for i in 0..5 {
            state.spawn_slime(i % 2 == 0);
        }
        state
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop a fruit above a random platform
    pub fn spawn_fruit(&mut self) -> u32 {
        let idx = self.rng.random_range(0..self.platforms.len());
        let platform = self.platforms[idx];
        let size = Vec2::splat(FRUIT_SIZE);
        let max_x = (platform.size.x - size.x).max(1.0);
        let x = platform.left() + self.rng.random_range(0.0..max_x);
        let y = platform.top() - size.y - self.rng.random_range(10.0..60.0);
        let id = self.next_entity_id();
        self.fruits.push(Fruit {
            id,
            kind: self.rng.random_range(0..4),
            pos: Vec2::new(x, y),
            size,
            collected: false,
        });
        id
    }

    /// Place a slime on a raised platform when asked (falling back to the
    /// ground when none exist) or on the ground otherwise
    pub fn spawn_slime(&mut self, on_platform: bool) -> u32 {
        let size = Vec2::new(SLIME_WIDTH, SLIME_HEIGHT);
        let platform = if on_platform && self.platforms.len() > 1 {
            self.platforms[self.rng.random_range(1..self.platforms.len())]
        } else {
            self.platforms[0]
        };
        let max_x = (platform.size.x - size.x).max(1.0);
        let x = platform.left() + self.rng.random_range(0.0..max_x);
        let kind = if self.rng.random::<bool>() {
            SlimeKind::Green
        } else {
            SlimeKind::Purple
        };
        let dir = if self.rng.random::<bool>() { 1.0 } else { -1.0 };
        let id = self.next_entity_id();
        self.slimes.push(Slime {
            id,
            kind,
            pos: Vec2::new(x, platform.top() - size.y),
            vel: Vec2::new(SLIME_PATROL_SPEED * dir, 0.0),
            size,
            health: SLIME_MAX_HEALTH,
            alive: true,
            on_ground: true,
            hit_cooldown_ticks: 0,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_populates_world() {
        let state = PlatformerState::new(5);
        assert_eq!(state.run_state, RunState::Playing);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.phase, 1);
        // Ground plus three raised platforms
        assert_eq!(state.platforms.len(), 4);
        assert_eq!(state.fruits.len(), 6);
        assert_eq!(state.slimes.len(), 5);
    }

    #[test]
    fn test_knight_spawns_on_ground() {
        let knight = Knight::spawn();
        assert!(knight.on_ground);
        assert_eq!(
            knight.pos.y + knight.size.y,
            SCENE_HEIGHT - GROUND_HEIGHT
        );
    }

    #[test]
    fn test_entities_spawn_inside_scene() {
        let state = PlatformerState::new(11);
        for fruit in &state.fruits {
            assert!(fruit.pos.x >= 0.0);
            assert!(fruit.pos.x + fruit.size.x <= SCENE_WIDTH + f32::EPSILON);
        }
        for slime in &state.slimes {
            assert!(slime.pos.x >= 0.0);
            assert!(slime.pos.x + slime.size.x <= SCENE_WIDTH + f32::EPSILON);
            assert!(slime.alive);
        }
    }
}
