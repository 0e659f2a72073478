//! Arena game state and entity records
//!
//! Every entity lives in exactly one `Vec` on `ArenaState`; the tick loop
//! and the collision pass are the only mutators. Positions are world-space;
//! the camera projection happens in the render layer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::spawn::SpriteMetrics;
use crate::consts::*;
use crate::events::AnimationIntent;

/// Top-level screen machine. UI edges (start/back) and the terminal
/// gameplay condition (player death) drive the transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Menu,
    VolumeSettings,
    Playing,
    GameOver,
}

/// Discrete AI intent; the steering blend happens separately
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiState {
    Idle,
    Pursue,
    Circling,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub hp: f32,
    /// Speed before the Speed power-up multiplier
    pub base_speed: f32,
    pub speed: f32,
    pub radius: f32,
    pub shield: bool,
    /// Render-layer sprite flip; follows the last horizontal input
    pub facing_right: bool,
    /// Current animation intent; events fire only when this changes
    pub anim: AnimationIntent,
    /// Ticks until a one-shot attack animation releases movement intents
    pub attack_lockout_ticks: u32,
    /// Ticks of death animation remaining before the game-over transition
    pub death_ticks: u32,
}

impl Player {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            hp: PLAYER_MAX_HP,
            base_speed: PLAYER_SPEED,
            speed: PLAYER_SPEED,
            radius,
            shield: false,
            facing_right: true,
            anim: AnimationIntent::Idle,
            attack_lockout_ticks: 0,
            death_ticks: 0,
        }
    }

    pub fn is_dying(&self) -> bool {
        self.death_ticks > 0
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    /// Sprite variant (0..ENEMY_KINDS); also scales speed, hp and damage
    pub kind: u32,
    pub pos: Vec2,
    pub ai_state: AiState,
    /// Smooth random-walk heading used while idle
    pub wander_angle: f32,
    pub detection_radius: f32,
    /// px/s; the blend weights inside the AI work in per-tick units
    pub base_speed: f32,
    pub hp: f32,
    pub damage: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec2,
    /// Side length of the square box
    pub size: f32,
}

impl Obstacle {
    pub fn half_extent(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub life_ticks: u32,
    pub radius: f32,
}

/// Power-up kinds. `Hp` applies instantly; the rest are timed buffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerupKind {
    Hp,
    Speed,
    Damage,
    Rapid,
    Shield,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Hp,
        PowerupKind::Speed,
        PowerupKind::Damage,
        PowerupKind::Rapid,
        PowerupKind::Shield,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Hp => "Hp",
            PowerupKind::Speed => "Speed",
            PowerupKind::Damage => "Damage",
            PowerupKind::Rapid => "Rapid",
            PowerupKind::Shield => "Shield",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Powerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
    /// Terminal flag, set exactly once on pickup
    pub collected: bool,
}

/// Activation state of one timed buff
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerupTimer {
    pub active: bool,
    pub expires_at_tick: u64,
}

impl PowerupTimer {
    /// (Re-)arm the timer. Re-collecting refreshes the window rather than
    /// stacking: expiry is always `now + duration` regardless of what was
    /// left on the previous activation.
    pub fn arm(&mut self, now_tick: u64) {
        self.active = true;
        self.expires_at_tick = now_tick + POWERUP_DURATION_TICKS;
    }

    pub fn expired(&self, now_tick: u64) -> bool {
        self.active && now_tick > self.expires_at_tick
    }
}

/// All four timed buffs
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivePowerups {
    pub speed: PowerupTimer,
    pub rapid: PowerupTimer,
    pub damage: PowerupTimer,
    pub shield: PowerupTimer,
}

/// Complete arena game state
#[derive(Debug, Clone)]
pub struct ArenaState {
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub screen: Screen,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<Powerup>,
    pub active_powerups: ActivePowerups,
    /// Cumulative kills this run; level and difficulty derive from it
    pub kills: u32,
    pub level: u32,
    pub difficulty: u32,
    /// Ticks between enemy spawns, tightened by difficulty and level
    pub spawn_delay_ticks: u32,
    pub next_spawn_ticks: u32,
    pub powerup_spawn_ticks: u32,
    /// Periodic homing fire at the closest enemy; off by default, manual
    /// fire is always available
    pub auto_fire: bool,
    pub auto_fire_ticks: u32,
    pub fire_cooldown_ticks: u32,
    pub score: f32,
    pub elapsed_secs: f32,
    pub time_ticks: u64,
    /// Display sizes from the render layer; `None` entries use defaults
    pub metrics: SpriteMetrics,
    next_id: u32,
}

impl ArenaState {
    /// Create a new arena session with the given run seed
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            screen: Screen::Menu,
            player: Player::new(PLAYER_RADIUS_DEFAULT),
            enemies: Vec::new(),
            obstacles: Vec::new(),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            active_powerups: ActivePowerups::default(),
            kills: 0,
            level: 1,
            difficulty: 0,
            spawn_delay_ticks: INITIAL_SPAWN_DELAY,
            next_spawn_ticks: 0,
            powerup_spawn_ticks: POWERUP_SPAWN_INTERVAL_TICKS,
            auto_fire: false,
            auto_fire_ticks: AUTO_FIRE_INTERVAL_TICKS,
            fire_cooldown_ticks: 0,
            score: 0.0,
            elapsed_secs: 0.0,
            time_ticks: 0,
            metrics: SpriteMetrics::default(),
            next_id: 1,
        };
        state.populate_world();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Record display sizes from the render layer. The player radius is
    /// re-derived here (this counts as a respawn); live enemies and
    /// projectiles keep the radius from their creation.
    pub fn set_sprite_metrics(&mut self, metrics: SpriteMetrics) {
        self.metrics = metrics;
        self.player.radius = super::spawn::collision_radius(
            metrics.player_width,
            PLAYER_RADIUS_MIN,
            PLAYER_RADIUS_DEFAULT,
        );
    }

    /// Hard reset of the world entity set for a fresh run: clear all
    /// collections, restore the player, respawn the obstacle field.
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.obstacles.clear();
        self.projectiles.clear();
        self.powerups.clear();
        self.active_powerups = ActivePowerups::default();

        let radius = self.player.radius;
        self.player = Player::new(radius);

        self.kills = 0;
        self.level = 1;
        self.difficulty = 0;
        self.spawn_delay_ticks = INITIAL_SPAWN_DELAY;
        self.next_spawn_ticks = 0;
        self.powerup_spawn_ticks = POWERUP_SPAWN_INTERVAL_TICKS;
        self.auto_fire_ticks = AUTO_FIRE_INTERVAL_TICKS;
        self.fire_cooldown_ticks = 0;
        self.score = 0.0;
        self.elapsed_secs = 0.0;
        self.time_ticks = 0;

        self.populate_world();
        log::info!("arena reset (seed {})", self.seed);
    }

    fn populate_world(&mut self) {
        for _ in 0..INITIAL_OBSTACLES {
            super::spawn::spawn_obstacle(self);
        }
    }

    /// Apply damage to an enemy by id. Unknown or already-removed ids are
    /// ignored; the prune step in the tick handles the resulting death.
    pub fn damage_enemy(&mut self, id: u32, amount: f32) {
        if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id) {
            enemy.hp -= amount;
        }
    }

    /// Closest living enemy to the player, used for target acquisition
    pub fn closest_enemy(&self) -> Option<&Enemy> {
        let player_pos = self.player.pos;
        self.enemies.iter().min_by(|a, b| {
            let da = a.pos.distance_squared(player_pos);
            let db = b.pos.distance_squared(player_pos);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu_with_obstacles() {
        let state = ArenaState::new(7);
        assert_eq!(state.screen, Screen::Menu);
        assert_eq!(state.obstacles.len(), INITIAL_OBSTACLES);
        assert!(state.enemies.is_empty());
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_reset_clears_entities_and_restores_player() {
        let mut state = ArenaState::new(7);
        state.player.hp = 12.0;
        state.player.shield = true;
        state.kills = 40;
        state.score = 999.0;
        super::super::spawn::spawn_enemy(&mut state);
        super::super::spawn::spawn_powerup(&mut state);

        state.reset();
        assert!(state.enemies.is_empty());
        assert!(state.powerups.is_empty());
        assert_eq!(state.obstacles.len(), INITIAL_OBSTACLES);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
        assert!(!state.player.shield);
        assert_eq!(state.kills, 0);
        assert_eq!(state.score, 0.0);
    }

    #[test]
    fn test_damage_enemy_missing_id_is_noop() {
        let mut state = ArenaState::new(7);
        state.damage_enemy(999, 10.0);
        assert!(state.enemies.is_empty());

        let id = super::super::spawn::spawn_enemy(&mut state);
        let hp = state.enemies[0].hp;
        state.damage_enemy(id, 3.0);
        assert_eq!(state.enemies[0].hp, hp - 3.0);
    }

    #[test]
    fn test_powerup_timer_refreshes_not_stacks() {
        let mut timer = PowerupTimer::default();
        timer.arm(100);
        let first_expiry = timer.expires_at_tick;
        timer.arm(300);
        assert_eq!(timer.expires_at_tick, 300 + POWERUP_DURATION_TICKS);
        assert!(timer.expires_at_tick > first_expiry);
        // Not first_expiry + duration: the window is replaced, not extended
        assert_ne!(timer.expires_at_tick, first_expiry + POWERUP_DURATION_TICKS);
    }

    #[test]
    fn test_powerup_timer_expiry_boundary() {
        let mut timer = PowerupTimer::default();
        timer.arm(1000);
        let expiry = 1000 + POWERUP_DURATION_TICKS;
        assert!(!timer.expired(expiry)); // still active at the boundary
        assert!(timer.expired(expiry + 1));
    }
}
