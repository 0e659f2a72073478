//! Arena fixed-step update
//!
//! `tick` is the single entry point: the host calls it once per simulation
//! step with the current input snapshot. Screen transitions, movement,
//! firing, spawning, AI, collisions, pickups and progression all happen
//! here in a fixed order, so a saved seed plus a replayed input script
//! reproduces a run exactly.

use glam::Vec2;

use super::ai;
use super::progression;
use super::spawn;
use super::state::{ArenaState, Screen};
use crate::consts::*;
use crate::events::{
    AnimationIntent, AudioCue, EntityHandle, EntityKind, Event, HudSnapshot, TickOutput,
};
use crate::geom::{circle_rect_overlap, circles_overlap, closest_point_on_rect};
use crate::normalize_or;
use rand::Rng;

/// Input snapshot for one tick. Edge-style flags (fire, start, back) are
/// true only on the tick the key went down; `dir` is held state.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Movement direction, any magnitude; normalized internally
    pub dir: Vec2,
    pub fire: bool,
    pub start: bool,
    pub open_volume: bool,
    pub back: bool,
}

/// Advance the arena by one fixed step
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) -> TickOutput {
    let mut out = TickOutput::default();

    match state.screen {
        Screen::Menu => {
            if input.start {
                state.reset();
                state.screen = Screen::Playing;
            } else if input.open_volume {
                state.screen = Screen::VolumeSettings;
            }
        }
        Screen::VolumeSettings => {
            if input.back {
                state.screen = Screen::Menu;
            }
        }
        Screen::GameOver => {
            if input.start {
                state.reset();
                state.screen = Screen::Playing;
            } else if input.back {
                state.screen = Screen::Menu;
            }
        }
        Screen::Playing => step_playing(state, input, dt, &mut out),
    }

    out.hud = hud_snapshot(state);
    out.camera = state.player.pos - Vec2::new(ARENA_VIEW_WIDTH, ARENA_VIEW_HEIGHT) * 0.5;
    out
}

fn step_playing(state: &mut ArenaState, input: &TickInput, dt: f32, out: &mut TickOutput) {
    state.time_ticks += 1;
    state.elapsed_secs += dt;

    // Death animation owns the whole step; the world freezes under it
    if state.player.is_dying() {
        state.player.death_ticks -= 1;
        if state.player.death_ticks == 0 {
            state.screen = Screen::GameOver;
            log::info!(
                "game over: score {:.0}, kills {}, level {}",
                state.score,
                state.kills,
                state.level
            );
        }
        return;
    }

    move_player(state, input, dt);
    handle_fire(state, input, out);
    update_anim(state, input, out);
    run_spawners(state, out);
    update_enemies(state, dt);
    update_projectiles(state, dt, out);
    prune_dead_enemies(state, out);
    collect_powerups(state, out);
    progression::expire_powerups(state);
    check_player_death(state, out);
}

fn move_player(state: &mut ArenaState, input: &TickInput, dt: f32) {
    let dir = normalize_or(input.dir, Vec2::ZERO);
    state.player.pos += dir * state.player.speed * dt;
    if dir.x != 0.0 {
        state.player.facing_right = dir.x > 0.0;
    }

    // Hard pushout: the player never rests inside an obstacle's clearance
    let keep_out = state.player.radius + OBSTACLE_PLAYER_MARGIN;
    for obstacle in &state.obstacles {
        let half = obstacle.half_extent();
        let local = state.player.pos - obstacle.pos;
        if local.x.abs() <= half.x && local.y.abs() <= half.y {
            // Center inside the box: the clamped closest point is the center
            // itself, so eject through the nearest face instead
            let to_x_face = half.x - local.x.abs();
            let to_y_face = half.y - local.y.abs();
            if to_x_face <= to_y_face {
                let side = if local.x >= 0.0 { 1.0 } else { -1.0 };
                state.player.pos.x = obstacle.pos.x + side * (half.x + keep_out);
            } else {
                let side = if local.y >= 0.0 { 1.0 } else { -1.0 };
                state.player.pos.y = obstacle.pos.y + side * (half.y + keep_out);
            }
            continue;
        }
        let closest = closest_point_on_rect(state.player.pos, obstacle.pos, half);
        let delta = state.player.pos - closest;
        let dist = delta.length();
        if dist < keep_out {
            state.player.pos = closest + (delta / dist) * keep_out;
        }
    }
}

/// Manual-fire cooldown, shortened while Rapid is active
fn effective_cooldown(state: &ArenaState, base: u32) -> u32 {
    if state.active_powerups.rapid.active {
        ((base as f32 * POWERUP_RAPID_FACTOR) as u32).max(1)
    } else {
        base
    }
}

fn handle_fire(state: &mut ArenaState, input: &TickInput, out: &mut TickOutput) {
    state.fire_cooldown_ticks = state.fire_cooldown_ticks.saturating_sub(1);
    if input.fire && state.fire_cooldown_ticks == 0 {
        let id = spawn::fire_projectile(
            state,
            PROJECTILE_SPEED,
            PROJECTILE_BASE_DAMAGE,
            PROJECTILE_LIFE_TICKS,
        );
        out.events.push(Event::Spawned(EntityHandle {
            kind: EntityKind::Projectile,
            id,
        }));
        state.fire_cooldown_ticks = effective_cooldown(state, FIRE_COOLDOWN_TICKS);
        state.player.attack_lockout_ticks = ATTACK_LOCKOUT_TICKS;
    }

    if state.auto_fire {
        state.auto_fire_ticks = state.auto_fire_ticks.saturating_sub(1);
        if state.auto_fire_ticks == 0 {
            state.auto_fire_ticks = effective_cooldown(state, AUTO_FIRE_INTERVAL_TICKS);
            // Auto-fire only tracks a live target; it never sprays blind
            if !state.enemies.is_empty() {
                let id = spawn::fire_projectile(
                    state,
                    AUTO_PROJECTILE_SPEED,
                    AUTO_PROJECTILE_BASE_DAMAGE,
                    AUTO_PROJECTILE_LIFE_TICKS,
                );
                out.events.push(Event::Spawned(EntityHandle {
                    kind: EntityKind::Projectile,
                    id,
                }));
            }
        }
    }
}

/// Pick the animation intent for this tick and emit an event only on change.
/// One-shot intents (attack, death) are timed by the core's own counters so
/// the animation layer never reaches back into game logic.
fn update_anim(state: &mut ArenaState, input: &TickInput, out: &mut TickOutput) {
    let desired = if state.player.attack_lockout_ticks > 0 {
        state.player.attack_lockout_ticks -= 1;
        AnimationIntent::Attack
    } else if input.dir != Vec2::ZERO {
        AnimationIntent::Run
    } else {
        AnimationIntent::Idle
    };
    if desired != state.player.anim {
        state.player.anim = desired;
        out.events.push(Event::PlayerAnim(desired));
    }
}

fn run_spawners(state: &mut ArenaState, out: &mut TickOutput) {
    if state.next_spawn_ticks == 0 {
        let id = spawn::spawn_enemy(state);
        out.events.push(Event::Spawned(EntityHandle {
            kind: EntityKind::Enemy,
            id,
        }));
        state.next_spawn_ticks = state.spawn_delay_ticks;
    } else {
        state.next_spawn_ticks -= 1;
    }

    state.powerup_spawn_ticks = state.powerup_spawn_ticks.saturating_sub(1);
    if state.powerup_spawn_ticks == 0 {
        state.powerup_spawn_ticks = POWERUP_SPAWN_INTERVAL_TICKS;
        let chance = 0.35 + 0.02 * state.level as f32;
        if state.rng().random::<f32>() < chance {
            let id = spawn::spawn_powerup(state);
            out.events.push(Event::Spawned(EntityHandle {
                kind: EntityKind::Powerup,
                id,
            }));
        }
    }
}

fn update_enemies(state: &mut ArenaState, dt: f32) {
    let player_pos = state.player.pos;
    let player_radius = state.player.radius;
    let level = state.level;
    let shield = state.player.shield;

    let mut contact_damage = 0.0;
    for i in 0..state.enemies.len() {
        let dir = ai::steer(
            &mut state.enemies[i],
            player_pos,
            &state.obstacles,
            level,
            &mut state.rng,
        );
        let enemy = &mut state.enemies[i];
        enemy.pos += dir * enemy.base_speed * dt;
        if circles_overlap(enemy.pos, enemy.radius, player_pos, player_radius) {
            contact_damage += enemy.damage * CONTACT_DAMAGE_FACTOR;
        }
    }
    if !shield {
        state.player.hp -= contact_damage;
    }
}

fn update_projectiles(state: &mut ArenaState, dt: f32, out: &mut TickOutput) {
    for i in 0..state.projectiles.len() {
        {
            let p = &mut state.projectiles[i];
            p.pos += p.vel * dt;
            p.life_ticks = p.life_ticks.saturating_sub(1);
        }
        // Expired projectiles still hit on their final frame; the retain
        // below removes them either way
        let (pos, radius, damage) = {
            let p = &state.projectiles[i];
            (p.pos, p.radius, p.damage)
        };

        let hit_obstacle = state
            .obstacles
            .iter()
            .any(|o| circle_rect_overlap(pos, radius, o.pos, o.half_extent()));
        if hit_obstacle {
            state.projectiles[i].life_ticks = 0;
            continue;
        }

        // First enemy hit absorbs the projectile
        for enemy in &mut state.enemies {
            if circles_overlap(pos, radius, enemy.pos, enemy.radius) {
                enemy.hp -= damage;
                state.projectiles[i].life_ticks = 0;
                break;
            }
        }
    }

    state.projectiles.retain(|p| {
        if p.life_ticks == 0 {
            out.events.push(Event::Despawned(EntityHandle {
                kind: EntityKind::Projectile,
                id: p.id,
            }));
            false
        } else {
            true
        }
    });
}

/// Remove dead enemies and fold the kills into score and progression.
/// Runs after the projectile pass so an enemy killed this tick despawns in
/// the same tick it took the hit.
fn prune_dead_enemies(state: &mut ArenaState, out: &mut TickOutput) {
    let dead: Vec<u32> = state
        .enemies
        .iter()
        .filter(|e| e.hp <= 0.0)
        .map(|e| e.id)
        .collect();
    if dead.is_empty() {
        return;
    }

    state.enemies.retain(|e| e.hp > 0.0);
    for id in &dead {
        out.events.push(Event::Audio(AudioCue::Hit));
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Enemy,
            id: *id,
        }));
    }

    state.kills += dead.len() as u32;
    state.score +=
        dead.len() as f32 * (100.0 + state.elapsed_secs * 10.0 + state.level as f32 * 10.0);

    let new_level = progression::level_for_kills(state.kills);
    let leveled = new_level > state.level;
    state.level = new_level;
    state.difficulty = progression::difficulty_for_kills(state.kills);
    state.spawn_delay_ticks = progression::spawn_delay(state.difficulty, state.level);
    if leveled {
        out.events.push(Event::LevelUp(new_level));
        log::info!("level up: {} ({} kills)", new_level, state.kills);
        respawn_world(state, out);
    }
}

/// Level-up world transition: clear and respawn the entity populations and
/// put the player back at the origin. A hard reset, not a diff; score,
/// kills, hp and active buffs carry over.
fn respawn_world(state: &mut ArenaState, out: &mut TickOutput) {
    for e in &state.enemies {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Enemy,
            id: e.id,
        }));
    }
    for p in &state.projectiles {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Projectile,
            id: p.id,
        }));
    }
    for p in &state.powerups {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Powerup,
            id: p.id,
        }));
    }
    for o in &state.obstacles {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Obstacle,
            id: o.id,
        }));
    }
    state.enemies.clear();
    state.projectiles.clear();
    state.powerups.clear();
    state.obstacles.clear();

    state.player.pos = Vec2::ZERO;
    state.next_spawn_ticks = state.spawn_delay_ticks;

    for _ in 0..INITIAL_OBSTACLES {
        let id = spawn::spawn_obstacle(state);
        out.events.push(Event::Spawned(EntityHandle {
            kind: EntityKind::Obstacle,
            id,
        }));
    }
}

fn collect_powerups(state: &mut ArenaState, out: &mut TickOutput) {
    let player_pos = state.player.pos;

    let mut grabbed = Vec::new();
    for p in &mut state.powerups {
        // Flat pickup reach from the player center, independent of its radius
        if !p.collected && circles_overlap(player_pos, 0.0, p.pos, POWERUP_PICKUP_RADIUS) {
            p.collected = true;
            grabbed.push((p.id, p.kind));
        }
    }

    for (id, kind) in grabbed {
        progression::apply_powerup(state, kind);
        out.events.push(Event::Audio(spawn::pickup_cue()));
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Powerup,
            id,
        }));
    }

    state.powerups.retain(|p| !p.collected);
}

fn check_player_death(state: &mut ArenaState, out: &mut TickOutput) {
    if state.player.hp <= 0.0 && !state.player.is_dying() {
        state.player.hp = 0.0;
        state.player.death_ticks = DEATH_ANIM_TICKS;
        state.player.anim = AnimationIntent::Die;
        out.events.push(Event::PlayerAnim(AnimationIntent::Die));
        out.events.push(Event::Audio(AudioCue::Death));
    }
}

fn hud_snapshot(state: &ArenaState) -> HudSnapshot {
    let mut powerups = Vec::new();
    let active = &state.active_powerups;
    for (timer, name) in [
        (&active.speed, "Speed"),
        (&active.rapid, "Rapid"),
        (&active.damage, "Damage"),
        (&active.shield, "Shield"),
    ] {
        if timer.active {
            powerups.push(name);
        }
    }
    HudSnapshot {
        hp: state.player.hp,
        score: state.score,
        elapsed_secs: state.elapsed_secs,
        level: state.level,
        powerups,
    }
}
