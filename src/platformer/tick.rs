//! Platformer fixed-step update
//!
//! Same contract as the arena tick: one call per simulation step, events
//! and a HUD snapshot out. Pause is just a gate on stepping; every timer is
//! a tick counter inside the state, so nothing advances while paused.

use rand::Rng;

use super::level;
use super::physics;
use super::state::{Knight, PlatformerState, RunState};
use crate::consts::*;
use crate::events::{
    AnimationIntent, AudioCue, EntityHandle, EntityKind, Event, PlatformerHud, PlatformerOutput,
};
use crate::geom::aabb_overlap;

/// Input snapshot for one tick. `left`/`right` are held state; `jump`,
/// `attack` and `pause` are edges.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub attack: bool,
    pub pause: bool,
}

/// Advance the platformer by one fixed step
pub fn tick(state: &mut PlatformerState, input: &PlatformInput, dt: f32) -> PlatformerOutput {
    let mut out = PlatformerOutput::default();

    if input.pause {
        state.run_state = match state.run_state {
            RunState::Playing => RunState::Paused,
            RunState::Paused => RunState::Playing,
            RunState::GameOver => RunState::GameOver,
        };
    }

    if state.run_state == RunState::Playing {
        state.time_ticks += 1;
        step_knight(state, input, dt, &mut out);
        step_slimes(state, dt, &mut out);
        collect_fruits(state, &mut out);
        advance_phase(state, &mut out);
        prune_slimes(state, &mut out);
    }

    out.hud = PlatformerHud {
        lives: state.lives,
        score: state.score,
        phase: state.phase,
        fruits_collected: state.fruits_collected,
    };
    out
}

fn step_knight(state: &mut PlatformerState, input: &PlatformInput, dt: f32, out: &mut PlatformerOutput) {
    {
        let knight = &mut state.knight;
        knight.vel.x = match (input.left, input.right) {
            (true, false) => -MOVE_SPEED,
            (false, true) => MOVE_SPEED,
            _ => 0.0,
        };
        if knight.vel.x != 0.0 {
            knight.facing_right = knight.vel.x > 0.0;
        }
        if input.jump && knight.on_ground {
            knight.vel.y = JUMP_VELOCITY;
            knight.on_ground = false;
        }
    }

    if input.attack && state.knight.attack_ticks == 0 {
        state.knight.attacking = true;
        state.knight.attack_ticks = ATTACK_TICKS;
        swing_sword(state, out);
    }

    let knight = &mut state.knight;
    if knight.attack_ticks > 0 {
        knight.attack_ticks -= 1;
        if knight.attack_ticks == 0 {
            knight.attacking = false;
        }
    }
    knight.invulnerable_ticks = knight.invulnerable_ticks.saturating_sub(1);

    physics::apply_gravity(&mut knight.vel, 1.0, dt);
    knight.on_ground = physics::step_actor(
        &mut knight.pos,
        &mut knight.vel,
        knight.size,
        &state.platforms,
        dt,
    );

    update_knight_anim(state, out);
}

/// One damage sweep at the start of each swing, never per tick
fn swing_sword(state: &mut PlatformerState, out: &mut PlatformerOutput) {
    let center = state.knight.center();
    let facing_right = state.knight.facing_right;
    let half_w = state.knight.size.x * 0.5;

    let mut slain = 0u32;
    for slime in &mut state.slimes {
        if !slime.alive {
            continue;
        }
        let target = slime.center();
        let in_front = if facing_right {
            target.x >= center.x
        } else {
            target.x <= center.x
        };
        let gap = (target.x - center.x).abs() - half_w - slime.size.x * 0.5;
        if in_front && gap <= ATTACK_RANGE && (target.y - center.y).abs() < ATTACK_VERTICAL_REACH {
            slime.health = slime.health.saturating_sub(1);
            out.events.push(Event::Audio(AudioCue::Hit));
            if slime.health == 0 {
                slime.alive = false;
                slain += 1;
            }
        }
    }
    state.score += slain * 25;
}

fn update_knight_anim(state: &mut PlatformerState, out: &mut PlatformerOutput) {
    let knight = &mut state.knight;
    let desired = if knight.attacking {
        AnimationIntent::Attack
    } else if knight.vel.x != 0.0 {
        AnimationIntent::Run
    } else {
        AnimationIntent::Idle
    };
    if desired != knight.anim {
        knight.anim = desired;
        out.events.push(Event::PlayerAnim(desired));
    }
}

/// Chase speed in px/s, rising with the phase up to a hard cap
fn chase_speed(phase: u32) -> f32 {
    (0.45 + 0.05 * phase as f32).min(1.2) * 60.0
}

fn step_slimes(state: &mut PlatformerState, dt: f32, out: &mut PlatformerOutput) {
    let knight_center = state.knight.center();
    let knight_grounded = state.knight.on_ground;
    let phase = state.phase;

    for i in 0..state.slimes.len() {
        if !state.slimes[i].alive {
            continue;
        }

        let hop = state.slimes[i].on_ground
            && state.rng.random::<f64>() < SLIME_HOP_CHANCE;

        let slime = &mut state.slimes[i];
        slime.hit_cooldown_ticks = slime.hit_cooldown_ticks.saturating_sub(1);

        // Chase only a grounded knight; an airborne one breaks pursuit
        let dx = knight_center.x - slime.center().x;
        if dx.abs() < SLIME_CHASE_RANGE && knight_grounded {
            slime.vel.x = chase_speed(phase) * dx.signum();
        } else {
            slime.vel.x = SLIME_PATROL_SPEED * slime.vel.x.signum();
        }

        if hop {
            slime.vel.y = SLIME_HOP_VELOCITY;
            slime.on_ground = false;
        }

        physics::apply_gravity(&mut slime.vel, SLIME_GRAVITY_SCALE, dt);
        slime.on_ground = physics::step_actor(
            &mut slime.pos,
            &mut slime.vel,
            slime.size,
            &state.platforms,
            dt,
        );

        // Turn around at the scene edges
        if slime.pos.x <= 0.0 {
            slime.vel.x = slime.vel.x.abs();
        } else if slime.pos.x + slime.size.x >= SCENE_WIDTH {
            slime.vel.x = -slime.vel.x.abs();
        }

        touch_knight(state, i, out);
    }
}

fn touch_knight(state: &mut PlatformerState, slime_idx: usize, out: &mut PlatformerOutput) {
    let knight = &state.knight;
    let slime = &state.slimes[slime_idx];
    let overlap = aabb_overlap(knight.pos, knight.size, slime.pos, slime.size);
    if !overlap || slime.hit_cooldown_ticks > 0 || knight.invulnerable_ticks > 0 {
        return;
    }

    state.slimes[slime_idx].hit_cooldown_ticks = SLIME_HIT_COOLDOWN_TICKS;
    state.knight.invulnerable_ticks = INVULNERABLE_TICKS;
    state.lives = state.lives.saturating_sub(1);
    out.events.push(Event::PlayerAnim(AnimationIntent::Hit));
    out.events.push(Event::Audio(AudioCue::Hit));
    state.knight.anim = AnimationIntent::Hit;

    if state.lives == 0 {
        state.knight.anim = AnimationIntent::Die;
        out.events.push(Event::PlayerAnim(AnimationIntent::Die));
        out.events.push(Event::Audio(AudioCue::Death));
        state.run_state = RunState::GameOver;
        log::info!("game over: score {}, phase {}", state.score, state.phase);
    }
}

fn collect_fruits(state: &mut PlatformerState, out: &mut PlatformerOutput) {
    let knight_pos = state.knight.pos;
    let knight_size = state.knight.size;

    for fruit in &mut state.fruits {
        if !fruit.collected && aabb_overlap(knight_pos, knight_size, fruit.pos, fruit.size) {
            fruit.collected = true;
            state.score += 10;
            state.fruits_collected += 1;
            out.events.push(Event::Audio(AudioCue::Pickup));
            out.events.push(Event::Despawned(EntityHandle {
                kind: EntityKind::Fruit,
                id: fruit.id,
            }));
        }
    }
    state.fruits.retain(|f| !f.collected);
}

/// Hard world reset into the next phase once enough fruit is banked
fn advance_phase(state: &mut PlatformerState, out: &mut PlatformerOutput) {
    if state.fruits_collected < PHASE_FRUIT_TARGET {
        return;
    }

    state.phase += 1;
    state.fruits_collected = 0;

    for slime in &state.slimes {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Slime,
            id: slime.id,
        }));
    }
    for fruit in &state.fruits {
        out.events.push(Event::Despawned(EntityHandle {
            kind: EntityKind::Fruit,
            id: fruit.id,
        }));
    }
    state.slimes.clear();
    state.fruits.clear();

    let platform_count = (2 + state.phase / 2).clamp(2, 5) as usize;
    state.platforms = level::generate_platforms(&mut state.rng, platform_count);

    let fruit_count = (3 + state.phase).max(4);
    for _ in 0..fruit_count {
        let id = state.spawn_fruit();
        out.events.push(Event::Spawned(EntityHandle {
            kind: EntityKind::Fruit,
            id,
        }));
    }
    for i in 0..5 {
        let id = state.spawn_slime(i % 2 == 0);
        out.events.push(Event::Spawned(EntityHandle {
            kind: EntityKind::Slime,
            id,
        }));
    }

    state.knight = Knight::spawn();
    state.knight.invulnerable_ticks = INVULNERABLE_TICKS;

    out.events.push(Event::PhaseChange(state.phase));
    log::info!("phase {} begins", state.phase);
}

fn prune_slimes(state: &mut PlatformerState, out: &mut PlatformerOutput) {
    state.slimes.retain(|s| {
        if !s.alive {
            out.events.push(Event::Despawned(EntityHandle {
                kind: EntityKind::Slime,
                id: s.id,
            }));
            false
        } else {
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn quiet_state(seed: u64) -> PlatformerState {
        // No slimes: tests that only exercise the knight keep them out
        let mut state = PlatformerState::new(seed);
        state.slimes.clear();
        state
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut state = quiet_state(1);
        tick(
            &mut state,
            &PlatformInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.run_state, RunState::Paused);
        let ticks = state.time_ticks;
        let knight_pos = state.knight.pos;

        tick(
            &mut state,
            &PlatformInput {
                right: true,
                jump: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.knight.pos, knight_pos);

        tick(
            &mut state,
            &PlatformInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(state.run_state, RunState::Playing);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut state = quiet_state(2);
        let jump = PlatformInput {
            jump: true,
            ..Default::default()
        };
        tick(&mut state, &jump, SIM_DT);
        assert!(state.knight.vel.y < 0.0);
        let vy = state.knight.vel.y;

        // Mid-air jump request must not re-apply the impulse
        tick(&mut state, &jump, SIM_DT);
        assert!(state.knight.vel.y > vy);
    }

    #[test]
    fn test_knight_runs_and_faces_left() {
        let mut state = quiet_state(3);
        let x = state.knight.pos.x;
        tick(
            &mut state,
            &PlatformInput {
                left: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert!(state.knight.pos.x < x);
        assert!(!state.knight.facing_right);
        assert_eq!(state.knight.anim, AnimationIntent::Run);
    }

    #[test]
    fn test_attack_kills_slime_in_reach() {
        let mut state = quiet_state(4);
        state.fruits.clear();
        let id = state.spawn_slime(false);
        // Park the slime just inside sword reach, same height
        let knight_center = state.knight.center();
        let idx = state.slimes.iter().position(|s| s.id == id).unwrap();
        let size = state.slimes[idx].size;
        state.slimes[idx].pos = Vec2::new(
            knight_center.x + state.knight.size.x * 0.5 + 10.0,
            state.knight.pos.y + state.knight.size.y - size.y,
        );
        state.knight.facing_right = true;

        let attack = PlatformInput {
            attack: true,
            ..Default::default()
        };
        // Two swings at two health each; the cooldown forces idle ticks
        let mut despawned = false;
        for _ in 0..(2 * ATTACK_TICKS + 4) {
            let out = tick(&mut state, &attack, SIM_DT);
            if out.events.contains(&Event::Despawned(EntityHandle {
                kind: EntityKind::Slime,
                id,
            })) {
                despawned = true;
                break;
            }
        }
        assert!(despawned);
        assert!(state.slimes.iter().all(|s| s.id != id));
        // A slain slime is worth 25 points
        assert_eq!(state.score, 25);
    }

    #[test]
    fn test_slime_contact_costs_a_life_once_per_cooldown() {
        let mut state = quiet_state(5);
        let id = state.spawn_slime(false);
        let idx = state.slimes.iter().position(|s| s.id == id).unwrap();
        state.slimes[idx].pos = state.knight.pos;
        state.slimes[idx].vel = Vec2::ZERO;

        let out = tick(&mut state, &PlatformInput::default(), SIM_DT);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(out.events.contains(&Event::PlayerAnim(AnimationIntent::Hit)));

        // Still overlapping next tick, but invulnerability holds
        tick(&mut state, &PlatformInput::default(), SIM_DT);
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_last_life_ends_the_run() {
        let mut state = quiet_state(6);
        state.lives = 1;
        let id = state.spawn_slime(false);
        let idx = state.slimes.iter().position(|s| s.id == id).unwrap();
        state.slimes[idx].pos = state.knight.pos;
        state.slimes[idx].vel = Vec2::ZERO;

        let out = tick(&mut state, &PlatformInput::default(), SIM_DT);
        assert_eq!(state.run_state, RunState::GameOver);
        assert!(out.events.contains(&Event::PlayerAnim(AnimationIntent::Die)));
        assert!(out.events.contains(&Event::Audio(AudioCue::Death)));
    }

    #[test]
    fn test_fruit_pickup_scores_and_despawns() {
        let mut state = quiet_state(7);
        state.fruits.clear();
        let id = state.spawn_fruit();
        state.fruits[0].pos = state.knight.pos;

        let out = tick(&mut state, &PlatformInput::default(), SIM_DT);
        assert_eq!(state.score, 10);
        assert_eq!(state.fruits_collected, 1);
        assert!(state.fruits.is_empty());
        assert!(out.events.contains(&Event::Audio(AudioCue::Pickup)));
        assert!(out.events.contains(&Event::Despawned(EntityHandle {
            kind: EntityKind::Fruit,
            id,
        })));
    }

    #[test]
    fn test_phase_advances_after_fruit_target() {
        let mut state = quiet_state(8);
        state.fruits_collected = PHASE_FRUIT_TARGET;

        let out = tick(&mut state, &PlatformInput::default(), SIM_DT);
        assert_eq!(state.phase, 2);
        assert_eq!(state.fruits_collected, 0);
        assert!(out.events.contains(&Event::PhaseChange(2)));
        // Fresh populations: max(4, 3 + phase) fruits, five slimes
        assert_eq!(state.fruits.len(), 5);
        assert_eq!(state.slimes.len(), 5);
        // Knight back at spawn with a grace window
        assert_eq!(state.knight.pos.x, KNIGHT_SPAWN_X);
        assert!(state.knight.invulnerable_ticks > 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |state: &mut PlatformerState| {
            for i in 0..600u32 {
                let input = PlatformInput {
                    right: true,
                    jump: i % 90 == 0,
                    attack: i % 45 == 0,
                    ..Default::default()
                };
                tick(state, &input, SIM_DT);
            }
        };
        let mut a = PlatformerState::new(42);
        let mut b = PlatformerState::new(42);
        script(&mut a);
        script(&mut b);
        assert_eq!(a.knight.pos, b.knight.pos);
        assert_eq!(a.score, b.score);
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.slimes.len(), b.slimes.len());
        for (sa, sb) in a.slimes.iter().zip(&b.slimes) {
            assert_eq!(sa.pos, sb.pos);
        }
    }
}
