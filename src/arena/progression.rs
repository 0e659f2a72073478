//! Level, difficulty and power-up effect rules
//!
//! Level and difficulty are both pure functions of the kill count so that
//! reloading or replaying from the same kill total always lands on the same
//! values. Difficulty is the coarser of the two and only feeds spawn pacing
//! and enemy stat scaling.

use crate::arena::state::{ArenaState, PowerupKind};
use crate::consts::{
    INITIAL_SPAWN_DELAY, MAX_LEVEL, MIN_SPAWN_DELAY, PLAYER_MAX_HP, POWERUP_HP_RESTORE,
    POWERUP_SPEED_FACTOR,
};

/// Kills needed to go from level `level` to `level + 1`
fn level_increment(level: u32) -> u32 {
    6 + 2 * level
}

/// Level reached at a cumulative kill count. Starts at 1, widening steps
/// (level 2 at 8 kills, level 3 at 18, ...), capped at [`MAX_LEVEL`].
pub fn level_for_kills(kills: u32) -> u32 {
    let mut level = 1;
    let mut threshold = 0;
    while level < MAX_LEVEL {
        threshold += level_increment(level);
        if kills < threshold {
            break;
        }
        level += 1;
    }
    level
}

/// Difficulty tier: one step per 15 kills, uncapped
pub fn difficulty_for_kills(kills: u32) -> u32 {
    kills / 15
}

/// Ticks between enemy spawns at the current progression
pub fn spawn_delay(difficulty: u32, level: u32) -> u32 {
    INITIAL_SPAWN_DELAY
        .saturating_sub(8 * difficulty)
        .saturating_sub(level)
        .max(MIN_SPAWN_DELAY)
}

/// Apply a collected power-up. Timed buffs arm their timer from the current
/// tick; collecting one already active refreshes it.
pub fn apply_powerup(state: &mut ArenaState, kind: PowerupKind) {
    let now = state.time_ticks;
    match kind {
        PowerupKind::Hp => {
            state.player.hp = (state.player.hp + POWERUP_HP_RESTORE).min(PLAYER_MAX_HP);
        }
        PowerupKind::Speed => {
            state.active_powerups.speed.arm(now);
            state.player.speed = state.player.base_speed * POWERUP_SPEED_FACTOR;
        }
        PowerupKind::Damage => {
            // Projectile damage reads the timer directly at fire time
            state.active_powerups.damage.arm(now);
        }
        PowerupKind::Rapid => {
            state.active_powerups.rapid.arm(now);
        }
        PowerupKind::Shield => {
            state.active_powerups.shield.arm(now);
            state.player.shield = true;
        }
    }
    log::debug!("powerup applied: {}", kind.as_str());
}

/// Revert buffs whose window has closed. Each reverts exactly once; the
/// timer is disarmed so a later tick cannot revert again over a fresher
/// re-collection of the same kind.
pub fn expire_powerups(state: &mut ArenaState) {
    let now = state.time_ticks;
    if state.active_powerups.speed.expired(now) {
        state.active_powerups.speed.active = false;
        state.player.speed = state.player.base_speed;
    }
    if state.active_powerups.rapid.expired(now) {
        state.active_powerups.rapid.active = false;
    }
    if state.active_powerups.damage.expired(now) {
        state.active_powerups.damage.active = false;
    }
    if state.active_powerups.shield.expired(now) {
        state.active_powerups.shield.active = false;
        state.player.shield = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::POWERUP_DURATION_TICKS;
    use proptest::prelude::*;

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level_for_kills(0), 1);
        assert_eq!(level_for_kills(6), 1);
        assert_eq!(level_for_kills(7), 1);
        assert_eq!(level_for_kills(8), 2);
        assert_eq!(level_for_kills(17), 2);
        assert_eq!(level_for_kills(18), 3);
    }

    #[test]
    fn test_level_caps() {
        assert_eq!(level_for_kills(100_000), MAX_LEVEL);
    }

    #[test]
    fn test_spawn_delay_floors() {
        assert_eq!(spawn_delay(0, 1), 99);
        assert_eq!(spawn_delay(100, MAX_LEVEL), MIN_SPAWN_DELAY);
    }

    proptest! {
        #[test]
        fn test_level_monotonic_in_kills(kills in 0u32..5000) {
            prop_assert!(level_for_kills(kills + 1) >= level_for_kills(kills));
        }

        #[test]
        fn test_spawn_delay_never_below_floor(d in 0u32..1000, l in 1u32..=MAX_LEVEL) {
            prop_assert!(spawn_delay(d, l) >= MIN_SPAWN_DELAY);
        }
    }

    #[test]
    fn test_hp_powerup_caps_at_max() {
        let mut state = ArenaState::new(7);
        state.player.hp = 90.0;
        apply_powerup(&mut state, PowerupKind::Hp);
        assert_eq!(state.player.hp, PLAYER_MAX_HP);
    }

    #[test]
    fn test_shield_expires_at_boundary() {
        let mut state = ArenaState::new(7);
        state.time_ticks = 100;
        apply_powerup(&mut state, PowerupKind::Shield);
        assert!(state.player.shield);

        // Still active exactly at expiry
        state.time_ticks = 100 + POWERUP_DURATION_TICKS;
        expire_powerups(&mut state);
        assert!(state.player.shield);

        state.time_ticks += 1;
        expire_powerups(&mut state);
        assert!(!state.player.shield);
        assert!(!state.active_powerups.shield.active);
    }

    #[test]
    fn test_speed_recollect_refreshes_window() {
        let mut state = ArenaState::new(7);
        state.time_ticks = 0;
        apply_powerup(&mut state, PowerupKind::Speed);
        let boosted = state.player.speed;

        // Re-collect halfway through; the original expiry must not revert it
        state.time_ticks = POWERUP_DURATION_TICKS / 2;
        apply_powerup(&mut state, PowerupKind::Speed);

        state.time_ticks = POWERUP_DURATION_TICKS + 1;
        expire_powerups(&mut state);
        assert_eq!(state.player.speed, boosted);

        state.time_ticks = POWERUP_DURATION_TICKS / 2 + POWERUP_DURATION_TICKS + 1;
        expire_powerups(&mut state);
        assert_eq!(state.player.speed, state.player.base_speed);
    }
}
