//! Headless demo runner
//!
//! Drives both games through the fixed-step accumulator with a scripted
//! input stream and logs the HUD as the runs progress. The hosting layer
//! (renderer, real input) is expected to replace this loop wholesale; it
//! exists to exercise the cores end to end.

use glam::Vec2;

use wavelash::arena::{self, ArenaState, Screen, TickInput};
use wavelash::consts::{MAX_SUBSTEPS, SIM_DT};
use wavelash::platformer::{self, PlatformInput, PlatformerState, RunState};
use wavelash::Settings;

/// Feed frame deltas through the clamped accumulator, ticking at SIM_DT
struct Stepper {
    accumulator: f32,
}

impl Stepper {
    fn new() -> Self {
        Self { accumulator: 0.0 }
    }

    fn advance(&mut self, dt: f32, mut step: impl FnMut()) {
        let dt = dt.min(0.1);
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
    }
}

fn run_arena(seed: u64) {
    let mut state = ArenaState::new(seed);
    log::info!("arena demo (seed {seed})");

    // Leave the menu
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    arena::tick(&mut state, &start, SIM_DT);

    let mut stepper = Stepper::new();
    let mut frame = 0u32;
    while state.screen == Screen::Playing && state.elapsed_secs < 60.0 {
        // Wander in a slow circle, firing continuously
        let angle = frame as f32 * 0.01;
        let input = TickInput {
            dir: Vec2::from_angle(angle),
            fire: true,
            ..Default::default()
        };

        // Mostly steady 60 Hz frames with an occasional long stall to
        // exercise the substep clamp
        let frame_dt = if frame % 600 == 599 { 0.5 } else { SIM_DT };
        stepper.advance(frame_dt, || {
            let out = arena::tick(&mut state, &input, SIM_DT);
            if state.time_ticks % 300 == 0 {
                log::info!(
                    "t={:>5.1}s hp={:>3.0} score={:>6.0} level={} enemies={} [{}]",
                    out.hud.elapsed_secs,
                    out.hud.hp,
                    out.hud.score,
                    out.hud.level,
                    state.enemies.len(),
                    out.hud.powerups.join("+"),
                );
            }
        });
        frame += 1;
    }

    log::info!(
        "arena demo over: score {:.0}, kills {}, level {}",
        state.score,
        state.kills,
        state.level
    );
}

fn run_platformer(seed: u64) {
    let mut state = PlatformerState::new(seed);
    log::info!("platformer demo (seed {seed})");

    let mut stepper = Stepper::new();
    let mut frame = 0u32;
    while state.run_state == RunState::Playing && frame < 60 * 60 {
        // Run back and forth, hopping and swinging on a cadence
        let input = PlatformInput {
            left: (frame / 300) % 2 == 1,
            right: (frame / 300) % 2 == 0,
            jump: frame % 75 == 0,
            attack: frame % 40 == 0,
            ..Default::default()
        };
        stepper.advance(SIM_DT, || {
            let out = platformer::tick(&mut state, &input, SIM_DT);
            if state.time_ticks % 300 == 0 {
                log::info!(
                    "phase={} lives={} score={} fruits={}/{} slimes={}",
                    out.hud.phase,
                    out.hud.lives,
                    out.hud.score,
                    out.hud.fruits_collected,
                    wavelash::consts::PHASE_FRUIT_TARGET,
                    state.slimes.len(),
                );
            }
        });
        frame += 1;
    }

    log::info!(
        "platformer demo over: score {}, phase {}, lives {}",
        state.score,
        state.phase,
        state.lives
    );
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0)
        });

    let settings = Settings::load(std::path::Path::new("settings.json"));
    log::info!("master volume {}%", settings.master_percent());

    run_arena(seed);
    run_platformer(seed);
}
