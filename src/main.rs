//! Race Sim entry point
//!
//! Runs a race headless: fake display frames drive the fixed timestep clock
//! until every horse has crossed, then the finishing order is printed as JSON.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use race_sim::consts::*;
use race_sim::sim::{FixedTimestep, RaceEvent, RaceState, tick};
use race_sim::{RaceConfig, Result};

/// Give up after this much simulated wall time
const MAX_WALL_SECONDS: f64 = 600.0;
/// Nominal display rate of the fake frame source
const DISPLAY_FPS: f64 = 60.0;

/// Race plus the frame loop around it
struct Runner {
    state: RaceState,
    clock: FixedTimestep,
    /// Jitters frame deltas so tick batching varies frame to frame
    frame_rng: Pcg32,
    wall_time: f64,
}

impl Runner {
    fn new(config: &RaceConfig, seed: u64) -> Result<Self> {
        Ok(Self {
            state: RaceState::new(config)?,
            clock: FixedTimestep::new(config.step)?,
            frame_rng: Pcg32::seed_from_u64(seed),
            wall_time: 0.0,
        })
    }

    /// Next display frame delta, clamped to cap catch-up bursts
    fn next_frame_dt(&mut self) -> f64 {
        let jitter = self.frame_rng.random_range(0.5..1.5);
        (jitter / DISPLAY_FPS).min(MAX_FRAME_DT)
    }

    fn update(&mut self) {
        let dt = self.next_frame_dt();
        self.wall_time += dt;
        let state = &mut self.state;
        let steps = self.clock.feed(dt, |step| tick(state, step));
        log::trace!("frame dt={:.4} ticks={}", dt, steps);

        for event in self.state.drain_events() {
            match event {
                RaceEvent::RaceStarted => log::info!("And they're off!"),
                RaceEvent::FinishLineActivated { race_time } => {
                    log::info!("Finish line in sight at {:.2}s", race_time)
                }
                RaceEvent::ActorCrossed { actor, race_time } => {
                    log::info!("Horse {} home at {:.2}s", actor, race_time)
                }
                RaceEvent::RaceFinished { race_time } => {
                    log::info!("All horses home at {:.2}s", race_time)
                }
            }
        }

        if let Some(n) = self.state.countdown_display() {
            log::debug!("countdown {}", n);
        }
    }

    fn run(&mut self) {
        while !self.state.is_finished() && self.wall_time < MAX_WALL_SECONDS {
            self.update();
        }
        if !self.state.is_finished() {
            log::warn!(
                "Race still {:?} after {:.0}s of wall time",
                self.state.phase(),
                self.wall_time
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Race Sim starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match RaceConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Bad config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => RaceConfig::default(),
    };

    let seed = 0x5EED;
    let mut runner = match Runner::new(&config, seed) {
        Ok(runner) => runner,
        Err(e) => {
            log::error!("Cannot build race: {}", e);
            std::process::exit(1);
        }
    };
    runner.run();

    match serde_json::to_string_pretty(runner.state.results()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize results: {}", e),
    }
}
