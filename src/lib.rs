//! Race Sim - A deterministic side-scrolling horse race
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, race phases, motion plans, finish line)
//! - `config`: Immutable race configuration supplied at construction
//! - `view`: Read-only snapshot handed to an external renderer
//! - `error`: Construction-time validation errors

pub mod config;
pub mod error;
pub mod sim;
pub mod view;

pub use config::{ActorConfig, Direction, FinishLineConfig, LayerConfig, RaceConfig, SpeedMode};
pub use error::{ConfigError, Result};
pub use view::RaceView;

/// Race configuration constants (defaults of the stock three-horse race)
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f64 = 1.0 / 60.0;
    /// Largest frame delta the runner feeds the scheduler (stall clamp)
    pub const MAX_FRAME_DT: f64 = 0.1;

    /// Track dimensions
    pub const SCREEN_WIDTH: f64 = 960.0;
    pub const SCREEN_HEIGHT: f64 = 360.0;

    /// Countdown before the gates open
    pub const COUNTDOWN_SECONDS: f64 = 10.0;
    /// Smallest number the countdown display shows
    pub const COUNTDOWN_MIN_DISPLAY: u32 = 1;

    /// Parallax layers (pixels/s, draw heights)
    pub const FAR_SPEED: f64 = 40.0;
    pub const FAR_TARGET_H: f64 = 180.0;
    pub const FAR_PERIOD: f64 = 1280.0;
    pub const NEAR_SPEED: f64 = 110.0;
    pub const NEAR_TARGET_H: f64 = 140.0;
    pub const NEAR_PERIOD: f64 = 1120.0;

    /// Finish line defaults
    pub const FINISH_DELAY_S: f64 = 2.5;
    pub const FINISH_WIDTH_PX: f64 = 6.0;
    pub const FINISH_SPEED_FIXED: f64 = 180.0;
    pub const FINISH_SPEED_SCALE: f64 = 1.2;
    /// How far off-screen the finish line spawns
    pub const FINISH_OFFSCREEN_MARGIN: f64 = 120.0;
    /// Packed 0xRRGGBB
    pub const FINISH_COLOR: u32 = 0xDC_28_28;

    /// Actor placement
    pub const START_X: f64 = 60.0;
    pub const GROUND_OVERLAP: f64 = 4.0;

    /// Sprite animation
    pub const FRAME_COUNT: u32 = 12;
    pub const ANIM_FPS: f64 = 10.0;
    pub const BOB_AMPLITUDE: f64 = 6.0;
    /// Angular frequency of the running bob (radians/s)
    pub const BOB_FREQUENCY: f64 = 10.0;
}

/// Sign of a travel direction as a float (+1 right, -1 left)
#[inline]
pub fn direction_sign(direction: Direction) -> f64 {
    match direction {
        Direction::Right => 1.0,
        Direction::Left => -1.0,
    }
}

/// Wrap a value into `[0, period)`
#[inline]
pub fn wrap(value: f64, period: f64) -> f64 {
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to exactly `period` for tiny negative inputs
    if wrapped >= period { 0.0 } else { wrapped }
}
