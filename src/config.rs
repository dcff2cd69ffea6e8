//! Race configuration
//!
//! Everything numeric the simulation needs, supplied once at construction and
//! never mutated afterwards. Loadable from JSON; the default is the stock
//! three-horse race.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::plan::MotionStep;

/// Horizontal travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    #[default]
    Right,
}

/// How the finish line picks its speed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SpeedMode {
    /// Constant `speed`
    #[default]
    Fixed,
    /// Reference layer speed times `speed_scale`
    Scale,
    /// Reference layer speed as-is
    Follow,
}

impl SpeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedMode::Fixed => "fixed",
            SpeedMode::Scale => "scale",
            SpeedMode::Follow => "follow",
        }
    }

    pub fn needs_reference(&self) -> bool {
        !matches!(self, SpeedMode::Fixed)
    }
}

/// One parallax background layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Scroll speed (pixels/s)
    pub speed: f64,
    pub direction: Direction,
    /// Width of one texture tile after scaling (pixels)
    pub period: f64,
    /// Height the texture is scaled to
    pub target_height: f64,
}

/// One horse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    pub start_x: f64,
    /// Lane baseline (pixels from top)
    pub lane_y: f64,
    pub vx: f64,
    pub target_vx: f64,
    pub accel: f64,
    pub plan: Vec<MotionStep>,
    /// Multiplier on the global animation fps
    pub anim_rate: f64,
    pub bob_amp: f64,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            start_x: START_X,
            lane_y: SCREEN_HEIGHT - NEAR_TARGET_H + GROUND_OVERLAP,
            vx: 0.0,
            target_vx: 0.0,
            accel: 0.0,
            plan: Vec::new(),
            anim_rate: 1.0,
            bob_amp: BOB_AMPLITUDE,
        }
    }
}

/// The sweeping finish line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinishLineConfig {
    /// Race time before the line appears (seconds)
    pub delay: f64,
    /// Travel direction; `left` moves right to left
    pub direction: Direction,
    pub mode: SpeedMode,
    /// Speed for `fixed` mode (pixels/s)
    pub speed: f64,
    /// Multiplier for `scale` mode
    pub speed_scale: f64,
    /// Layer index read by `scale` and `follow`
    pub reference_layer: Option<usize>,
    pub width: f64,
    /// Packed 0xRRGGBB
    pub color: u32,
}

impl Default for FinishLineConfig {
    fn default() -> Self {
        Self {
            delay: FINISH_DELAY_S,
            direction: Direction::Left,
            mode: SpeedMode::Fixed,
            speed: FINISH_SPEED_FIXED,
            speed_scale: FINISH_SPEED_SCALE,
            reference_layer: Some(1),
            width: FINISH_WIDTH_PX,
            color: FINISH_COLOR,
        }
    }
}

/// Complete race configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    pub screen_width: f64,
    /// Fixed simulation step (seconds)
    pub step: f64,
    /// Countdown before the gates open (seconds)
    pub countdown: f64,
    /// Smallest number shown by the countdown display
    pub countdown_min_display: u32,
    /// Keep sprites animating during the countdown
    pub idle_animation: bool,
    pub frame_count: u32,
    pub anim_fps: f64,
    pub layers: Vec<LayerConfig>,
    pub actors: Vec<ActorConfig>,
    /// `None` runs without a finish line; the race then never ends
    pub finish: Option<FinishLineConfig>,
}

impl Default for RaceConfig {
    fn default() -> Self {
        let near_top = SCREEN_HEIGHT - NEAR_TARGET_H;
        let lane = |d: f64| near_top + GROUND_OVERLAP + d;
        let horse = |lane_y: f64, anim_rate: f64, plan: Vec<MotionStep>| ActorConfig {
            lane_y,
            anim_rate,
            plan,
            ..ActorConfig::default()
        };

        Self {
            screen_width: SCREEN_WIDTH,
            step: SIM_DT,
            countdown: COUNTDOWN_SECONDS,
            countdown_min_display: COUNTDOWN_MIN_DISPLAY,
            idle_animation: false,
            frame_count: FRAME_COUNT,
            anim_fps: ANIM_FPS,
            layers: vec![
                // Far scenery
                LayerConfig {
                    speed: FAR_SPEED,
                    direction: Direction::Right,
                    period: FAR_PERIOD,
                    target_height: FAR_TARGET_H,
                },
                // Near ground
                LayerConfig {
                    speed: NEAR_SPEED,
                    direction: Direction::Right,
                    period: NEAR_PERIOD,
                    target_height: NEAR_TARGET_H,
                },
            ],
            actors: vec![
                horse(
                    lane(0.0),
                    1.4,
                    vec![
                        MotionStep::new(0.8, 80.0, 60.0),
                        MotionStep::new(3.0, 20.0, 50.0),
                    ],
                ),
                horse(
                    lane(10.0),
                    1.3,
                    vec![
                        MotionStep::new(1.0, 110.0, 80.0),
                        MotionStep::new(2.5, 160.0, 120.0),
                        MotionStep::new(4.0, 60.0, 100.0),
                    ],
                ),
                horse(
                    lane(20.0),
                    1.5,
                    vec![
                        MotionStep::new(1.4, 90.0, 70.0),
                        MotionStep::new(3.2, 120.0, 90.0),
                    ],
                ),
            ],
            finish: Some(FinishLineConfig::default()),
        }
    }
}

impl RaceConfig {
    /// Check cross-field invariants; per-entity checks run in the constructors
    pub fn validate(&self) -> Result<()> {
        if !(self.step > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        if !(self.countdown >= 0.0) {
            return Err(ConfigError::NegativeCountdown(self.countdown));
        }
        if self.frame_count == 0 {
            return Err(ConfigError::ZeroFrameCount);
        }
        if let Some(finish) = &self.finish {
            if !(finish.delay >= 0.0) {
                return Err(ConfigError::NegativeFinishDelay(finish.delay));
            }
            if finish.mode.needs_reference() {
                match finish.reference_layer {
                    None => return Err(ConfigError::MissingReferenceLayer(finish.mode)),
                    Some(index) if index >= self.layers.len() => {
                        return Err(ConfigError::ReferenceLayerOutOfRange {
                            index,
                            count: self.layers.len(),
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded race config from {}", path.as_ref().display());
        Ok(config)
    }
}
