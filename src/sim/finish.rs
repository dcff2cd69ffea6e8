//! Sweeping finish line
//!
//! The line waits `delay` seconds of race time, spawns off-screen on the side it
//! travels away from, then sweeps across the track.

use serde::Serialize;

use super::layer::ScrollingLayer;
use crate::config::{Direction, FinishLineConfig, SpeedMode};
use crate::consts::FINISH_OFFSCREEN_MARGIN;
use crate::direction_sign;
use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishLine {
    pub active: bool,
    /// Left edge of the line (pixels)
    pub x: f64,
    /// Time accumulated toward activation
    pub elapsed: f64,
    pub width: f64,
    pub color: u32,
    direction: Direction,
    mode: SpeedMode,
    delay: f64,
    speed: f64,
    speed_scale: f64,
    reference_layer: Option<usize>,
    start_left: f64,
    start_right: f64,
}

impl FinishLine {
    pub fn new(config: &FinishLineConfig, screen_width: f64, layer_count: usize) -> Result<Self> {
        if !(config.delay >= 0.0) {
            return Err(ConfigError::NegativeFinishDelay(config.delay));
        }
        match (config.mode, config.reference_layer) {
            (SpeedMode::Fixed, _) => {}
            (mode, None) => return Err(ConfigError::MissingReferenceLayer(mode)),
            (_, Some(index)) if index >= layer_count => {
                return Err(ConfigError::ReferenceLayerOutOfRange {
                    index,
                    count: layer_count,
                });
            }
            _ => {}
        }

        Ok(Self {
            active: false,
            x: 0.0,
            elapsed: 0.0,
            width: config.width,
            color: config.color,
            direction: config.direction,
            mode: config.mode,
            delay: config.delay,
            speed: config.speed,
            speed_scale: config.speed_scale,
            reference_layer: config.reference_layer,
            start_left: -FINISH_OFFSCREEN_MARGIN,
            start_right: screen_width + FINISH_OFFSCREEN_MARGIN,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn mode(&self) -> SpeedMode {
        self.mode
    }

    /// Restart the activation delay (called when the race begins)
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.active = false;
    }

    /// Speed in pixels/s under the configured mode
    pub fn effective_speed(&self, layers: &[ScrollingLayer]) -> f64 {
        let reference = || {
            self.reference_layer
                .and_then(|i| layers.get(i))
                .map_or(0.0, ScrollingLayer::speed)
        };
        match self.mode {
            SpeedMode::Fixed => self.speed,
            SpeedMode::Scale => reference() * self.speed_scale,
            SpeedMode::Follow => reference(),
        }
    }

    /// Tick the activation timer and move the line.
    ///
    /// Returns true on the tick the line activates.
    pub fn advance(&mut self, dt: f64, timer_enabled: bool, layers: &[ScrollingLayer]) -> bool {
        if timer_enabled {
            self.elapsed += dt;
        }
        let mut activated = false;
        if !self.active && self.elapsed >= self.delay {
            self.active = true;
            self.x = match self.direction {
                Direction::Right => self.start_left,
                Direction::Left => self.start_right,
            };
            activated = true;
        }
        if self.active {
            let v = self.effective_speed(layers);
            self.x += direction_sign(self.direction) * v * dt;
        }
        activated
    }

    /// Edge farthest along the direction of travel
    pub fn leading_edge(&self) -> f64 {
        match self.direction {
            Direction::Right => self.x + self.width,
            Direction::Left => self.x,
        }
    }

    /// Whether the line has reached or passed `actor_x`
    pub fn has_reached(&self, actor_x: f64) -> bool {
        if !self.active {
            return false;
        }
        let s = direction_sign(self.direction);
        s * self.leading_edge() >= s * actor_x
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayerConfig;
    use crate::consts::SIM_DT;

    fn config(direction: Direction, mode: SpeedMode, reference_layer: Option<usize>) -> FinishLineConfig {
        FinishLineConfig {
            direction,
            mode,
            reference_layer,
            ..FinishLineConfig::default()
        }
    }

    fn near_layer() -> Vec<ScrollingLayer> {
        let layer = LayerConfig {
            speed: 110.0,
            direction: Direction::Right,
            period: 1000.0,
            target_height: 140.0,
        };
        vec![ScrollingLayer::new(0, &layer).unwrap()]
    }

    #[test]
    fn test_activates_once_after_delay() {
        let mut line = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        let mut activations = 0;
        for _ in 0..600 {
            if line.advance(SIM_DT, true, &[]) {
                activations += 1;
            }
        }
        assert_eq!(activations, 1);
        assert!(line.active);
    }

    #[test]
    fn test_spawns_opposite_travel_side() {
        let mut left = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        left.elapsed = left.delay;
        left.advance(0.0, false, &[]);
        assert_eq!(left.x, 960.0 + FINISH_OFFSCREEN_MARGIN);

        let mut right = FinishLine::new(&config(Direction::Right, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        right.elapsed = right.delay;
        right.advance(0.0, false, &[]);
        assert_eq!(right.x, -FINISH_OFFSCREEN_MARGIN);
    }

    #[test]
    fn test_timer_disabled_holds() {
        let mut line = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        for _ in 0..1000 {
            line.advance(SIM_DT, false, &[]);
        }
        assert!(!line.active);
        assert_eq!(line.elapsed, 0.0);
    }

    #[test]
    fn test_reset_restarts_delay() {
        let mut line = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        line.elapsed = 100.0;
        line.advance(SIM_DT, true, &[]);
        assert!(line.active);
        line.reset();
        assert!(!line.active);
        assert_eq!(line.elapsed, 0.0);
    }

    #[test]
    fn test_speed_modes() {
        let layers = near_layer();
        let fixed = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 1).unwrap();
        assert_eq!(fixed.effective_speed(&layers), 180.0);
        let scale = FinishLine::new(&config(Direction::Left, SpeedMode::Scale, Some(0)), 960.0, 1).unwrap();
        assert!((scale.effective_speed(&layers) - 132.0).abs() < 1e-9);
        let follow = FinishLine::new(&config(Direction::Left, SpeedMode::Follow, Some(0)), 960.0, 1).unwrap();
        assert_eq!(follow.effective_speed(&layers), 110.0);
    }

    #[test]
    fn test_reference_layer_required() {
        assert!(matches!(
            FinishLine::new(&config(Direction::Left, SpeedMode::Scale, None), 960.0, 2),
            Err(ConfigError::MissingReferenceLayer(SpeedMode::Scale))
        ));
        assert!(matches!(
            FinishLine::new(&config(Direction::Left, SpeedMode::Follow, Some(2)), 960.0, 2),
            Err(ConfigError::ReferenceLayerOutOfRange { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_negative_delay_rejected() {
        let mut cfg = config(Direction::Left, SpeedMode::Fixed, None);
        cfg.delay = -1.0;
        assert!(matches!(
            FinishLine::new(&cfg, 960.0, 0),
            Err(ConfigError::NegativeFinishDelay(_))
        ));
    }

    #[test]
    fn test_nan_delay_rejected() {
        let mut cfg = config(Direction::Left, SpeedMode::Fixed, None);
        cfg.delay = f64::NAN;
        assert!(matches!(
            FinishLine::new(&cfg, 960.0, 0),
            Err(ConfigError::NegativeFinishDelay(_))
        ));
    }

    #[test]
    fn test_leading_edge_and_reach() {
        let mut line = FinishLine::new(&config(Direction::Right, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        assert!(!line.has_reached(-1000.0));
        line.active = true;
        line.x = 100.0;
        assert_eq!(line.leading_edge(), 100.0 + line.width);
        assert!(line.has_reached(106.0));
        assert!(!line.has_reached(106.5));

        let mut left = FinishLine::new(&config(Direction::Left, SpeedMode::Fixed, None), 960.0, 0).unwrap();
        left.active = true;
        left.x = 100.0;
        assert_eq!(left.leading_edge(), 100.0);
        assert!(left.has_reached(100.0));
        assert!(!left.has_reached(99.0));
    }
}
