//! Infinitely tiled parallax layer
//!
//! Only the wrapped offset is simulated; tiling the texture is the renderer's job.

use serde::Serialize;

use crate::config::{Direction, LayerConfig};
use crate::error::{ConfigError, Result};
use crate::{direction_sign, wrap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollingLayer {
    /// Wrapped scroll offset in `[0, period)`
    pub offset: f64,
    speed: f64,
    direction: Direction,
    /// Width of one texture tile (pixels)
    period: f64,
    /// Draw height the texture is scaled to
    target_height: f64,
}

impl ScrollingLayer {
    pub fn new(index: usize, config: &LayerConfig) -> Result<Self> {
        if !(config.period > 0.0) {
            return Err(ConfigError::NonPositivePeriod {
                index,
                period: config.period,
            });
        }
        Ok(Self {
            offset: 0.0,
            speed: config.speed,
            direction: config.direction,
            period: config.period,
            target_height: config.target_height,
        })
    }

    pub fn advance(&mut self, dt: f64) {
        let delta = direction_sign(self.direction) * self.speed * dt;
        self.offset = wrap(self.offset + delta, self.period);
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    pub fn target_height(&self) -> f64 {
        self.target_height
    }
}
