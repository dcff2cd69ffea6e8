//! Construction-time errors
//!
//! The tick path never fails; every invariant is checked once when a race is built.

use thiserror::Error;

use crate::config::SpeedMode;

/// Result type for race construction
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Invalid race configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("fixed step must be positive, got {0}")]
    NonPositiveStep(f64),

    #[error("countdown duration must not be negative, got {0}")]
    NegativeCountdown(f64),

    #[error("finish line delay must not be negative, got {0}")]
    NegativeFinishDelay(f64),

    #[error("finish line speed mode {0:?} needs a reference layer")]
    MissingReferenceLayer(SpeedMode),

    #[error("reference layer {index} out of range ({count} layers)")]
    ReferenceLayerOutOfRange { index: usize, count: usize },

    #[error("layer {index} period must be positive, got {period}")]
    NonPositivePeriod { index: usize, period: f64 },

    #[error("animation rate must be positive, got {0}")]
    NonPositiveAnimationRate(f64),

    #[error("animation needs at least one frame")]
    ZeroFrameCount,

    #[error("plan step {index} has a non-finite value")]
    NonFinitePlanStep { index: usize },

    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
