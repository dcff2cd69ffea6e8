//! Fixed timestep accumulator
//!
//! Decouples simulation rate from display rate. Wall time goes in, a whole
//! number of fixed ticks comes out; the remainder carries to the next frame.

use serde::Serialize;

use crate::error::{ConfigError, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedTimestep {
    step: f64,
    accumulator: f64,
    /// Ticks run by the most recent `feed`
    steps_this_frame: u32,
}

impl FixedTimestep {
    pub fn new(step: f64) -> Result<Self> {
        if !(step > 0.0) {
            return Err(ConfigError::NonPositiveStep(step));
        }
        Ok(Self {
            step,
            accumulator: 0.0,
            steps_this_frame: 0,
        })
    }

    /// Add `elapsed` seconds and run `tick` once per whole step.
    ///
    /// There is no upper bound on ticks per call; clamp `elapsed` beforehand
    /// to cap catch-up bursts after a stall.
    pub fn feed<F: FnMut(f64)>(&mut self, elapsed: f64, mut tick: F) -> u32 {
        self.accumulator += elapsed.max(0.0);
        self.steps_this_frame = 0;
        while self.accumulator >= self.step {
            tick(self.step);
            self.accumulator -= self.step;
            self.steps_this_frame += 1;
        }
        self.steps_this_frame
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    /// Unconsumed time, always in `[0, step)` between calls
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn steps_this_frame(&self) -> u32 {
        self.steps_this_frame
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0)
    pub fn alpha(&self) -> f64 {
        self.accumulator / self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    #[test]
    fn test_one_step_exact() {
        let mut clock = FixedTimestep::new(0.25).unwrap();
        assert_eq!(clock.feed(0.25, |_| {}), 1);
        assert_eq!(clock.accumulator(), 0.0);
    }

    #[test]
    fn test_partial_carries_over() {
        let mut clock = FixedTimestep::new(SIM_DT).unwrap();
        assert_eq!(clock.feed(0.008, |_| {}), 0);
        assert_eq!(clock.feed(0.010, |_| {}), 1);
        assert!(clock.accumulator() < SIM_DT);
    }

    #[test]
    fn test_stall_bursts_without_cap() {
        let mut clock = FixedTimestep::new(0.125).unwrap();
        let mut seen = Vec::new();
        assert_eq!(clock.feed(1.0, |dt| seen.push(dt)), 8);
        assert!(seen.iter().all(|&dt| dt == 0.125));
        assert_eq!(clock.steps_this_frame(), 8);
    }

    #[test]
    fn test_rejects_non_positive_step() {
        assert!(matches!(FixedTimestep::new(0.0), Err(ConfigError::NonPositiveStep(_))));
        assert!(matches!(FixedTimestep::new(-1.0), Err(ConfigError::NonPositiveStep(_))));
        assert!(FixedTimestep::new(f64::NAN).is_err());
    }

    proptest! {
        #[test]
        fn prop_accumulator_drained(frames in prop::collection::vec(0.0f64..0.5, 1..200)) {
            let mut clock = FixedTimestep::new(SIM_DT).unwrap();
            for elapsed in frames {
                clock.feed(elapsed, |_| {});
                prop_assert!(clock.accumulator() >= 0.0);
                prop_assert!(clock.accumulator() < SIM_DT);
                prop_assert!(clock.alpha() < 1.0);
            }
        }
    }
}
