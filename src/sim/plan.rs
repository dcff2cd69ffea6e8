//! Declarative motion plans
//!
//! A plan is pure data: a list of timed directives sorted by activation time.
//! The actor consumes it through a cursor, so a directive fires at most once.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// One timed directive: from `t` onward, accelerate toward `target_vx`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionStep {
    /// Race time (seconds) at which the step takes effect
    pub t: f64,
    /// New target velocity (pixels/s, positive = rightward)
    pub target_vx: f64,
    /// New acceleration magnitude (pixels/s²); zero or less means coast
    pub accel: f64,
}

impl MotionStep {
    pub fn new(t: f64, target_vx: f64, accel: f64) -> Self {
        Self { t, target_vx, accel }
    }
}

/// Sorted list of steps plus the cursor of the next unconsumed one
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MotionPlan {
    steps: Vec<MotionStep>,
    cursor: usize,
}

impl MotionPlan {
    /// Build a plan, sorting by activation time.
    ///
    /// The sort is stable: steps sharing a timestamp keep their list order,
    /// so the later one in the input wins.
    pub fn new(mut steps: Vec<MotionStep>) -> Result<Self> {
        for (index, step) in steps.iter().enumerate() {
            if !(step.t.is_finite() && step.target_vx.is_finite() && step.accel.is_finite()) {
                return Err(ConfigError::NonFinitePlanStep { index });
            }
        }
        steps.sort_by(|a, b| a.t.total_cmp(&b.t));
        Ok(Self { steps, cursor: 0 })
    }

    /// All steps in activation order
    pub fn steps(&self) -> &[MotionStep] {
        &self.steps
    }

    /// Index of the next step that has not fired yet
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True once every step has fired
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.steps.len()
    }

    /// Pop every step due at or before `now`, in time order
    pub fn take_due(&mut self, now: f64) -> &[MotionStep] {
        let start = self.cursor;
        while self.cursor < self.steps.len() && self.steps[self.cursor].t <= now {
            self.cursor += 1;
        }
        &self.steps[start..self.cursor]
    }

    /// Target velocity of the final step, if any
    pub fn final_target(&self) -> Option<f64> {
        self.steps.last().map(|s| s.target_vx)
    }
}

/// Bounds for randomly generated plans
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanProfile {
    /// Number of directives per plan
    pub steps: usize,
    /// First directive fires somewhere in this window (seconds)
    pub first_step: (f64, f64),
    /// Gap between consecutive directives (seconds)
    pub gap: (f64, f64),
    /// Target velocity range (pixels/s)
    pub target_vx: (f64, f64),
    /// Acceleration range (pixels/s²)
    pub accel: (f64, f64),
}

impl Default for PlanProfile {
    fn default() -> Self {
        Self {
            steps: 3,
            first_step: (0.5, 1.5),
            gap: (1.0, 2.5),
            target_vx: (20.0, 160.0),
            accel: (50.0, 120.0),
        }
    }
}

/// Draw a value from `[lo, hi)`, or `lo` when the range is empty
fn sample(rng: &mut Pcg32, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Generate a random plan; the same seed always yields the same plan
pub fn generate_plan(seed: u64, profile: &PlanProfile) -> Vec<MotionStep> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut t = sample(&mut rng, profile.first_step);
    let mut steps = Vec::with_capacity(profile.steps);
    for _ in 0..profile.steps {
        let target_vx = sample(&mut rng, profile.target_vx);
        let accel = sample(&mut rng, profile.accel);
        steps.push(MotionStep::new(t, target_vx, accel));
        t += sample(&mut rng, profile.gap);
    }
    steps
}
