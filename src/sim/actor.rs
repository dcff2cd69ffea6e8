//! Horse kinematics and sprite animation phase
//!
//! Motion is 1-D along the track. Animation runs on its own clock so a horse
//! can gallop in place while position integration is paused.

use serde::Serialize;

use super::plan::MotionPlan;
use crate::config::ActorConfig;
use crate::consts::BOB_FREQUENCY;
use crate::error::{ConfigError, Result};

/// Sprite animation phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationPhase {
    /// Current frame index in `[0, frame_count)`
    pub frame: u32,
    /// Time carried toward the next frame advance
    pub residual: f64,
    frame_count: u32,
    frame_time: f64,
}

impl AnimationPhase {
    pub fn new(frame_count: u32, fps: f64) -> Result<Self> {
        if frame_count == 0 {
            return Err(ConfigError::ZeroFrameCount);
        }
        if !(fps > 0.0) {
            return Err(ConfigError::NonPositiveAnimationRate(fps));
        }
        Ok(Self {
            frame: 0,
            residual: 0.0,
            frame_count,
            frame_time: 1.0 / fps,
        })
    }

    pub fn advance(&mut self, dt: f64) {
        self.residual += dt;
        while self.residual >= self.frame_time {
            self.frame = (self.frame + 1) % self.frame_count;
            self.residual -= self.frame_time;
        }
    }
}

/// One racing horse
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Actor {
    /// Track position (pixels, screen space)
    pub x: f64,
    /// Lane baseline for drawing
    pub lane_y: f64,
    /// Current velocity (pixels/s)
    pub vx: f64,
    /// Velocity the actor accelerates toward
    pub target_vx: f64,
    /// Acceleration magnitude; zero or less coasts
    pub accel: f64,
    /// Actor-local elapsed time (drives the bob)
    pub t: f64,
    pub bob_amp: f64,
    pub anim: AnimationPhase,
    plan: MotionPlan,
}

impl Actor {
    pub fn new(config: &ActorConfig, frame_count: u32, anim_fps: f64) -> Result<Self> {
        Ok(Self {
            x: config.start_x,
            lane_y: config.lane_y,
            vx: config.vx,
            target_vx: config.target_vx,
            accel: config.accel,
            t: 0.0,
            bob_amp: config.bob_amp,
            anim: AnimationPhase::new(frame_count, anim_fps * config.anim_rate)?,
            plan: MotionPlan::new(config.plan.clone())?,
        })
    }

    pub fn plan(&self) -> &MotionPlan {
        &self.plan
    }

    /// Apply every plan step due at or before `now`; returns how many fired
    pub fn apply_due_steps(&mut self, now: f64) -> usize {
        let due = self.plan.take_due(now);
        for step in due {
            log::debug!(
                "plan step at t={:.3}: target_vx={} accel={}",
                step.t,
                step.target_vx,
                step.accel
            );
            self.target_vx = step.target_vx;
            self.accel = step.accel;
        }
        due.len()
    }

    /// Advance the animation clock only
    pub fn animate(&mut self, dt: f64) {
        self.anim.advance(dt);
        self.t += dt;
    }

    /// Move velocity toward target without overshoot, then move position
    pub fn integrate(&mut self, dt: f64) {
        if self.accel > 0.0 {
            let dv = self.accel * dt;
            if self.vx < self.target_vx {
                self.vx = (self.vx + dv).min(self.target_vx);
            } else if self.vx > self.target_vx {
                self.vx = (self.vx - dv).max(self.target_vx);
            }
        }
        self.x += self.vx * dt;
    }

    /// Full per-tick update: animation always, kinematics when enabled
    pub fn update(&mut self, dt: f64, position_enabled: bool) {
        self.animate(dt);
        if position_enabled {
            self.integrate(dt);
        }
    }

    /// Vertical bob offset for drawing
    pub fn bob(&self) -> f64 {
        (self.t * BOB_FREQUENCY).sin() * self.bob_amp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::plan::MotionStep;
    use proptest::prelude::*;

    fn actor(vx: f64, target_vx: f64, accel: f64, plan: Vec<MotionStep>) -> Actor {
        let config = ActorConfig {
            vx,
            target_vx,
            accel,
            plan,
            ..ActorConfig::default()
        };
        Actor::new(&config, 12, 10.0).unwrap()
    }

    #[test]
    fn test_coast_holds_velocity() {
        let mut a = actor(30.0, 100.0, 0.0, Vec::new());
        for _ in 0..600 {
            a.integrate(SIM_DT);
        }
        assert_eq!(a.vx, 30.0);
    }

    #[test]
    fn test_zero_accel_step_freezes_velocity() {
        let mut a = actor(
            0.0,
            0.0,
            0.0,
            vec![MotionStep::new(0.0, 100.0, 60.0), MotionStep::new(0.5, 200.0, 0.0)],
        );
        let mut now = 0.0;
        let mut frozen = None;
        for _ in 0..180 {
            now += SIM_DT;
            a.apply_due_steps(now);
            if a.accel == 0.0 && frozen.is_none() {
                frozen = Some(a.vx);
            }
            a.integrate(SIM_DT);
        }
        let frozen = frozen.unwrap();
        assert!(frozen > 0.0 && frozen < 100.0);
        assert_eq!(a.target_vx, 200.0);
        assert_eq!(a.vx, frozen);
    }

    #[test]
    fn test_empty_plan_keeps_initial_motion() {
        let mut a = actor(5.0, 5.0, 0.0, Vec::new());
        let x0 = a.x;
        assert_eq!(a.apply_due_steps(100.0), 0);
        a.integrate(1.0);
        assert!((a.x - (x0 + 5.0)).abs() < 1e-9);
    }

    #[test]
    fn test_reaches_target_in_bounded_ticks() {
        let mut a = actor(0.0, 80.0, 60.0, Vec::new());
        let bound = (80.0 / (60.0 * SIM_DT)).ceil() as usize;
        for _ in 0..bound {
            a.integrate(SIM_DT);
        }
        assert_eq!(a.vx, 80.0);
    }

    #[test]
    fn test_plan_step_replaces_target() {
        let mut a = actor(0.0, 0.0, 0.0, vec![MotionStep::new(0.8, 80.0, 60.0)]);
        assert_eq!(a.apply_due_steps(0.5), 0);
        assert_eq!(a.apply_due_steps(0.8), 1);
        assert_eq!(a.target_vx, 80.0);
        assert_eq!(a.accel, 60.0);
        // Overwriting state and re-querying must not replay the step
        a.target_vx = 1.0;
        assert_eq!(a.apply_due_steps(1.0), 0);
        assert_eq!(a.target_vx, 1.0);
    }

    #[test]
    fn test_animation_without_position() {
        let mut a = actor(50.0, 50.0, 0.0, Vec::new());
        let x0 = a.x;
        for _ in 0..60 {
            a.update(SIM_DT, false);
        }
        assert_eq!(a.x, x0);
        assert!(a.anim.frame > 0);
        assert!(a.t > 0.99);
    }

    #[test]
    fn test_animation_wraps_frames() {
        let mut anim = AnimationPhase::new(4, 10.0).unwrap();
        anim.advance(0.45);
        assert_eq!(anim.frame, 0);
        assert!(anim.residual < 0.1);
    }

    #[test]
    fn test_bad_animation_rejected() {
        assert!(matches!(AnimationPhase::new(0, 10.0), Err(ConfigError::ZeroFrameCount)));
        assert!(matches!(
            AnimationPhase::new(12, 0.0),
            Err(ConfigError::NonPositiveAnimationRate(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_velocity_never_overshoots(
            v0 in -200.0f64..200.0,
            target in -200.0f64..200.0,
            accel in 0.1f64..500.0,
        ) {
            let mut a = actor(v0, target, accel, Vec::new());
            let (lo, hi) = if v0 < target { (v0, target) } else { (target, v0) };
            let bound = ((target - v0).abs() / (accel * SIM_DT)).ceil() as usize + 1;
            for _ in 0..bound {
                a.integrate(SIM_DT);
                prop_assert!(a.vx >= lo && a.vx <= hi);
            }
            prop_assert_eq!(a.vx, target);
        }
    }
}
