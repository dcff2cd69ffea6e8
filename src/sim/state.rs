//! Race state and core simulation types
//!
//! One owned aggregate holds everything a tick touches. There is no ambient
//! state, so independent races can run side by side.

use serde::Serialize;

use super::actor::Actor;
use super::finish::FinishLine;
use super::layer::ScrollingLayer;
use crate::config::RaceConfig;
use crate::direction_sign;
use crate::error::Result;

/// Top-level race mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RacePhase {
    /// Gates closed, counting down
    Countdown,
    /// Horses running, background scrolling
    Running,
    /// Every horse crossed the line
    Finished,
}

/// Countdown timer, only alive before the gates open
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Countdown {
    pub elapsed: f64,
    pub duration: f64,
}

impl Countdown {
    pub fn remaining(&self) -> f64 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Phase plus the data that only exists in that phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) enum Stage {
    Countdown(Countdown),
    Running,
    Finished,
}

/// Things that happened during a tick, for logging and UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RaceEvent {
    RaceStarted,
    FinishLineActivated { race_time: f64 },
    ActorCrossed { actor: usize, race_time: f64 },
    RaceFinished { race_time: f64 },
}

/// One entry of the finishing order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceResult {
    pub actor: usize,
    /// Race time of the crossing tick
    pub race_time: f64,
    /// Running tick on which the crossing was detected (1-based)
    pub tick: u64,
}

/// Complete race state (deterministic)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceState {
    pub(crate) stage: Stage,
    /// Race time since the gates opened (seconds)
    pub race_time: f64,
    /// All ticks since construction
    pub time_ticks: u64,
    /// Ticks spent in Running
    pub running_ticks: u64,
    pub layers: Vec<ScrollingLayer>,
    pub actors: Vec<Actor>,
    pub finish: Option<FinishLine>,
    /// Per-actor crossed flags; set once, never cleared
    pub(crate) crossed: Vec<bool>,
    pub(crate) results: Vec<RaceResult>,
    pub(crate) idle_animation: bool,
    pub(crate) countdown_min_display: u32,
    #[serde(skip)]
    pub(crate) events: Vec<RaceEvent>,
}

impl RaceState {
    /// Build a race from validated configuration
    pub fn new(config: &RaceConfig) -> Result<Self> {
        config.validate()?;

        let layers = config
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| ScrollingLayer::new(i, layer))
            .collect::<Result<Vec<_>>>()?;

        let actors = config
            .actors
            .iter()
            .map(|actor| Actor::new(actor, config.frame_count, config.anim_fps))
            .collect::<Result<Vec<_>>>()?;

        let finish = config
            .finish
            .as_ref()
            .map(|finish| FinishLine::new(finish, config.screen_width, layers.len()))
            .transpose()?;

        if let Some(line) = &finish {
            let s = direction_sign(line.direction());
            let chased = !actors.is_empty()
                && actors.iter().all(|a| {
                    let final_vx = a.plan().final_target().unwrap_or(a.target_vx);
                    final_vx * s > 0.0
                });
            if chased {
                log::warn!(
                    "finish line travels {:?}, same as every horse; it may never catch them",
                    line.direction()
                );
            }
        }

        log::info!(
            "Race built: {} horses, {} layers, finish line {}",
            actors.len(),
            layers.len(),
            if finish.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            stage: Stage::Countdown(Countdown {
                elapsed: 0.0,
                duration: config.countdown,
            }),
            race_time: 0.0,
            time_ticks: 0,
            running_ticks: 0,
            crossed: vec![false; actors.len()],
            layers,
            actors,
            finish,
            results: Vec::new(),
            idle_animation: config.idle_animation,
            countdown_min_display: config.countdown_min_display,
            events: Vec::new(),
        })
    }

    pub fn phase(&self) -> RacePhase {
        match self.stage {
            Stage::Countdown(_) => RacePhase::Countdown,
            Stage::Running => RacePhase::Running,
            Stage::Finished => RacePhase::Finished,
        }
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        match &self.stage {
            Stage::Countdown(countdown) => Some(countdown),
            _ => None,
        }
    }

    /// Whole seconds left to show, rounded up and floored at the minimum display
    pub fn countdown_display(&self) -> Option<u32> {
        self.countdown().map(|c| {
            let shown = c.remaining().ceil() as u32;
            shown.max(self.countdown_min_display)
        })
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == RacePhase::Finished
    }

    pub fn crossed(&self, actor: usize) -> bool {
        self.crossed.get(actor).copied().unwrap_or(false)
    }

    pub fn all_crossed(&self) -> bool {
        self.crossed.iter().all(|&c| c)
    }

    /// Finishing order so far
    pub fn results(&self) -> &[RaceResult] {
        &self.results
    }

    pub fn winner(&self) -> Option<usize> {
        self.results.first().map(|r| r.actor)
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<RaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Countdown -> Running
    pub(crate) fn start_race(&mut self) {
        self.stage = Stage::Running;
        self.race_time = 0.0;
        if let Some(finish) = &mut self.finish {
            finish.reset();
        }
        log::info!("Gates open after {} ticks", self.time_ticks);
        self.events.push(RaceEvent::RaceStarted);
    }

    /// Running -> Finished
    pub(crate) fn finish_race(&mut self) {
        self.stage = Stage::Finished;
        log::info!(
            "Race finished at t={:.3}s, winner: horse {:?}",
            self.race_time,
            self.winner()
        );
        self.events.push(RaceEvent::RaceFinished {
            race_time: self.race_time,
        });
    }

    /// Mark an actor crossed; no-op if already marked
    pub(crate) fn mark_crossed(&mut self, actor: usize) {
        if self.crossed[actor] {
            return;
        }
        self.crossed[actor] = true;
        self.results.push(RaceResult {
            actor,
            race_time: self.race_time,
            tick: self.running_ticks,
        });
        log::info!(
            "Horse {} crossed at t={:.3}s (place {})",
            actor,
            self.race_time,
            self.results.len()
        );
        self.events.push(RaceEvent::ActorCrossed {
            actor,
            race_time: self.race_time,
        });
    }
}
