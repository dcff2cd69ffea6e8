//! Read-only render snapshot
//!
//! Everything an external renderer needs for one frame, copied out of the
//! race so drawing never touches simulation state.

use glam::DVec2;
use serde::Serialize;

use crate::sim::{RacePhase, RaceState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerView {
    /// Wrapped offset; tiles are drawn from `-offset`
    pub offset: f64,
    pub target_height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    /// Sprite anchor: track position and lane baseline plus bob
    pub anchor: DVec2,
    /// Lane baseline without bob, for depth sorting
    pub lane_y: f64,
    pub frame: u32,
    pub bob: f64,
    pub crossed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishLineView {
    pub active: bool,
    pub x: f64,
    pub width: f64,
    /// Packed 0xRRGGBB
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceView {
    pub phase: RacePhase,
    /// Number to draw during the countdown
    pub countdown: Option<u32>,
    pub race_time: f64,
    pub layers: Vec<LayerView>,
    pub actors: Vec<ActorView>,
    pub finish: Option<FinishLineView>,
}

impl RaceView {
    pub fn capture(state: &RaceState) -> Self {
        let layers = state
            .layers
            .iter()
            .map(|layer| LayerView {
                offset: layer.offset,
                target_height: layer.target_height(),
            })
            .collect();

        let actors = state
            .actors
            .iter()
            .enumerate()
            .map(|(i, actor)| {
                let bob = actor.bob();
                ActorView {
                    anchor: DVec2::new(actor.x, actor.lane_y + bob),
                    lane_y: actor.lane_y,
                    frame: actor.anim.frame,
                    bob,
                    crossed: state.crossed(i),
                }
            })
            .collect();

        let finish = state.finish.as_ref().map(|line| FinishLineView {
            active: line.active,
            x: line.x,
            width: line.width,
            color: line.color,
        });

        Self {
            phase: state.phase(),
            countdown: state.countdown_display(),
            race_time: state.race_time,
            layers,
            actors,
            finish,
        }
    }

    /// Actor indices in back-to-front draw order (by lane)
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.actors.len()).collect();
        order.sort_by(|&a, &b| self.actors[a].lane_y.total_cmp(&self.actors[b].lane_y));
        order
    }
}
