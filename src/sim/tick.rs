//! Fixed timestep simulation tick
//!
//! Core race loop that advances the simulation deterministically. The phase
//! decides what moves: the countdown only ticks its timer, a running race
//! moves layers, then horses, then the finish line, then checks crossings.

use super::state::{RaceEvent, RaceState, Stage};

/// Advance the race by one fixed timestep
///
/// A finished race is frozen: nothing moves and no tick is counted.
pub fn tick(state: &mut RaceState, dt: f64) {
    if matches!(state.stage, Stage::Finished) {
        return;
    }
    state.time_ticks += 1;

    match &mut state.stage {
        Stage::Countdown(countdown) => {
            countdown.elapsed += dt;
            let done = countdown.is_done();

            if state.idle_animation {
                for actor in &mut state.actors {
                    actor.update(dt, false);
                }
            }

            if done {
                state.start_race();
            }
        }

        Stage::Running => run(state, dt),

        Stage::Finished => {}
    }
}

/// One Running tick
fn run(state: &mut RaceState, dt: f64) {
    state.running_ticks += 1;
    state.race_time += dt;
    let now = state.race_time;

    for layer in &mut state.layers {
        layer.advance(dt);
    }

    for actor in &mut state.actors {
        actor.apply_due_steps(now);
        actor.update(dt, true);
    }

    let Some(finish) = &mut state.finish else {
        return;
    };
    if finish.advance(dt, true, &state.layers) {
        log::info!("Finish line activated at t={:.3}s, x={:.1}", now, finish.x);
        state.events.push(RaceEvent::FinishLineActivated { race_time: now });
    }
    if !finish.active {
        return;
    }

    // Same-tick positions on both sides, no lag
    let reached: Vec<usize> = state
        .actors
        .iter()
        .enumerate()
        .filter(|&(i, actor)| !state.crossed[i] && finish.has_reached(actor.x))
        .map(|(i, _)| i)
        .collect();
    for i in reached {
        state.mark_crossed(i);
    }

    if state.all_crossed() {
        state.finish_race();
    }
}
