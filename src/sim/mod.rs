//! Race simulation
//!
//! The clock feeds whole steps into `tick`, which moves the race through
//! countdown, running and finished. Horses follow their motion plans, the
//! background scrolls, and the finish line sweeps in to end the race.
//! Replaying the same config and step count gives the same race.

pub mod actor;
pub mod clock;
pub mod finish;
pub mod layer;
pub mod plan;
pub mod state;
pub mod tick;

pub use actor::{Actor, AnimationPhase};
pub use clock::FixedTimestep;
pub use finish::FinishLine;
pub use layer::ScrollingLayer;
pub use plan::{MotionPlan, MotionStep, PlanProfile, generate_plan};
pub use state::{Countdown, RaceEvent, RacePhase, RaceResult, RaceState};
pub use tick::tick;
