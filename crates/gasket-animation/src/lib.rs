//! Animation sequencer for the gasket visualizer
//!
//! A [`Sequence`] is an ordered script of symbolic [`Action`]s. The
//! [`AnimationEngine`] executes it one action at a time, advancing a
//! cumulative transform state once per tick and composing the model matrix
//! handed to a [`Renderer`].
//!
//! The engine never schedules itself: the host calls [`AnimationEngine::tick`]
//! from its frame callback, which keeps tests deterministic.

pub mod action;
pub mod clock;
pub mod engine;
pub mod renderer;
pub mod sequence;
pub mod state;

pub use action::{Action, ActionField, ActionKind};
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::{AnimationEngine, EnginePhase, TickOutcome, TickRates};
pub use renderer::Renderer;
pub use sequence::Sequence;
pub use state::{AxisAngles, BounceBounds, EngineState};
