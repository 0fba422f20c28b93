//! Core reactive logic for an interactive desktop pony.
//!
//! Two pieces do the real work:
//!
//! - [`ShakeDetector`] samples the host window position on a fixed period and
//!   classifies the samples into `shakestart` / `shakeend` events.
//! - [`InteractionStateMachine`] turns boops and shake events into the current
//!   [`DisplayState`], driven by a boop counter and three timer slots.
//!
//! Everything runs on a single thread. Timers are owned by a [`TimerRuntime`]
//! which the host advances; callbacks fire one at a time in due order.
//!
//! ```text
//! HostWindow → MotionSampler → ShakeClassifier → ShakeEvent
//!                                                   ↓
//! UserInput ─────────────────────────→ InteractionStateMachine → RenderUpdate
//! ```

mod collections;

pub mod config;
pub mod detector;
pub mod display;
pub mod geometry;
pub mod interaction;
pub mod listeners;
pub mod platform;
pub mod pony;
pub mod runtime;
pub mod sampler;
pub mod shake;
pub mod timer;

pub use config::{ConfigError, InteractionConfig, PonyConfig, ShakeConfig};
pub use detector::ShakeDetector;
pub use display::{BoopTransitionTable, DisplayState};
pub use geometry::{MotionSample, Position};
pub use interaction::{InteractionStateMachine, InteractionTimer, RenderUpdate, UserInput};
pub use listeners::{ListenerId, Listeners};
pub use platform::{Clock, HostWindow};
pub use pony::Pony;
pub use runtime::{TimerId, TimerRuntime, TimerRuntimeHandle};
pub use sampler::MotionSampler;
pub use shake::{ShakeClassifier, ShakeEvent, ShakePhase};
pub use timer::{TimerRegistration, TimerSlot};
