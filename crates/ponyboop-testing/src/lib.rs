//! Testing utilities and harness for ponyboop
//!
//! Everything here runs on a virtual [`TimerRuntime`](ponyboop_core::TimerRuntime):
//! tests move windows along scripted paths and advance time explicitly, so
//! shake detection and interaction timers are fully deterministic.

pub mod assertions;
pub mod recorder;
pub mod rule;
pub mod window;

pub use recorder::Recorder;
pub use rule::PonyTestRule;
pub use window::{oscillation, ScriptedWindow};

pub mod prelude {
    pub use crate::assertions;
    pub use crate::recorder::Recorder;
    pub use crate::rule::PonyTestRule;
    pub use crate::window::{oscillation, ScriptedWindow};
}
