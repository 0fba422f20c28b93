//! End-to-end harness around one [`Pony`].
//!
//! ```
//! use ponyboop_core::{DisplayState, PonyConfig, UserInput};
//! use ponyboop_testing::PonyTestRule;
//!
//! let rule = PonyTestRule::new(PonyConfig::default());
//! rule.connect();
//! rule.pony().user_input(UserInput::Boop);
//! assert_eq!(rule.pony().display_state(), DisplayState::Booped1);
//! rule.advance_by(1000);
//! assert_eq!(rule.pony().display_state(), DisplayState::Resting);
//! ```

use std::rc::Rc;

use ponyboop_core::{
    HostWindow, Pony, PonyConfig, Position, RenderUpdate, ShakeEvent, TimerRuntime, UserInput,
};

use crate::recorder::Recorder;
use crate::window::{oscillation, ScriptedWindow};

/// Where the scripted window starts.
pub const DEFAULT_ORIGIN: Position = Position::new(400, 300);

/// A pony on a virtual clock, living in a scripted window, with recorders
/// attached to its render output and shake events.
pub struct PonyTestRule {
    runtime: TimerRuntime,
    window: Rc<ScriptedWindow>,
    pony: Pony,
    renders: Recorder<RenderUpdate>,
    shakes: Recorder<ShakeEvent>,
    check_interval_ms: u64,
}

impl PonyTestRule {
    pub fn new(config: PonyConfig) -> Self {
        Self::with_origin(config, DEFAULT_ORIGIN)
    }

    pub fn with_origin(config: PonyConfig, origin: Position) -> Self {
        let runtime = TimerRuntime::new();
        let window = Rc::new(ScriptedWindow::new(runtime.handle(), origin));
        let check_interval_ms = config.shake.check_interval_ms;
        let pony = Pony::new(runtime.handle(), config);

        let renders = Recorder::new(runtime.handle());
        pony.add_render_listener(renders.listener());
        let shakes = Recorder::new(runtime.handle());
        pony.detector().add_listener(shakes.listener());

        Self {
            runtime,
            window,
            pony,
            renders,
            shakes,
            check_interval_ms,
        }
    }

    pub fn runtime(&self) -> &TimerRuntime {
        &self.runtime
    }

    pub fn window(&self) -> &Rc<ScriptedWindow> {
        &self.window
    }

    pub fn pony(&self) -> &Pony {
        &self.pony
    }

    pub fn renders(&self) -> &Recorder<RenderUpdate> {
        &self.renders
    }

    pub fn shakes(&self) -> &Recorder<ShakeEvent> {
        &self.shakes
    }

    pub fn now_ms(&self) -> u64 {
        self.runtime.now_ms()
    }

    /// Connects the pony to the scripted window.
    pub fn connect(&self) {
        let window: Rc<dyn HostWindow> = self.window.clone();
        self.pony.connect(window);
    }

    pub fn disconnect(&self) {
        self.pony.disconnect();
    }

    pub fn advance_by(&self, delta_ms: u64) -> usize {
        self.runtime.advance_by(delta_ms)
    }

    pub fn advance_to(&self, now_ms: u64) -> usize {
        self.runtime.advance_to(now_ms)
    }

    /// Boops `times` times, `spacing_ms` apart, starting now.
    pub fn boop(&self, times: u32, spacing_ms: u64) {
        for index in 0..times {
            if index > 0 {
                self.advance_by(spacing_ms);
            }
            self.pony.user_input(UserInput::Boop);
        }
    }

    /// Scripts a side-to-side shake of the window from now for `duration_ms`,
    /// switching sides once per sampling interval. Time is not advanced.
    pub fn script_shake(&self, amplitude: i32, duration_ms: u64) {
        let start = self.now_ms() + 1;
        let origin = self.window.position_at(self.now_ms());
        log::debug!("scripting a {amplitude}px shake from {start}ms for {duration_ms}ms");
        self.window.extend_path(oscillation(
            origin,
            amplitude,
            start,
            start + duration_ms,
            self.check_interval_ms,
        ));
    }
}
