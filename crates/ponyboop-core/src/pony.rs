use std::rc::Rc;

use crate::config::PonyConfig;
use crate::detector::ShakeDetector;
use crate::display::DisplayState;
use crate::interaction::{InteractionStateMachine, RenderUpdate, UserInput};
use crate::listeners::ListenerId;
use crate::platform::HostWindow;
use crate::runtime::TimerRuntimeHandle;
use crate::shake::ShakePhase;

/// One pony living in one host window.
///
/// Wires a [`ShakeDetector`] into an [`InteractionStateMachine`] and follows
/// the host element lifecycle: connect to a window, move to another window,
/// disconnect. Dropping a pony disconnects it.
pub struct Pony {
    detector: ShakeDetector,
    machine: InteractionStateMachine,
}

impl Pony {
    pub fn new(runtime: TimerRuntimeHandle, config: PonyConfig) -> Self {
        let detector = ShakeDetector::new(runtime.clone(), config.shake);
        let machine = InteractionStateMachine::new(runtime, config.interaction);

        let on_start = machine.clone();
        detector.on_shake_start(move || on_start.on_shake_start());
        let on_end = machine.clone();
        detector.on_shake_end(move || on_end.on_shake_end());

        Self { detector, machine }
    }

    /// Starts watching `window` and starts the inactivity countdown. A pony
    /// disconnected mid-shake finishes recovering.
    pub fn connect(&self, window: Rc<dyn HostWindow>) {
        self.detector.attach(window);
        self.machine.resume();
        self.machine.on_any_interaction();
    }

    /// Moves the pony to another host window.
    pub fn adopt(&self, window: Rc<dyn HostWindow>) {
        self.detector.detach();
        self.detector.attach(window);
        self.machine.resume();
        self.machine.on_any_interaction();
    }

    /// Stops sampling and cancels every interaction timer. Idempotent.
    pub fn disconnect(&self) {
        self.detector.detach();
        self.machine.teardown();
    }

    pub fn is_connected(&self) -> bool {
        self.detector.is_attached()
    }

    pub fn user_input(&self, input: UserInput) {
        self.machine.user_input(input);
    }

    pub fn display_state(&self) -> DisplayState {
        self.machine.display_state()
    }

    pub fn boop_count(&self) -> u32 {
        self.machine.boop_count()
    }

    pub fn boop_enabled(&self) -> bool {
        self.machine.boop_enabled()
    }

    pub fn shake_phase(&self) -> ShakePhase {
        self.detector.phase()
    }

    pub fn add_render_listener(&self, listener: impl Fn(&RenderUpdate) + 'static) -> ListenerId {
        self.machine.add_listener(listener)
    }

    pub fn detector(&self) -> &ShakeDetector {
        &self.detector
    }

    pub fn machine(&self) -> &InteractionStateMachine {
        &self.machine
    }
}

impl Drop for Pony {
    fn drop(&mut self) {
        self.disconnect();
    }
}
