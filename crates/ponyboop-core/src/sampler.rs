use std::cell::RefCell;
use std::rc::Rc;

use crate::geometry::{MotionSample, Position};
use crate::platform::HostWindow;
use crate::runtime::TimerRuntimeHandle;
use crate::timer::TimerSlot;

type SampleSink = Rc<dyn Fn(MotionSample) + 'static>;

#[derive(Default)]
struct SamplerState {
    window: Option<Rc<dyn HostWindow>>,
    sink: Option<SampleSink>,
    tick: TimerSlot,
    // Bumped on every attach and detach so a tick that is already running
    // cannot reschedule itself for a window it no longer belongs to.
    generation: u64,
}

struct SamplerShared {
    runtime: TimerRuntimeHandle,
    interval_ms: u64,
    state: RefCell<SamplerState>,
}

/// Reads the host window position every `interval_ms` while attached.
#[derive(Clone)]
pub struct MotionSampler {
    shared: Rc<SamplerShared>,
}

impl MotionSampler {
    pub fn new(runtime: TimerRuntimeHandle, interval_ms: u64) -> Self {
        debug_assert!(interval_ms > 0, "sampling interval must be non-zero");
        Self {
            shared: Rc::new(SamplerShared {
                runtime,
                interval_ms,
                state: RefCell::new(SamplerState::default()),
            }),
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.shared.interval_ms
    }

    pub fn is_attached(&self) -> bool {
        self.shared.state.borrow().window.is_some()
    }

    /// Starts sampling `window`, replacing any previous attachment.
    ///
    /// Returns the window's current position as the baseline. No sample is
    /// delivered for the baseline itself; the first sample arrives one
    /// interval later.
    pub fn attach(
        &self,
        window: Rc<dyn HostWindow>,
        sink: impl Fn(MotionSample) + 'static,
    ) -> Position {
        let baseline = window.screen_position();
        let mut state = self.shared.state.borrow_mut();
        state.tick.cancel();
        state.generation += 1;
        state.window = Some(window);
        state.sink = Some(Rc::new(sink));
        Self::schedule_tick(&self.shared, &mut state);
        log::trace!("sampler attached, baseline {baseline}");
        baseline
    }

    /// Stops sampling. Returns whether the sampler was attached.
    pub fn detach(&self) -> bool {
        let mut state = self.shared.state.borrow_mut();
        state.tick.cancel();
        state.sink = None;
        let was_attached = state.window.take().is_some();
        if was_attached {
            state.generation += 1;
            log::trace!("sampler detached");
        }
        was_attached
    }

    fn schedule_tick(shared: &Rc<SamplerShared>, state: &mut SamplerState) {
        let weak = Rc::downgrade(shared);
        let generation = state.generation;
        state
            .tick
            .schedule(&shared.runtime, shared.interval_ms, move |now_ms| {
                if let Some(shared) = weak.upgrade() {
                    Self::tick(&shared, generation, now_ms);
                }
            });
    }

    fn tick(shared: &Rc<SamplerShared>, generation: u64, now_ms: u64) {
        let (window, sink) = {
            let mut state = shared.state.borrow_mut();
            if state.generation != generation {
                return;
            }
            state.tick.mark_fired();
            match (&state.window, &state.sink) {
                (Some(window), Some(sink)) => (Rc::clone(window), Rc::clone(sink)),
                _ => return,
            }
        };

        let sample = MotionSample::new(window.screen_position(), now_ms);
        log::trace!("sampled {} at {now_ms}ms", sample.position);
        sink(sample);

        let mut state = shared.state.borrow_mut();
        if state.generation == generation && state.window.is_some() {
            Self::schedule_tick(shared, &mut state);
        }
    }
}

#[cfg(test)]
#[path = "tests/sampler_tests.rs"]
mod tests;
