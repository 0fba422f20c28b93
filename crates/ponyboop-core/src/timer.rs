use crate::runtime::{TimerId, TimerRuntimeHandle};

/// Owned handle to a pending timer. Dropping it cancels the timer.
pub struct TimerRegistration {
    runtime: TimerRuntimeHandle,
    id: Option<TimerId>,
}

impl TimerRegistration {
    pub(crate) fn new(runtime: TimerRuntimeHandle, id: TimerId) -> Self {
        Self {
            runtime,
            id: Some(id),
        }
    }

    pub(crate) fn inactive(runtime: TimerRuntimeHandle) -> Self {
        Self { runtime, id: None }
    }

    pub fn id(&self) -> Option<TimerId> {
        self.id
    }

    pub fn cancel(mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel(id);
        }
    }

    /// Forgets a timer that has already fired, so dropping the registration
    /// does not try to cancel it.
    fn disarm(&mut self) {
        self.id = None;
    }
}

impl Drop for TimerRegistration {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.runtime.cancel(id);
        }
    }
}

/// Holds at most one pending timer.
///
/// Scheduling into an occupied slot cancels the previous timer first, so a
/// superseded callback can never fire.
#[derive(Default)]
pub struct TimerSlot {
    registration: Option<TimerRegistration>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(
        &mut self,
        runtime: &TimerRuntimeHandle,
        delay_ms: u64,
        callback: impl FnOnce(u64) + 'static,
    ) {
        self.cancel();
        self.registration = Some(runtime.register(delay_ms, callback));
    }

    /// Cancels the pending timer, if any. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        match self.registration.take() {
            Some(registration) => {
                let was_pending = registration.id().is_some();
                registration.cancel();
                was_pending
            }
            None => false,
        }
    }

    /// Clears the slot from inside the slot's own callback.
    pub fn mark_fired(&mut self) {
        if let Some(mut registration) = self.registration.take() {
            registration.disarm();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.registration
            .as_ref()
            .is_some_and(|registration| registration.id().is_some())
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
