//! Single-threaded cooperative timer runtime.
//!
//! The runtime never reads a clock on its own. The host advances it with
//! [`TimerRuntime::advance_to`], and every timer due at or before the new time
//! fires in non-decreasing due order (FIFO among timers due at the same
//! instant). No runtime borrow is held while a callback runs, so callbacks may
//! freely schedule and cancel timers.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::collections::map::HashMap;
use crate::timer::TimerRegistration;

pub type TimerId = u64;

type TimerCallback = Box<dyn FnOnce(u64) + 'static>;

struct RuntimeInner {
    now_ms: Cell<u64>,
    timers: RefCell<BTreeMap<(u64, TimerId), TimerCallback>>,
    due_by_id: RefCell<HashMap<TimerId, u64>>,
    next_timer_id: Cell<TimerId>,
}

impl RuntimeInner {
    fn new(now_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
            timers: RefCell::new(BTreeMap::new()),
            due_by_id: RefCell::new(HashMap::default()),
            next_timer_id: Cell::new(1),
        }
    }

    fn schedule(&self, delay_ms: u64, callback: TimerCallback) -> TimerId {
        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        let due = self.now_ms.get().saturating_add(delay_ms);
        self.timers.borrow_mut().insert((due, id), callback);
        self.due_by_id.borrow_mut().insert(id, due);
        log::trace!("timer {id} scheduled for {due}ms");
        id
    }

    fn cancel(&self, id: TimerId) -> bool {
        let Some(due) = self.due_by_id.borrow_mut().remove(&id) else {
            return false;
        };
        self.timers.borrow_mut().remove(&(due, id));
        log::trace!("timer {id} cancelled");
        true
    }

    fn pop_due(&self, deadline: u64) -> Option<(u64, TimerId, TimerCallback)> {
        let mut timers = self.timers.borrow_mut();
        let (&(due, _), _) = timers.first_key_value()?;
        if due > deadline {
            return None;
        }
        let ((due, id), callback) = timers.pop_first()?;
        drop(timers);
        self.due_by_id.borrow_mut().remove(&id);
        Some((due, id, callback))
    }

    fn advance_to(&self, now_ms: u64) -> usize {
        let target = now_ms.max(self.now_ms.get());
        let mut fired = 0;
        while let Some((due, id, callback)) = self.pop_due(target) {
            // Timers scheduled in the past (delay 0 during a callback) must not
            // drag the clock backwards.
            self.now_ms.set(due.max(self.now_ms.get()));
            log::trace!("timer {id} firing at {due}ms");
            callback(self.now_ms.get());
            fired += 1;
        }
        self.now_ms.set(target);
        fired
    }

    fn next_due_ms(&self) -> Option<u64> {
        self.timers
            .borrow()
            .first_key_value()
            .map(|(&(due, _), _)| due)
    }

    fn pending_count(&self) -> usize {
        self.timers.borrow().len()
    }
}

/// Owner of all pending timers for one control loop.
#[derive(Clone)]
pub struct TimerRuntime {
    inner: Rc<RuntimeInner>,
}

impl TimerRuntime {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a runtime whose clock starts at `now_ms`.
    pub fn starting_at(now_ms: u64) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(now_ms)),
        }
    }

    pub fn handle(&self) -> TimerRuntimeHandle {
        TimerRuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Current runtime time in monotonic milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.inner.now_ms.get()
    }

    /// Schedules `callback` to run `delay_ms` after the current runtime time.
    /// The callback receives the time at which it fires.
    pub fn schedule(&self, delay_ms: u64, callback: impl FnOnce(u64) + 'static) -> TimerId {
        self.inner.schedule(delay_ms, Box::new(callback))
    }

    /// Cancels a pending timer. Returns `false` when the timer already fired
    /// or was never scheduled.
    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner.cancel(id)
    }

    /// Moves the runtime clock forward to `now_ms`, firing every timer due on
    /// the way. Returns the number of callbacks that ran. Time never moves
    /// backwards; an earlier `now_ms` only fires timers that are already due.
    pub fn advance_to(&self, now_ms: u64) -> usize {
        self.inner.advance_to(now_ms)
    }

    pub fn advance_by(&self, delta_ms: u64) -> usize {
        self.advance_to(self.now_ms().saturating_add(delta_ms))
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.inner.next_due_ms()
    }

    pub fn pending_count(&self) -> usize {
        self.inner.pending_count()
    }

    pub fn has_pending(&self) -> bool {
        self.pending_count() > 0
    }
}

impl Default for TimerRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TimerRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRuntime")
            .field("now_ms", &self.now_ms())
            .field("pending", &self.pending_count())
            .finish()
    }
}

/// Weak handle to a [`TimerRuntime`].
///
/// Components hold handles rather than the runtime itself. Once the runtime
/// is dropped every operation becomes a no-op.
#[derive(Clone)]
pub struct TimerRuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl TimerRuntimeHandle {
    /// A handle that is not connected to any runtime.
    pub fn detached() -> Self {
        Self { inner: Weak::new() }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Runtime time, or `0` when the runtime is gone.
    pub fn now_ms(&self) -> u64 {
        self.inner
            .upgrade()
            .map(|inner| inner.now_ms.get())
            .unwrap_or_default()
    }

    pub fn schedule(
        &self,
        delay_ms: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<TimerId> {
        self.inner
            .upgrade()
            .map(|inner| inner.schedule(delay_ms, Box::new(callback)))
    }

    pub fn cancel(&self, id: TimerId) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.cancel(id))
            .unwrap_or(false)
    }

    /// Schedules a timer whose lifetime is tied to the returned registration.
    pub fn register(
        &self,
        delay_ms: u64,
        callback: impl FnOnce(u64) + 'static,
    ) -> TimerRegistration {
        match self.schedule(delay_ms, callback) {
            Some(id) => TimerRegistration::new(self.clone(), id),
            None => TimerRegistration::inactive(self.clone()),
        }
    }

    pub fn upgrade(&self) -> Option<TimerRuntime> {
        self.inner.upgrade().map(|inner| TimerRuntime { inner })
    }
}

impl fmt::Debug for TimerRuntimeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerRuntimeHandle")
            .field("alive", &self.is_alive())
            .finish()
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
