//! Timestamped capture of listener events.

use std::cell::RefCell;
use std::rc::Rc;

use ponyboop_core::TimerRuntimeHandle;

/// Collects events together with the runtime time they were delivered at.
///
/// Clones share the same log.
pub struct Recorder<E> {
    clock: TimerRuntimeHandle,
    events: Rc<RefCell<Vec<(u64, E)>>>,
}

impl<E> Clone for Recorder<E> {
    fn clone(&self) -> Self {
        Self {
            clock: self.clock.clone(),
            events: Rc::clone(&self.events),
        }
    }
}

impl<E: Clone + 'static> Recorder<E> {
    pub fn new(clock: TimerRuntimeHandle) -> Self {
        Self {
            clock,
            events: Rc::default(),
        }
    }

    /// A listener closure that appends to this recorder.
    pub fn listener(&self) -> impl Fn(&E) + 'static {
        let recorder = self.clone();
        move |event| recorder.record(event.clone())
    }

    pub fn record(&self, event: E) {
        let now = self.clock.now_ms();
        self.events.borrow_mut().push((now, event));
    }

    pub fn events(&self) -> Vec<(u64, E)> {
        self.events.borrow().clone()
    }

    pub fn values(&self) -> Vec<E> {
        self.events
            .borrow()
            .iter()
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn last(&self) -> Option<E> {
        self.events.borrow().last().map(|(_, event)| event.clone())
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}
