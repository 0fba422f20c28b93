//! Explicit listener registration.
//!
//! Each event source owns a [`Listeners`] list instead of publishing to a
//! shared bus, so every emission site is visible at the call that makes it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use smallvec::SmallVec;

pub type ListenerId = u64;

type Listener<E> = Rc<dyn Fn(&E) + 'static>;

pub struct Listeners<E> {
    entries: RefCell<Vec<(ListenerId, Listener<E>)>>,
    next_id: Cell<ListenerId>,
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn add(&self, listener: impl Fn(&E) + 'static) -> ListenerId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Removes a listener. Unknown ids are ignored.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Calls every listener registered at the moment of the call, in
    /// registration order. Listeners may add or remove listeners while the
    /// event is being delivered; changes apply to the next emission.
    pub fn emit(&self, event: &E) {
        let snapshot: SmallVec<[Listener<E>; 4]> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/listeners_tests.rs"]
mod tests;
