//! Platform abstraction traits for the pony runtime.
//!
//! These traits let the core read time and window geometry from the host
//! without depending on a particular windowing toolkit or on `std::time`.

use std::rc::Rc;

use crate::geometry::Position;

/// Provides monotonic time for the runtime.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary, fixed origin. Never decreases.
    fn now_millis(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now_millis(&self) -> u64 {
        (**self).now_millis()
    }
}

/// The window hosting a pony.
///
/// Implementations return a read-only snapshot of the window's outer
/// position in screen coordinates at the moment of the call.
pub trait HostWindow {
    fn screen_position(&self) -> Position;
}

impl<W: HostWindow + ?Sized> HostWindow for Rc<W> {
    fn screen_position(&self) -> Position {
        (**self).screen_position()
    }
}
