//! Host windows that follow a script instead of a window manager.

use std::cell::RefCell;

use ponyboop_core::{HostWindow, Position, TimerRuntimeHandle};
use smallvec::SmallVec;

/// A window whose position is a step function of runtime time.
///
/// Keyframes are `(time_ms, position)` pairs. Reading the position returns
/// the latest keyframe at or before the runtime's current time.
pub struct ScriptedWindow {
    clock: TimerRuntimeHandle,
    keyframes: RefCell<Vec<(u64, Position)>>,
}

impl ScriptedWindow {
    /// Creates a window resting at `start` from time zero.
    pub fn new(clock: TimerRuntimeHandle, start: Position) -> Self {
        Self {
            clock,
            keyframes: RefCell::new(vec![(0, start)]),
        }
    }

    /// Adds a keyframe. Keyframes may be given in any order.
    pub fn then_at(self, time_ms: u64, position: Position) -> Self {
        self.insert(time_ms, position);
        self
    }

    /// Adds every keyframe of `path`.
    pub fn with_path(self, path: impl IntoIterator<Item = (u64, Position)>) -> Self {
        for (time_ms, position) in path {
            self.insert(time_ms, position);
        }
        self
    }

    /// Schedules a path from a shared handle.
    pub fn extend_path(&self, path: impl IntoIterator<Item = (u64, Position)>) {
        for (time_ms, position) in path {
            self.insert(time_ms, position);
        }
    }

    /// Moves the window now. Later keyframes are discarded, as if the user
    /// grabbed the window and overrode the script.
    pub fn set_position(&self, position: Position) {
        let now = self.clock.now_ms();
        let mut keyframes = self.keyframes.borrow_mut();
        keyframes.retain(|&(time_ms, _)| time_ms < now);
        keyframes.push((now, position));
    }

    pub fn position_at(&self, time_ms: u64) -> Position {
        let keyframes = self.keyframes.borrow();
        let index = keyframes.partition_point(|&(at, _)| at <= time_ms);
        // The time-zero keyframe always exists, so index is at least 1.
        keyframes[index.saturating_sub(1)].1
    }

    fn insert(&self, time_ms: u64, position: Position) {
        let mut keyframes = self.keyframes.borrow_mut();
        let index = keyframes.partition_point(|&(at, _)| at <= time_ms);
        if index > 0 && keyframes[index - 1].0 == time_ms {
            keyframes[index - 1].1 = position;
        } else {
            keyframes.insert(index, (time_ms, position));
        }
    }
}

impl HostWindow for ScriptedWindow {
    fn screen_position(&self) -> Position {
        self.position_at(self.clock.now_ms())
    }
}

/// A side-to-side shake around `origin`.
///
/// Produces keyframes every `step_ms` in `[start_ms, end_ms)` alternating
/// between `origin` shifted right by `amplitude` and `origin`, then a final
/// keyframe back at `origin` at `end_ms`.
pub fn oscillation(
    origin: Position,
    amplitude: i32,
    start_ms: u64,
    end_ms: u64,
    step_ms: u64,
) -> SmallVec<[(u64, Position); 16]> {
    let mut path = SmallVec::new();
    if step_ms == 0 {
        return path;
    }
    let mut time_ms = start_ms;
    let mut displaced = true;
    while time_ms < end_ms {
        let position = if displaced {
            origin.offset(amplitude, 0)
        } else {
            origin
        };
        path.push((time_ms, position));
        displaced = !displaced;
        time_ms += step_ms;
    }
    path.push((end_ms, origin));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use ponyboop_core::TimerRuntime;

    #[test]
    fn position_follows_keyframes() {
        let runtime = TimerRuntime::new();
        let window = ScriptedWindow::new(runtime.handle(), Position::new(0, 0))
            .then_at(500, Position::new(10, 0))
            .then_at(200, Position::new(5, 0));

        assert_eq!(window.screen_position(), Position::new(0, 0));
        runtime.advance_to(200);
        assert_eq!(window.screen_position(), Position::new(5, 0));
        runtime.advance_to(499);
        assert_eq!(window.screen_position(), Position::new(5, 0));
        runtime.advance_to(10_000);
        assert_eq!(window.screen_position(), Position::new(10, 0));
    }

    #[test]
    fn set_position_overrides_the_rest_of_the_script() {
        let runtime = TimerRuntime::new();
        let window = ScriptedWindow::new(runtime.handle(), Position::new(0, 0))
            .then_at(1000, Position::new(50, 50));
        runtime.advance_to(300);
        window.set_position(Position::new(7, 7));
        runtime.advance_to(2000);
        assert_eq!(window.screen_position(), Position::new(7, 7));
    }

    #[test]
    fn oscillation_alternates_and_settles() {
        let path = oscillation(Position::new(100, 0), 30, 0, 1000, 400);
        assert_eq!(
            path.as_slice(),
            &[
                (0, Position::new(130, 0)),
                (400, Position::new(100, 0)),
                (800, Position::new(130, 0)),
                (1000, Position::new(100, 0)),
            ]
        );
    }
}
