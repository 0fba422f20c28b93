//! Standard runtime services backed by Rust's `std` library.
//!
//! This crate provides concrete implementations of the platform
//! abstraction traits defined in `ponyboop-core`. Hosts construct a
//! [`StdRuntime`], hand its [`TimerRuntimeHandle`] to their ponies, and then
//! either call [`StdRuntime::pump`] from their own event loop or block in
//! [`StdRuntime::run_for`].
//!
//! The timer runtime only learns the time when it is pumped, and new timers
//! count from that time. Input arriving between pumps must go through
//! [`StdRuntime::deliver`] so its timers start from the current clock
//! reading.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use ponyboop_core::{Clock, TimerRuntime, TimerRuntimeHandle};
use web_time::Instant;

/// Longest single sleep in [`StdRuntime::run_for`], so a host that schedules
/// new work from outside a timer callback is noticed promptly.
const MAX_IDLE_SLEEP: Duration = Duration::from_millis(50);

/// Clock implementation backed by a monotonic [`Instant`].
///
/// Time is measured from the moment the clock was created.
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Returns the elapsed time as a [`Duration`] for convenience.
    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for StdClock {
    fn now_millis(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Drives a [`TimerRuntime`] against a real clock.
pub struct StdRuntime {
    clock: Rc<dyn Clock>,
    timers: TimerRuntime,
}

impl StdRuntime {
    /// Creates a runtime driven by a fresh [`StdClock`].
    pub fn new() -> Self {
        Self::with_clock(StdClock::new())
    }

    /// Creates a runtime driven by `clock`. The timer runtime starts at the
    /// clock's current reading.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let clock: Rc<dyn Clock> = Rc::new(clock);
        let timers = TimerRuntime::starting_at(clock.now_millis());
        Self { clock, timers }
    }

    /// Returns the underlying [`TimerRuntime`].
    pub fn timer_runtime(&self) -> TimerRuntime {
        self.timers.clone()
    }

    /// Returns a handle to the timer runtime.
    pub fn handle(&self) -> TimerRuntimeHandle {
        self.timers.handle()
    }

    /// Returns the clock implementation.
    pub fn clock(&self) -> Rc<dyn Clock> {
        Rc::clone(&self.clock)
    }

    /// Fires every timer that is due according to the clock. Returns the
    /// number of timers fired.
    pub fn pump(&self) -> usize {
        let now = self.clock.now_millis();
        let fired = self.timers.advance_to(now);
        if fired > 0 {
            log::trace!("pumped {fired} timer(s) at {now}ms");
        }
        fired
    }

    /// Brings the runtime up to the clock, then runs `input`.
    ///
    /// Timers due before now fire first, and timers scheduled by `input`
    /// count from the current clock reading.
    pub fn deliver<R>(&self, input: impl FnOnce() -> R) -> R {
        self.pump();
        input()
    }

    /// Time until the next pending timer is due, or `None` when nothing is
    /// pending. Zero when a timer is already overdue.
    pub fn time_until_next(&self) -> Option<Duration> {
        let due = self.timers.next_due_ms()?;
        let now = self.clock.now_millis();
        Some(Duration::from_millis(due.saturating_sub(now)))
    }

    /// Pumps timers in real time until `duration` has elapsed on the clock,
    /// sleeping the thread between due times. Returns the number of timers
    /// fired.
    pub fn run_for(&self, duration: Duration) -> usize {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let deadline = self.clock.now_millis().saturating_add(duration_ms);
        let mut fired = 0;
        loop {
            fired += self.pump();
            let now = self.clock.now_millis();
            if now >= deadline {
                break;
            }
            let remaining = Duration::from_millis(deadline - now);
            let sleep = self
                .time_until_next()
                .unwrap_or(remaining)
                .min(remaining)
                .min(MAX_IDLE_SLEEP);
            if !sleep.is_zero() {
                std::thread::sleep(sleep);
            }
        }
        log::debug!("ran for {duration_ms}ms, fired {fired} timer(s)");
        fired
    }
}

impl fmt::Debug for StdRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StdRuntime")
            .field("now_ms", &self.clock.now_millis())
            .field("timers", &self.timers)
            .finish()
    }
}

impl Default for StdRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/std_runtime_tests.rs"]
mod tests;
