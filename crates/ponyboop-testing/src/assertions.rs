//! Assertion helpers for pony tests.

use std::fmt::Debug;

use ponyboop_core::{DisplayState, InteractionStateMachine, InteractionTimer, TimerRuntime};

use crate::recorder::Recorder;

/// Assert that a recorder saw exactly `expected`, with timestamps.
pub fn assert_events<E>(recorder: &Recorder<E>, expected: &[(u64, E)], msg: &str)
where
    E: Clone + Debug + PartialEq + 'static,
{
    let actual = recorder.events();
    assert_eq!(actual.as_slice(), expected, "{}: recorded events differ", msg);
}

/// Assert that a recorder saw exactly `expected`, ignoring timestamps.
pub fn assert_values<E>(recorder: &Recorder<E>, expected: &[E], msg: &str)
where
    E: Clone + Debug + PartialEq + 'static,
{
    let actual = recorder.values();
    assert_eq!(actual.as_slice(), expected, "{}: recorded values differ", msg);
}

/// Assert the machine's display state.
pub fn assert_display_state(machine: &InteractionStateMachine, expected: DisplayState, msg: &str) {
    assert_eq!(
        machine.display_state(),
        expected,
        "{}: unexpected display state (boop count {}, pending {:?})",
        msg,
        machine.boop_count(),
        machine.pending_timers()
    );
}

/// Assert exactly which interaction timers are pending.
pub fn assert_pending_timers(
    machine: &InteractionStateMachine,
    expected: &[InteractionTimer],
    msg: &str,
) {
    let pending = machine.pending_timers();
    assert_eq!(pending.as_slice(), expected, "{}: pending timers differ", msg);
}

/// Assert that no timer of any kind is left in the runtime.
pub fn assert_runtime_idle(runtime: &TimerRuntime, msg: &str) {
    assert!(
        !runtime.has_pending(),
        "{}: {} timer(s) still pending, next due at {:?}",
        msg,
        runtime.pending_count(),
        runtime.next_due_ms()
    );
}
