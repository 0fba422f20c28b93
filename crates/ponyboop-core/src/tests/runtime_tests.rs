use super::*;
use std::cell::RefCell;
use std::rc::Rc;

fn log_sink() -> Rc<RefCell<Vec<(&'static str, u64)>>> {
    Rc::new(RefCell::new(Vec::new()))
}

#[test]
fn timers_fire_in_due_order_with_fifo_ties() {
    let runtime = TimerRuntime::new();
    let log = log_sink();

    for (label, delay) in [("late", 300), ("first-tie", 100), ("second-tie", 100), ("middle", 200)] {
        let log = Rc::clone(&log);
        runtime.schedule(delay, move |now| log.borrow_mut().push((label, now)));
    }

    assert_eq!(runtime.advance_to(1_000), 4);
    assert_eq!(
        log.borrow().as_slice(),
        &[("first-tie", 100), ("second-tie", 100), ("middle", 200), ("late", 300)]
    );
    assert_eq!(runtime.now_ms(), 1_000);
    assert!(!runtime.has_pending());
}

#[test]
fn advance_only_fires_timers_that_are_due() {
    let runtime = TimerRuntime::new();
    let log = log_sink();
    {
        let log = Rc::clone(&log);
        runtime.schedule(500, move |now| log.borrow_mut().push(("due", now)));
    }

    assert_eq!(runtime.advance_to(499), 0);
    assert_eq!(runtime.next_due_ms(), Some(500));
    assert_eq!(runtime.advance_by(1), 1);
    assert_eq!(log.borrow().as_slice(), &[("due", 500)]);
}

#[test]
fn cancelled_timer_never_fires() {
    let runtime = TimerRuntime::new();
    let log = log_sink();
    let id = {
        let log = Rc::clone(&log);
        runtime.schedule(100, move |now| log.borrow_mut().push(("cancelled", now)))
    };

    assert!(runtime.cancel(id));
    assert!(!runtime.cancel(id), "second cancel is a no-op");
    runtime.advance_to(1_000);
    assert!(log.borrow().is_empty());
}

#[test]
fn cancelling_a_fired_timer_is_a_noop() {
    let runtime = TimerRuntime::new();
    let id = runtime.schedule(10, |_| {});
    runtime.advance_to(10);
    assert!(!runtime.cancel(id));
}

#[test]
fn callbacks_can_schedule_follow_up_timers_within_one_advance() {
    let runtime = TimerRuntime::new();
    let log = log_sink();
    {
        let log = Rc::clone(&log);
        let handle = runtime.handle();
        runtime.schedule(100, move |now| {
            log.borrow_mut().push(("outer", now));
            let log = Rc::clone(&log);
            handle.schedule(50, move |now| log.borrow_mut().push(("inner", now)));
        });
    }

    assert_eq!(runtime.advance_to(200), 2);
    assert_eq!(log.borrow().as_slice(), &[("outer", 100), ("inner", 150)]);
}

#[test]
fn callback_scheduled_past_the_deadline_stays_pending() {
    let runtime = TimerRuntime::new();
    let handle = runtime.handle();
    runtime.schedule(100, move |_| {
        handle.schedule(400, |_| {});
    });

    runtime.advance_to(300);
    assert_eq!(runtime.next_due_ms(), Some(500));
}

#[test]
fn runtime_clock_never_moves_backwards() {
    let runtime = TimerRuntime::starting_at(1_000);
    runtime.advance_to(200);
    assert_eq!(runtime.now_ms(), 1_000);

    let fired = Rc::new(RefCell::new(None));
    {
        let fired = Rc::clone(&fired);
        runtime.schedule(0, move |now| *fired.borrow_mut() = Some(now));
    }
    runtime.advance_to(0);
    assert_eq!(*fired.borrow(), Some(1_000));
}

#[test]
fn handle_is_inert_after_runtime_drop() {
    let runtime = TimerRuntime::new();
    let handle = runtime.handle();
    assert!(handle.is_alive());
    drop(runtime);

    assert!(!handle.is_alive());
    assert_eq!(handle.schedule(10, |_| {}), None);
    assert!(!handle.cancel(1));
    assert_eq!(handle.now_ms(), 0);
    assert!(handle.upgrade().is_none());
}

#[test]
fn detached_handle_registers_inactive_timers() {
    let registration = TimerRuntimeHandle::detached().register(10, |_| {});
    assert_eq!(registration.id(), None);
}
