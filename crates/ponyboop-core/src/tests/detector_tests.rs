use std::cell::Cell;

use super::*;
use crate::runtime::TimerRuntime;

struct FakeWindow {
    position: Cell<Position>,
}

impl HostWindow for FakeWindow {
    fn screen_position(&self) -> Position {
        self.position.get()
    }
}

fn window_at(x: i32, y: i32) -> Rc<FakeWindow> {
    Rc::new(FakeWindow {
        position: Cell::new(Position::new(x, y)),
    })
}

fn record(detector: &ShakeDetector, runtime: &TimerRuntime) -> Rc<RefCell<Vec<(ShakeEvent, u64)>>> {
    let events: Rc<RefCell<Vec<(ShakeEvent, u64)>>> = Rc::default();
    let sink = Rc::clone(&events);
    let clock = runtime.handle();
    detector.add_listener(move |event| sink.borrow_mut().push((*event, clock.now_ms())));
    events
}

/// Moves the window 30px back and forth once per sampling interval.
fn shake_for(runtime: &TimerRuntime, window: &FakeWindow, ticks: u32) {
    for _ in 0..ticks {
        let Position { x, y } = window.position.get();
        let next_x = if x == 100 { 130 } else { 100 };
        window.position.set(Position::new(next_x, y));
        runtime.advance_by(400);
    }
}

#[test]
fn shaking_the_window_emits_start_then_end() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default());
    let events = record(&detector, &runtime);
    let window = window_at(100, 100);
    detector.attach(window.clone());

    shake_for(&runtime, &window, 4);
    assert_eq!(detector.phase(), ShakePhase::Shaking);
    runtime.advance_by(400);

    assert_eq!(
        *events.borrow(),
        vec![(ShakeEvent::Start, 1200), (ShakeEvent::End, 2000)]
    );
    assert_eq!(detector.phase(), ShakePhase::Idle);
}

#[test]
fn detach_during_a_shake_emits_a_closing_end() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default());
    let ends = Rc::new(Cell::new(0));
    {
        let ends = Rc::clone(&ends);
        detector.on_shake_end(move || ends.set(ends.get() + 1));
    }
    let window = window_at(100, 100);
    detector.attach(window.clone());
    shake_for(&runtime, &window, 3);
    assert_eq!(detector.phase(), ShakePhase::Shaking);

    detector.detach();
    detector.detach();
    shake_for(&runtime, &window, 5);

    assert_eq!(ends.get(), 1);
    assert!(!detector.is_attached());
    assert_eq!(runtime.pending_count(), 0);
}

#[test]
fn detach_before_attach_is_harmless() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default());
    let events = record(&detector, &runtime);
    detector.detach();
    assert!(events.borrow().is_empty());
}

#[test]
fn pushed_samples_are_ignored_while_detached() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default());
    let sample = MotionSample::new(Position::new(500, 500), 10);
    assert_eq!(detector.process_sample(sample), None);
    assert_eq!(detector.phase(), ShakePhase::Idle);
}

#[test]
fn pushed_samples_feed_the_classifier_while_attached() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default().with_min_duration_ms(100));
    detector.attach(window_at(0, 0));

    assert_eq!(detector.process_sample(MotionSample::new(Position::new(40, 0), 10)), None);
    assert_eq!(
        detector.process_sample(MotionSample::new(Position::new(0, 0), 200)),
        Some(ShakeEvent::Start)
    );
    assert_eq!(
        detector.process_sample(MotionSample::new(Position::new(0, 0), 300)),
        Some(ShakeEvent::End)
    );
}

#[test]
fn attaching_elsewhere_rebaselines() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default());
    let events = record(&detector, &runtime);
    detector.attach(window_at(0, 0));
    runtime.advance_by(400);

    // The jump to a different window is not movement.
    detector.attach(window_at(900, 900));
    runtime.advance_by(2000);

    assert!(events.borrow().is_empty());
    assert_eq!(detector.phase(), ShakePhase::Idle);
}

#[test]
fn removed_listeners_are_not_called() {
    let runtime = TimerRuntime::new();
    let detector = ShakeDetector::new(runtime.handle(), ShakeConfig::default().with_min_duration_ms(0));
    let starts = Rc::new(Cell::new(0));
    let id = {
        let starts = Rc::clone(&starts);
        detector.on_shake_start(move || starts.set(starts.get() + 1))
    };
    assert!(detector.remove_listener(id));

    detector.attach(window_at(0, 0));
    detector.process_sample(MotionSample::new(Position::new(50, 0), 1));
    detector.process_sample(MotionSample::new(Position::new(0, 0), 2));

    assert_eq!(starts.get(), 0);
}
