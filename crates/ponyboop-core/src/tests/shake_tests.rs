use super::*;

fn classifier() -> ShakeClassifier {
    ShakeClassifier::new(&ShakeConfig::default(), Position::new(100, 100))
}

fn at(x: i32, y: i32, timestamp_ms: u64) -> MotionSample {
    MotionSample::new(Position::new(x, y), timestamp_ms)
}

#[test]
fn small_movements_never_start_a_shake() {
    let mut classifier = classifier();
    for step in 1..=20u64 {
        let x = if step % 2 == 0 { 100 } else { 110 };
        assert_eq!(classifier.sample(&at(x, 100, step * 400)), None);
        assert_eq!(classifier.phase(), ShakePhase::Idle);
    }
}

#[test]
fn third_moving_sample_starts_the_shake() {
    let mut classifier = classifier();

    assert_eq!(classifier.sample(&at(130, 100, 400)), None);
    assert_eq!(classifier.phase(), ShakePhase::Moving);
    assert_eq!(classifier.moving_since(), Some(400));

    // 400ms of movement does not exceed the 500ms minimum yet.
    assert_eq!(classifier.sample(&at(100, 100, 800)), None);
    assert_eq!(classifier.phase(), ShakePhase::Moving);

    assert_eq!(classifier.sample(&at(130, 100, 1200)), Some(ShakeEvent::Start));
    assert_eq!(classifier.phase(), ShakePhase::Shaking);
    assert_eq!(classifier.moving_since(), Some(400));
    assert_eq!(classifier.shaking_since(), Some(1200));
}

#[test]
fn shake_starts_exactly_once_and_ends_on_a_still_sample() {
    let mut classifier = classifier();
    let mut events = Vec::new();
    let path = [130, 100, 130, 100, 130, 100, 100];
    for (index, x) in path.into_iter().enumerate() {
        let timestamp = (index as u64 + 1) * 400;
        if let Some(event) = classifier.sample(&at(x, 100, timestamp)) {
            events.push((event, timestamp));
        }
    }
    assert_eq!(
        events,
        vec![(ShakeEvent::Start, 1200), (ShakeEvent::End, 2800)]
    );
    assert_eq!(classifier.phase(), ShakePhase::Idle);
    assert_eq!(classifier.moving_since(), None);
}

#[test]
fn unconfirmed_movement_settles_without_events() {
    let mut classifier = classifier();
    assert_eq!(classifier.sample(&at(150, 100, 400)), None);
    assert_eq!(classifier.sample(&at(150, 100, 800)), None);
    assert_eq!(classifier.phase(), ShakePhase::Idle);
    assert_eq!(classifier.moving_since(), None);
}

#[test]
fn movement_is_measured_per_axis() {
    let mut classifier = classifier();
    // A diagonal step of (8, 8) is about 11px in Euclidean terms but stays
    // under the 10px threshold per axis.
    assert_eq!(classifier.sample(&at(108, 108, 400)), None);
    assert_eq!(classifier.phase(), ShakePhase::Idle);

    assert_eq!(classifier.sample(&at(108, 119, 800)), None);
    assert_eq!(classifier.phase(), ShakePhase::Moving);
}

#[test]
fn threshold_is_exclusive() {
    let mut classifier = classifier();
    assert_eq!(classifier.sample(&at(110, 100, 400)), None);
    assert_eq!(classifier.phase(), ShakePhase::Idle);
}

#[test]
fn finish_closes_only_an_open_shake() {
    let mut classifier = classifier();
    assert_eq!(classifier.finish(), None);

    classifier.sample(&at(130, 100, 400));
    assert_eq!(classifier.finish(), None);
    assert_eq!(classifier.phase(), ShakePhase::Idle);

    // The last position survives finish, so the next sample compares with 130.
    assert_eq!(classifier.sample(&at(100, 100, 800)), None);
    assert_eq!(classifier.moving_since(), Some(800));
}

#[test]
fn finish_ends_a_confirmed_shake() {
    let mut classifier = classifier();
    classifier.sample(&at(130, 100, 400));
    classifier.sample(&at(100, 100, 800));
    assert_eq!(classifier.sample(&at(130, 100, 1200)), Some(ShakeEvent::Start));
    assert_eq!(classifier.finish(), Some(ShakeEvent::End));
    assert_eq!(classifier.finish(), None);
    assert!(!classifier.phase().is_moving());
}

#[test]
fn rebase_moves_the_comparison_point() {
    let mut classifier = classifier();
    classifier.reset_baseline(Position::new(500, 500));
    assert_eq!(classifier.sample(&at(505, 500, 400)), None);
    assert_eq!(classifier.phase(), ShakePhase::Idle);
    assert_eq!(classifier.last_position(), Position::new(505, 500));
}
