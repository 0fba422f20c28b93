use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ponyboop_core::{
    InteractionConfig, InteractionStateMachine, MotionSample, Position, ShakeClassifier,
    ShakeConfig, TimerRuntime,
};

const SAMPLE_COUNTS: &[usize] = &[64, 1024];
const CHECK_INTERVAL_MS: u64 = 400;

/// Alternates between shaking bursts and still stretches so every phase
/// transition is exercised.
fn motion_trace(samples: usize) -> Vec<MotionSample> {
    (0..samples)
        .map(|index| {
            let burst = (index / 8) % 2 == 0;
            let x = if burst && index % 2 == 0 { 40 } else { 0 };
            MotionSample::new(Position::new(x, 0), (index as u64 + 1) * CHECK_INTERVAL_MS)
        })
        .collect()
}

fn bench_classifier(c: &mut Criterion) {
    let config = ShakeConfig::default();
    let mut group = c.benchmark_group("shake_classifier");
    for &samples in SAMPLE_COUNTS {
        let trace = motion_trace(samples);
        group.bench_with_input(BenchmarkId::new("samples", samples), &trace, |b, trace| {
            b.iter(|| {
                let mut classifier = ShakeClassifier::new(&config, Position::default());
                let mut events = 0usize;
                for sample in trace {
                    if classifier.sample(black_box(sample)).is_some() {
                        events += 1;
                    }
                }
                events
            });
        });
    }
    group.finish();
}

fn bench_boop_burst(c: &mut Criterion) {
    c.bench_function("interaction_boop_burst", |b| {
        b.iter(|| {
            let runtime = TimerRuntime::new();
            let machine = InteractionStateMachine::new(runtime.handle(), InteractionConfig::default());
            for _ in 0..24 {
                machine.on_boop();
                runtime.advance_by(50);
            }
            runtime.advance_by(1000);
            black_box(machine.display_state())
        });
    });
}

criterion_group!(benches, bench_classifier, bench_boop_burst);
criterion_main!(benches);
