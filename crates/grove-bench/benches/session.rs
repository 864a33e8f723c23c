use criterion::{Criterion, criterion_group, criterion_main};
use grove_bench::synthetic_snapshot;
use grove_canvas::CanvasSession;
use grove_core::{CanvasSettings, NodeId};
use grove_events::InMemoryBoundary;
use grove_graph::Vec2;
use std::hint::black_box;
use std::time::Duration;

fn bench_hover_sweep(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(300, 4, 6);
    let ids: Vec<NodeId> = (0..300).map(|i| NodeId::new(format!("t{i}"))).collect();

    c.bench_function("hover_sweep_300", |b| {
        b.iter(|| {
            let (boundary, events) = InMemoryBoundary::channel();
            let mut session = CanvasSession::new(
                CanvasSettings::default(),
                Vec2::new(1600.0, 1000.0),
                Box::new(boundary),
            );
            session.load_snapshot(&snapshot, Duration::ZERO);
            for (step, id) in ids.iter().enumerate() {
                let now = Duration::from_millis(step as u64 * 16);
                session.hover_enter(id, Vec2::new(400.0, 300.0), now);
                session.frame(now);
                session.hover_leave(now);
            }
            black_box((session.unseen_count(), events.len()))
        })
    });
}

fn bench_frame_loop(c: &mut Criterion) {
    let snapshot = synthetic_snapshot(200, 4, 6);
    c.bench_function("frame_loop_200", |b| {
        b.iter(|| {
            let (boundary, _events) = InMemoryBoundary::channel();
            let mut session = CanvasSession::new(
                CanvasSettings::default(),
                Vec2::new(1600.0, 1000.0),
                Box::new(boundary),
            );
            session.load_snapshot(&snapshot, Duration::ZERO);
            let mut frames = 0u64;
            while frames < 600 && session.frame(Duration::from_millis(frames * 16)) {
                frames += 1;
            }
            black_box(frames)
        })
    });
}

criterion_group!(benches, bench_hover_sweep, bench_frame_loop);
criterion_main!(benches);
