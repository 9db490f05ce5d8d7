//! Benchmarks for offset updates through the coordinator.

use controls_core::{
    ControlsCoordinator, ControlsDimensions, ControlsOffsets, OffsetManager, VisibilityScheduler,
};
use controls_types::{ControlsConfig, ControlsPosition};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// A scroll from fully shown to fully hidden and back, one pixel per step.
fn scroll_cycle(height: i32) -> Vec<ControlsOffsets> {
    (0..=height)
        .chain((0..height).rev())
        .map(|hidden| ControlsOffsets::new(-hidden, 0, height - hidden, 0, 0))
        .collect()
}

fn bench_apply_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("offsets_apply");

    for height in [56, 112, 560] {
        let cycle = scroll_cycle(height);
        let visibility = VisibilityScheduler::new(true);
        let label = format!("{height}");

        group.bench_function(BenchmarkId::new("scroll_cycle", &label), |b| {
            b.iter_batched(
                || {
                    let mut manager = OffsetManager::new(ControlsPosition::Top);
                    manager.initialize(ControlsDimensions::new(height, 0, 0, 0));
                    manager
                },
                |mut manager| {
                    for offsets in &cycle {
                        let _ = manager.apply_offsets(*offsets, &visibility);
                    }
                    manager
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_redundant_updates(c: &mut Criterion) {
    let mut manager = OffsetManager::new(ControlsPosition::Top);
    manager.initialize(ControlsDimensions::new(56, 0, 0, 0));
    let visibility = VisibilityScheduler::new(true);
    let hidden = ControlsOffsets::new(-56, 0, 0, 0, 0);
    let _ = manager.apply_offsets(hidden, &visibility);

    c.bench_function("offsets_redundant", |b| {
        b.iter(|| manager.apply_offsets(hidden, &visibility));
    });
}

fn bench_coordinator_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("coordinator_frames");

    for frames in [60, 600] {
        let label = format!("{frames}");

        group.bench_function(BenchmarkId::new("show_animation", &label), |b| {
            b.iter_batched(
                || {
                    let mut coordinator = ControlsCoordinator::new(ControlsConfig::default());
                    coordinator.apply_offsets(ControlsOffsets::new(-56, 0, 0, 0, 0));
                    coordinator
                },
                |mut coordinator| {
                    for _ in 0..frames {
                        if !coordinator.is_animating() {
                            coordinator.apply_offsets(ControlsOffsets::new(-56, 0, 0, 0, 0));
                            coordinator.show_android_controls(true);
                        }
                        coordinator.on_animation_frame(16);
                    }
                    coordinator
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_apply_offsets,
    bench_redundant_updates,
    bench_coordinator_frames
);
criterion_main!(benches);
