// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
#![allow(missing_docs)]
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};
use fieldgrid_benches::{scattered_grid, XorShift, WORLD};
use fieldgrid_core::{Checker, GridError, Overlap, OverlapRecorder, ScanConfig, ScanWorker, Vec3};
use std::{hint::black_box, time::Duration};
use tracing_subscriber::filter::LevelFilter;

const SIZES: [usize; 3] = [100, 1_000, 5_000];

fn quiet_logs() {
    // Rebinding logs at debug; keep the bench output clean.
    let _ = tracing_subscriber::fmt().with_max_level(LevelFilter::WARN).try_init();
}

fn bench_movement(c: &mut Criterion) {
    quiet_logs();
    let mut group = c.benchmark_group("grid_movement");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    for (label, step) in [("jitter", 0.25_f32), ("stride", 8.0)] {
        for &n in &SIZES {
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::new(label, n), &n, |b, &n| {
                b.iter_batched(
                    || scattered_grid(n, 7).expect("scene"),
                    |(mut grid, ids)| {
                        let mut rng = XorShift::new(11);
                        for id in &ids {
                            let Some(obj) = grid.object(*id) else {
                                continue;
                            };
                            let c = obj.center();
                            let to = Vec3::planar(
                                (c.x() + rng.range(-step, step)).clamp(0.0, WORLD),
                                (c.y() + rng.range(-step, step)).clamp(0.0, WORLD),
                            );
                            match grid.update(*id, to) {
                                Ok(()) | Err(GridError::OutOfGrid(_)) => {}
                                Err(e) => panic!("update failed: {e}"),
                            }
                        }
                        black_box(grid.stats());
                        black_box(grid);
                    },
                    BatchSize::LargeInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_scan(c: &mut Criterion) {
    quiet_logs();
    let mut group = c.benchmark_group("scan_pass");
    group.sample_size(50);
    group.warm_up_time(Duration::from_secs(2));
    group.measurement_time(Duration::from_secs(5));
    for &n in &SIZES {
        let (mut grid, _) = scattered_grid(n, 3).expect("scene");
        let config = ScanConfig {
            measure_performance: true,
        };
        let mut checker = Checker::with_config(OverlapRecorder::new(), &config);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                checker.scan(&mut grid);
                black_box(checker.handler_mut().drain());
            });
        });
    }
    group.finish();
}

fn bench_worker_round_trip(c: &mut Criterion) {
    quiet_logs();
    let mut group = c.benchmark_group("worker_round_trip");
    group.sample_size(30);
    for &n in &SIZES {
        let (grid, _) = scattered_grid(n, 5).expect("scene");
        let handler = |o: &Overlap<'_, usize>| {
            black_box((o.first.id(), o.second.id()));
        };
        let worker = ScanWorker::spawn(Checker::new(handler)).expect("spawn");
        let mut slot = Some(grid);
        group.bench_function(BenchmarkId::from_parameter(n), |b| {
            b.iter(|| {
                let grid = slot.take().expect("grid in hand");
                worker.submit(grid).map_err(|r| r.reason).expect("submit");
                slot = Some(worker.reclaim().expect("reclaim"));
            });
        });
        let (checker, _) = worker.stop().expect("stop");
        black_box(checker.stats());
    }
    group.finish();
}

criterion_group!(benches, bench_movement, bench_scan, bench_worker_round_trip);
criterion_main!(benches);
