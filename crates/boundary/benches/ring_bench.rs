//! Criterion benchmarks for the interactive hot paths.
//! Focus sizes: n in {8, 32, 128, 512} vertices.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p boundary

use boundary::geodesic::destination;
use boundary::rand::{draw_ring_radial, RadialCfg, ReplayToken, VertexCount};
use boundary::session::{Session, SessionCfg};
use boundary::simplify::simplify;
use boundary::validate::{validate, ValidationThresholds};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn ring(n: usize, seed: u64) -> Vec<boundary::Coord> {
    let cfg = RadialCfg {
        vertex_count: VertexCount::Fixed(n),
        angle_jitter_frac: 0.2,
        radius_m: 5.0 * n as f64,
        ..Default::default()
    };
    draw_ring_radial(cfg, ReplayToken { seed, index: 0 })
}

fn bench_ring(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring");
    let thresholds = ValidationThresholds::default();
    for &n in &[8usize, 32, 128, 512] {
        group.bench_with_input(BenchmarkId::new("validate", n), &n, |b, &n| {
            let r = ring(n, 41);
            b.iter(|| validate(&r, &thresholds))
        });

        group.bench_with_input(BenchmarkId::new("simplify_1m", n), &n, |b, &n| {
            let r = ring(n, 42);
            b.iter(|| simplify(&r, 1.0))
        });

        // One drag frame: speculative intersection check + revalidation.
        group.bench_with_input(BenchmarkId::new("drag_frame", n), &n, |b, &n| {
            b.iter_batched(
                || Session::new(&ring(n, 43), SessionCfg::default()),
                |mut s| {
                    let p = destination(s.ring()[0], 0.5, 45.0);
                    let out = s.update_vertex_transient(0, p);
                    let _ = out.map(|o| o.validation.valid);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ring);
criterion_main!(benches);
