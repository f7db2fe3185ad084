//! Benchmarks for the rain tick path.
//!
//! Measures one tick (fade fill plus one glyph per column) on a cell
//! surface, and the tick plus diff/present for a full frame.
//!
//! Run with: cargo bench -p rainfall-runtime --bench rain_bench

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rainfall_render::buffer::Buffer;
use rainfall_render::diff::BufferDiff;
use rainfall_render::presenter::Presenter;
use rainfall_render::surface::{CellSurface, Surface};
use rainfall_runtime::{RainConfig, RainState};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::hint::black_box;

const FONT: u16 = 14;

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("rain/tick");
    let cfg = RainConfig::default();

    for (w, h) in [(80u16, 24u16), (120, 40), (200, 60)] {
        group.throughput(Throughput::Elements(w as u64 * h as u64));
        let mut surface = CellSurface::for_terminal(w, h, FONT);
        let mut state = RainState::new(surface.size().width, FONT);
        let mut rng = StdRng::seed_from_u64(1);

        group.bench_with_input(BenchmarkId::new("step", format!("{w}x{h}")), &(), |b, _| {
            b.iter(|| black_box(state.step(&mut surface, &mut rng, &cfg)))
        });
    }
    group.finish();
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("rain/frame");
    let cfg = RainConfig::default();

    for (w, h) in [(80u16, 24u16), (200, 60)] {
        let mut surface = CellSurface::for_terminal(w, h, FONT);
        let mut state = RainState::new(surface.size().width, FONT);
        let mut rng = StdRng::seed_from_u64(2);
        let mut presenter = Presenter::new(std::io::sink(), cfg.backdrop);
        let mut prev = Buffer::new(w, h);

        group.bench_with_input(
            BenchmarkId::new("step_diff_present", format!("{w}x{h}")),
            &(),
            |b, _| {
                b.iter(|| {
                    state.step(&mut surface, &mut rng, &cfg);
                    let next = surface.buffer();
                    let diff = BufferDiff::compute(&prev, next);
                    presenter.present(next, &diff).unwrap();
                    prev.clone_from(next);
                    black_box(diff.len())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_tick, bench_frame);
criterion_main!(benches);
