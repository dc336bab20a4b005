//! Performance benchmarks for graphics config selection
//!
//! Run with: cargo bench -p kestrel_platform

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use kestrel_engine::{GraphicsConfigCandidate, RenderableType};
use kestrel_platform::select;

/// Build a candidate list shaped like real hardware enumeration output:
/// many overlapping configs with varying depth/stencil/sample attributes.
fn hardware_like_candidates(count: usize) -> Vec<GraphicsConfigCandidate> {
    let colors = [(5, 6, 5, 0), (8, 8, 8, 0), (8, 8, 8, 8), (4, 4, 4, 4)];
    let depths = [0, 16, 24];
    let stencils = [0, 8];
    let samples = [0, 2, 4];

    let mut candidates = Vec::with_capacity(count);
    let mut i = 0;
    'outer: for &(r, g, b, a) in &colors {
        for &depth in &depths {
            for &stencil in &stencils {
                for &sample in &samples {
                    let mut c = GraphicsConfigCandidate::es2(r, g, b, a, depth, stencil);
                    c.samples = sample;
                    candidates.push(c);
                    i += 1;
                    if i >= count {
                        break 'outer;
                    }
                }
            }
        }
    }
    candidates
}

fn benchmark_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("config_select");

    for count in [8, 32, 64] {
        let candidates = hardware_like_candidates(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_function(format!("select_{}_candidates", count), |b| {
            b.iter(|| select(black_box(&candidates), RenderableType::OPENGL_ES2));
        });
    }

    group.finish();
}

fn benchmark_select_worst_case(c: &mut Criterion) {
    // Nothing matches any tier: every tier is scanned before fallback.
    let candidates: Vec<GraphicsConfigCandidate> = (0..64)
        .map(|_| GraphicsConfigCandidate::es2(4, 4, 4, 0, 8, 0))
        .collect();

    c.bench_function("select_fallback_path", |b| {
        b.iter(|| select(black_box(&candidates), RenderableType::OPENGL_ES2));
    });
}

criterion_group!(benches, benchmark_select, benchmark_select_worst_case);
criterion_main!(benches);
