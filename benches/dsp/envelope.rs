//! Benchmarks for the peak and RMS followers.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapline::dsp::envelope::{PeakFollower, RmsFollower};

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();

        let mut peak = PeakFollower::new(SAMPLE_RATE, 1.0, 20.0);
        group.bench_with_input(BenchmarkId::new("peak", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                peak.render(black_box(&mut buffer));
            })
        });

        let mut rms = RmsFollower::new(SAMPLE_RATE, 4.0);
        group.bench_with_input(BenchmarkId::new("rms", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                rms.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
