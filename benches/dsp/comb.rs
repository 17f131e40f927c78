//! Benchmarks for the comb family.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapline::dsp::comb::{AllpassFilter, CombFilter, LowpassCombFilter};
use tapline::dsp::delay::DelayLine;

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_comb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/comb");
    // 30ms of loop at 48kHz
    let delay = 1_440.0;

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();
        let line = || DelayLine::new(DelayLine::capacity_for(SAMPLE_RATE, 100.0));

        let mut comb = CombFilter::new(line(), delay, 0.7);
        group.bench_with_input(BenchmarkId::new("comb", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                comb.render(black_box(&mut buffer));
            })
        });

        let mut comb_lp = LowpassCombFilter::new(line(), delay, 0.5, 0.4);
        group.bench_with_input(BenchmarkId::new("comb_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                comb_lp.render(black_box(&mut buffer));
            })
        });

        let mut allpass = AllpassFilter::new(line(), delay, 0.5);
        group.bench_with_input(BenchmarkId::new("allpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                allpass.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
