//! Benchmarks for the biquad and the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapline::dsp::biquad::{Biquad, BiquadCoefficients, FilterType};
use tapline::dsp::svf::StateVariableFilter;

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        let input = test_signal(size);
        let mut buffer = input.clone();

        for filter_type in FilterType::ALL {
            let coeffs = BiquadCoefficients::design(filter_type, 1_000.0, 0.707, SAMPLE_RATE);
            let mut biquad = Biquad::new(coeffs);
            group.bench_with_input(
                BenchmarkId::new(format!("biquad_{}", filter_type.name()), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        biquad.render(black_box(&mut buffer));
                    })
                },
            );
        }

        // Coefficient redesign every block, as a swept cutoff would do
        let mut biquad = Biquad::new(BiquadCoefficients::IDENTITY);
        let mut cutoff = 200.0f32;
        group.bench_with_input(BenchmarkId::new("biquad_sweep", size), &size, |b, _| {
            b.iter(|| {
                cutoff = if cutoff > 8_000.0 { 200.0 } else { cutoff * 1.05 };
                biquad.set_coefficients(BiquadCoefficients::design(
                    FilterType::LowPass,
                    black_box(cutoff),
                    0.707,
                    SAMPLE_RATE,
                ));
                buffer.copy_from_slice(&input);
                biquad.render(black_box(&mut buffer));
            })
        });

        let mut svf = StateVariableFilter::new(SAMPLE_RATE, 1_000.0, 1.0);
        let mut bandpass = vec![0.0f32; size];
        let mut lowpass = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("svf", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                svf.render(
                    black_box(&mut buffer),
                    black_box(&mut bandpass),
                    black_box(&mut lowpass),
                );
            })
        });
    }

    group.finish();
}
