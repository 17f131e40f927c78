//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use tapline::dsp::delay::DelayLine;
use tapline::dsp::lfo::SineLfo;

use crate::{test_signal, BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in samples
    let delay_times: &[f32] = &[
        48.0,   // 1ms at 48kHz
        480.0,  // 10ms at 48kHz
        4800.0, // 100ms at 48kHz
    ];

    for &size in BLOCK_SIZES {
        let input = test_signal(size);

        for &delay_samples in delay_times {
            let delay_ms = delay_samples / 48.0;

            let mut delay = DelayLine::new(DelayLine::capacity_for(SAMPLE_RATE, 100.0));
            let mut buffer = input.clone();
            group.bench_with_input(
                BenchmarkId::new(format!("render_{}ms", delay_ms as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        buffer.copy_from_slice(&input);
                        delay.render(black_box(&mut buffer), black_box(delay_samples));
                    })
                },
            );
        }

        // Swept fractional delay, the chorus/vibrato access pattern
        let mut delay = DelayLine::new(DelayLine::capacity_for(SAMPLE_RATE, 30.0));
        let mut lfo = SineLfo::new(SAMPLE_RATE, 1.0);
        for &sample in &input {
            delay.write(sample);
        }
        group.bench_with_input(
            BenchmarkId::new("read_interpolated", size),
            &size,
            |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        let delay_time = 2.0 + lfo.tick() * 480.0;
                        sum += delay.read_interpolated(black_box(delay_time));
                    }
                    sum
                })
            },
        );
    }

    group.finish();
}
