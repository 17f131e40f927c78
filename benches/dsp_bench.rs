//! Benchmarks for the DSP primitives and the effect nodes built on them.
//!
//! Run with: cargo bench
//!
//! Every effect has to finish a block well inside the real-time deadline.
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - dsp/*        Primitives (delay line, biquad, svf, combs, followers)
//!   - effects/*    Every node the factory can build, driven through `process`

use criterion::{criterion_group, criterion_main};

mod dsp;
mod effects;

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

pub const SAMPLE_RATE: f32 = 48_000.0;

/// A test tone shared by every bench.
pub fn test_signal(size: usize) -> Vec<f32> {
    (0..size).map(|i| (i as f32 * 0.1).sin()).collect()
}

criterion_group!(
    benches,
    // Primitives
    dsp::bench_delay,
    dsp::bench_filter,
    dsp::bench_comb,
    dsp::bench_envelope,
    // Effect nodes
    effects::bench_effects,
);
criterion_main!(benches);
