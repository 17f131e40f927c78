//! Benchmarks for low-level DSP primitives.

mod comb;
mod delay;
mod envelope;
mod filter;

pub use comb::bench_comb;
pub use delay::bench_delay;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
