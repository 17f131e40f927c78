pub mod dsp; // Allocation-free per-sample primitives
pub mod effects; // Effect nodes, factory and control queue
pub mod error;

pub use dsp::biquad::FilterType;
pub use effects::{create, ChannelLayout, EffectNode, EffectSpec, Param};
pub use error::DspError;

/// Largest block the demo host and benchmarks hand to `process`.
pub const MAX_BLOCK_SIZE: usize = 2048;
