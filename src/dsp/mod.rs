//! Low-level DSP primitives used by the effect nodes.
//!
//! These components are allocation-free and realtime-safe once constructed;
//! only [`delay::DelayLine::resize`] touches the allocator. They stay focused on
//! the signal-processing math so the effect layer can handle parameter
//! sanitising, logging and the control queue.

/// Biquad coefficient design, direct-form-II section, double-buffered bank.
pub mod biquad;
/// Comb, lowpass-comb and allpass filters built on the delay line.
pub mod comb;
/// Fractional delay line with linear interpolation.
pub mod delay;
/// Peak and RMS envelope followers.
pub mod envelope;
/// Triggered unit-pulse burst.
pub mod impulse;
/// Sine LFO and bipolar/unipolar helpers.
pub mod lfo;
/// Chamberlin state-variable filter with the stability rule.
pub mod svf;

pub use biquad::{Biquad, BiquadCoefficients, CoefficientBank, FilterType};
pub use comb::{AllpassFilter, CombFilter, LowpassCombFilter};
pub use delay::DelayLine;
pub use envelope::{PeakFollower, RmsFollower};
pub use impulse::ImpulseGenerator;
pub use lfo::SineLfo;
pub use svf::{StateVariableFilter, SvfOutputs};
