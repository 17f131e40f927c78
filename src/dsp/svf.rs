//! Chamberlin state-variable filter.
//!
//! Two integrators in a loop give highpass, bandpass and lowpass taps from the
//! same pair of state words:
//!
//! ```text
//! hp = x - z_lp - Q1·z_bp
//! bp = F1·hp + z_bp
//! lp = F1·bp + z_lp
//! ```
//!
//! with `F1 = 2·sin(π·f/sr)` and `Q1 = 1/resonance`. The loop only stays
//! stable while `F1 < 2 - Q1`, so frequency and resonance constrain each
//! other: a change that would break the rule is refused and the previous
//! coefficients stay in effect.

use std::f32::consts::PI;

pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20_000.0;
pub const MIN_RESONANCE: f32 = 0.5;
pub const MAX_RESONANCE: f32 = 50.0;

/// The three simultaneous responses for one input sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SvfOutputs {
    pub highpass: f32,
    pub bandpass: f32,
    pub lowpass: f32,
}

/// Why a coefficient update was refused.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unstable {
    /// Frequency coefficient the update would have produced.
    pub f1: f32,
    /// Upper bound `2 - Q1` it had to stay below.
    pub limit: f32,
}

#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    f1: f32,
    q1: f32,
    frequency: f32,
    resonance: f32,
    sample_rate: f32,
    z_bp: f32,
    z_lp: f32,
}

impl StateVariableFilter {
    /// Resonance is applied before frequency, so any in-range pair that is
    /// stable on its own is accepted.
    pub fn new(sample_rate: f32, frequency_hz: f32, resonance: f32) -> Self {
        let mut svf = Self {
            f1: 0.0,
            q1: 1.0,
            frequency: MIN_FREQUENCY,
            resonance: 1.0,
            sample_rate,
            z_bp: 0.0,
            z_lp: 0.0,
        };
        let _ = svf.set_resonance(resonance);
        let _ = svf.set_frequency(frequency_hz);
        svf
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn f1(&self) -> f32 {
        self.f1
    }

    pub fn q1(&self) -> f32 {
        self.q1
    }

    /// Clamp to `[20, 20000]` Hz and update F1 if the result stays stable.
    pub fn set_frequency(&mut self, frequency_hz: f32) -> Result<f32, Unstable> {
        let fc = frequency_hz.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        let f1 = 2.0 * (PI * fc / self.sample_rate).sin();
        let limit = 2.0 - self.q1;
        if f1 >= limit {
            return Err(Unstable { f1, limit });
        }

        self.f1 = f1;
        self.frequency = fc;
        Ok(fc)
    }

    /// Clamp to `[0.5, 50]` and update Q1 if the current F1 allows it.
    pub fn set_resonance(&mut self, resonance: f32) -> Result<f32, Unstable> {
        let res = resonance.clamp(MIN_RESONANCE, MAX_RESONANCE);
        let q1 = 1.0 / res;
        let limit = 2.0 - q1;
        if self.f1 >= limit {
            return Err(Unstable { f1: self.f1, limit });
        }

        self.q1 = q1;
        self.resonance = res;
        Ok(res)
    }

    /// Re-derive F1 for a new rate. If the old cutoff is unstable at the new
    /// rate the previous coefficients are kept.
    pub fn set_sample_rate(&mut self, sample_rate: f32) -> Result<f32, Unstable> {
        self.sample_rate = sample_rate;
        self.set_frequency(self.frequency)
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> SvfOutputs {
        let highpass = x - self.z_lp - self.q1 * self.z_bp;
        let bandpass = self.f1 * highpass + self.z_bp;
        let lowpass = self.f1 * bandpass + self.z_lp;
        self.z_bp = bandpass;
        self.z_lp = lowpass;

        SvfOutputs {
            highpass,
            bandpass,
            lowpass,
        }
    }

    /// `io` carries the input in and the highpass response out.
    pub fn render(&mut self, io: &mut [f32], bandpass: &mut [f32], lowpass: &mut [f32]) {
        for ((hp, bp), lp) in io.iter_mut().zip(bandpass.iter_mut()).zip(lowpass.iter_mut()) {
            let out = self.next_sample(*hp);
            *hp = out.highpass;
            *bp = out.bandpass;
            *lp = out.lowpass;
        }
    }

    pub fn reset(&mut self) {
        self.z_bp = 0.0;
        self.z_lp = 0.0;
    }
}
