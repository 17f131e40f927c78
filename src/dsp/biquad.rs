use std::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Biquad Filters
==============

A biquad is the second-order recursive filter everything else gets built
from: two poles, two zeros, five coefficients, two words of memory.

Vocabulary
----------

  K           Pre-warped cutoff: tan(π · f / sr). The bilinear transform
              squeezes the whole analog axis into 0..Nyquist; pre-warping
              puts the cutoff back where it was asked for.

  Q           Resonance. 0.707 is the flattest passband (Butterworth).
              Higher Q rings at the cutoff, lower Q droops early.

  ω           Common normaliser, 1 / (K²Q + K + Q), so a0 is always 1.


Designs (Zölzer, "Digital Audio Signal Processing")
---------------------------------------------------

| type        | b0             | b1            | b2     | a1            | a2             |
| ----------- | -------------- | ------------- | ------ | ------------- | -------------- |
| lowpass     | K²Qω           | 2·b0          | b0     | 2Q(K²-1)ω     | (K²Q - K + Q)ω |
| highpass    | Qω             | -2·b0         | b0     | 2Q(K²-1)ω     | (K²Q - K + Q)ω |
| bandpass    | Kω             | 0             | -b0    | 2Q(K²-1)ω     | (K²Q - K + Q)ω |
| bandreject  | Q(1+K²)ω       | 2Q(K²-1)ω     | b0     | b1            | (K²Q - K + Q)ω |
| allpass     | (K²Q - K + Q)ω | 2Q(K²-1)ω     | 1      | b1            | b0             |


Direct Form II
--------------

One shared pair of state words sits between the recursive and the
feed-forward half:

    x ──(+)──────┬──[b0]──(+)── y
         ↑       z1        ↑
         ├─[-a1]─┼──[b1]───┤
         │       z2        │
         └─[-a2]─┴──[b2]───┘

    u  = x - a1·z1 - a2·z2
    y  = b0·u + b1·z1 + b2·z2
    z2 = z1, z1 = u


Coefficient Changes
-------------------

A coefficient set must never be half-written while a block is running.
`CoefficientBank` keeps two sets: parameter changes write the staged one,
and `commit` swaps it in at the top of the next block.
*/

pub const MIN_FREQUENCY: f32 = 20.0;
pub const MAX_FREQUENCY: f32 = 20_000.0;
pub const MIN_RESONANCE: f32 = 0.1;
pub const MAX_RESONANCE: f32 = 20.0;

/// Highest cutoff as a fraction of the sample rate. Keeps `tan` finite.
pub const NYQUIST_GUARD: f32 = 0.49;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    HighPass,
    BandPass,
    BandReject,
    AllPass,
}

impl FilterType {
    pub const ALL: [FilterType; 5] = [
        FilterType::LowPass,
        FilterType::HighPass,
        FilterType::BandPass,
        FilterType::BandReject,
        FilterType::AllPass,
    ];

    /// Look up a filter type by its host name.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lowpass" | "lp" => Some(FilterType::LowPass),
            "highpass" | "hp" => Some(FilterType::HighPass),
            "bandpass" | "bp" => Some(FilterType::BandPass),
            "bandreject" | "notch" | "br" => Some(FilterType::BandReject),
            "allpass" | "ap" => Some(FilterType::AllPass),
            _ => None,
        }
    }

    /// Like [`parse`](Self::parse), but unknown names fall back to lowpass.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(name, "not a legal filter type, lowpass is used");
            FilterType::LowPass
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            FilterType::LowPass => "lowpass",
            FilterType::HighPass => "highpass",
            FilterType::BandPass => "bandpass",
            FilterType::BandReject => "bandreject",
            FilterType::AllPass => "allpass",
        }
    }
}

/// Clamp a cutoff to the audible band and below the Nyquist guard.
#[inline]
pub fn clamp_frequency(frequency_hz: f32, sample_rate: f32) -> f32 {
    frequency_hz
        .clamp(MIN_FREQUENCY, MAX_FREQUENCY)
        .min(sample_rate * NYQUIST_GUARD)
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passes input straight through.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    pub const fn new(b0: f32, b1: f32, b2: f32, a1: f32, a2: f32) -> Self {
        Self { b0, b1, b2, a1, a2 }
    }

    /// Design a coefficient set. Frequency and resonance are clamped to their
    /// legal ranges first, so any input yields a stable filter.
    pub fn design(
        filter_type: FilterType,
        frequency_hz: f32,
        resonance: f32,
        sample_rate: f32,
    ) -> Self {
        // Low cutoffs put K² near f32 epsilon, so the design runs in f64.
        let f = f64::from(clamp_frequency(frequency_hz, sample_rate));
        let q = f64::from(resonance.clamp(MIN_RESONANCE, MAX_RESONANCE));
        let sr = f64::from(sample_rate);

        let k = (PI * f / sr).tan();
        let kk = k * k;
        let omega = 1.0 / (kk * q + k + q);
        let a1 = (2.0 * q * (kk - 1.0) * omega) as f32;
        let a2 = ((kk * q - k + q) * omega) as f32;
        let (a1_64, a2_64) = (f64::from(a1), f64::from(a2));

        match filter_type {
            // 4·b0 equals 1 ± a1 + a2 exactly; taking it from the rounded
            // poles keeps the passband gain at 1.
            FilterType::LowPass => {
                let b0 = ((1.0 + a1_64 + a2_64) * 0.25) as f32;
                Self::new(b0, 2.0 * b0, b0, a1, a2)
            }
            FilterType::HighPass => {
                let b0 = ((1.0 - a1_64 + a2_64) * 0.25) as f32;
                Self::new(b0, -2.0 * b0, b0, a1, a2)
            }
            FilterType::BandPass => {
                let b0 = (k * omega) as f32;
                Self::new(b0, 0.0, -b0, a1, a2)
            }
            FilterType::BandReject => {
                let b0 = (q * (1.0 + kk) * omega) as f32;
                Self::new(b0, a1, b0, a1, a2)
            }
            FilterType::AllPass => Self::new(a2, a1, 1.0, a1, a2),
        }
    }
}

/// Direct-form-II biquad section.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    z1: f32,
    z2: f32,
}

impl Biquad {
    pub fn new(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Swap coefficients without touching the state.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let c = &self.coeffs;
        let u = x - c.a1 * self.z1 - c.a2 * self.z2;
        let y = c.b0 * u + c.b1 * self.z1 + c.b2 * self.z2;
        self.z2 = self.z1;
        self.z1 = u;
        y
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Double-buffered coefficients: writers stage, the audio block commits.
#[derive(Debug, Clone)]
pub struct CoefficientBank {
    current: BiquadCoefficients,
    staged: BiquadCoefficients,
    pending: bool,
}

impl CoefficientBank {
    pub fn new(initial: BiquadCoefficients) -> Self {
        Self {
            current: initial,
            staged: initial,
            pending: false,
        }
    }

    pub fn stage(&mut self, coeffs: BiquadCoefficients) {
        self.staged = coeffs;
        self.pending = true;
    }

    /// Returns the set that should run this block, swapping in the staged one
    /// if a change is waiting.
    pub fn commit(&mut self) -> Option<BiquadCoefficients> {
        if !self.pending {
            return None;
        }
        self.current = self.staged;
        self.pending = false;
        Some(self.current)
    }

    pub fn current(&self) -> BiquadCoefficients {
        self.current
    }

    pub fn staged(&self) -> BiquadCoefficients {
        self.staged
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
