//! Low Frequency Oscillator (LFO) for delay-time modulation.

use std::f32::consts::FRAC_PI_2;
use std::f64::consts::TAU;

/*
Modulating a Delay
==================

Vibrato, chorus and flanging are all the same trick: read a delay line at
a position that keeps moving. While the read tap slides towards the write
head the pitch goes up, while it falls behind the pitch goes down. A slow
sine is the smoothest way to move it.

Vocabulary
----------

  cycle       Samples per LFO period: sample_rate / frequency.
              At 1 Hz and 48kHz that is 48000 samples.

  phase       Position inside the cycle, counted in samples. Advances by
              one per tick and wraps to 0 at the end of the cycle. Kept in
              f64: an f32 counter stops moving at 2^24 samples, which a
              0.003 Hz LFO at 48kHz never reaches the end of.

  unipolar    Output is only positive: 0.0 to 1.0. Delay modulation wants
              this, since a delay can only be stretched from its floor:

                  delay = depth · lfo + 2

              The 2-sample floor keeps the tap clear of the write head.

  quadrature  The same LFO shifted by a quarter turn (π/2). Stereo chorus
              runs the right channel in quadrature with the left, so the
              two sides never move together.


Bipolar to Unipolar Conversion
------------------------------

    unipolar = (bipolar + 1.0) * 0.5

    bipolar   unipolar
    -1.0      0.0
     0.0      0.5
    +1.0      1.0
*/

/// Convert bipolar signal (-1.0 to +1.0) to unipolar (0.0 to 1.0).
#[inline]
pub fn bipolar_to_unipolar(bipolar: f32) -> f32 {
    (bipolar + 1.0) * 0.5
}

/// Length of one LFO cycle in samples.
///
/// ```
/// use tapline::dsp::lfo::samples_per_period;
/// // a 5 Hz sweep at 48kHz repeats every 9600 samples
/// assert_eq!(samples_per_period(5.0, 48_000.0), 9_600.0);
/// ```
#[inline]
pub fn samples_per_period(frequency_hz: f32, sample_rate: f32) -> f64 {
    f64::from(sample_rate) / f64::from(frequency_hz)
}

/// Unipolar sine LFO driven by a sample-counting phase accumulator.
#[derive(Debug, Clone)]
pub struct SineLfo {
    phase: f64,
    cycle_length: f64,
    frequency: f32,
    phase_offset: f32,
    sample_rate: f32,
}

impl SineLfo {
    /// Frequencies that are not strictly positive fall back to 1 Hz.
    pub fn new(sample_rate: f32, frequency_hz: f32) -> Self {
        let frequency = if frequency_hz > 0.0 && frequency_hz.is_finite() {
            frequency_hz
        } else {
            1.0
        };

        Self {
            phase: 0.0,
            cycle_length: samples_per_period(frequency, sample_rate),
            frequency,
            phase_offset: 0.0,
            sample_rate,
        }
    }

    /// A companion running a quarter turn ahead with the same frequency.
    pub fn quadrature(&self) -> Self {
        Self {
            phase_offset: self.phase_offset + FRAC_PI_2,
            ..self.clone()
        }
    }

    pub fn with_phase_offset(mut self, radians: f32) -> Self {
        self.phase_offset = radians;
        self
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Returns `false` and keeps the old rate for frequencies that are zero,
    /// negative or not finite.
    pub fn set_frequency(&mut self, frequency_hz: f32) -> bool {
        if !(frequency_hz > 0.0 && frequency_hz.is_finite()) {
            return false;
        }
        self.frequency = frequency_hz;
        self.update_cycle();
        true
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_cycle();
    }

    fn update_cycle(&mut self) {
        self.cycle_length = samples_per_period(self.frequency, self.sample_rate);
        if self.phase >= self.cycle_length {
            self.phase = 0.0;
        }
    }

    /// Current value in `[0, 1]`, then advance one sample.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        let theta = self.phase / self.cycle_length;
        let angle = TAU * theta + f64::from(self.phase_offset);
        let value = bipolar_to_unipolar(angle.sin() as f32);

        self.phase += 1.0;
        if self.phase >= self.cycle_length {
            self.phase = 0.0;
        }
        value
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bipolar_to_unipolar() {
        assert!((bipolar_to_unipolar(-1.0) - 0.0).abs() < 1e-6);
        assert!((bipolar_to_unipolar(0.0) - 0.5).abs() < 1e-6);
        assert!((bipolar_to_unipolar(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cycle_length_follows_rate() {
        assert_eq!(samples_per_period(1.0, 48_000.0), 48_000.0);
        assert_eq!(samples_per_period(0.002, 48_000.0), 48_000.0 / f64::from(0.002f32));
    }

    #[test]
    fn sine_lfo_starts_at_midpoint_and_stays_unipolar() {
        let mut lfo = SineLfo::new(1_000.0, 10.0);
        assert!((lfo.tick() - 0.5).abs() < 1e-6);

        for _ in 0..1_000 {
            let v = lfo.tick();
            assert!((0.0..=1.0).contains(&v), "out of range: {v}");
        }
    }

    #[test]
    fn sine_lfo_peaks_a_quarter_cycle_in() {
        // 100 samples per cycle
        let mut lfo = SineLfo::new(1_000.0, 10.0);
        let values: Vec<f32> = (0..100).map(|_| lfo.tick()).collect();

        assert!((values[25] - 1.0).abs() < 1e-5);
        assert!((values[50] - 0.5).abs() < 1e-5);
        assert!(values[75].abs() < 1e-5);
    }

    #[test]
    fn phase_wraps_after_one_cycle() {
        let mut lfo = SineLfo::new(1_000.0, 10.0);
        for _ in 0..100 {
            lfo.tick();
        }
        assert_eq!(lfo.phase(), 0.0);
    }

    #[test]
    fn quadrature_leads_by_a_quarter_cycle() {
        let mut left = SineLfo::new(1_000.0, 10.0);
        let mut right = left.quadrature();

        let l: Vec<f32> = (0..100).map(|_| left.tick()).collect();
        let r: Vec<f32> = (0..100).map(|_| right.tick()).collect();

        // cos starts at its peak
        assert!((r[0] - 1.0).abs() < 1e-6);
        for i in 0..75 {
            assert!((r[i] - l[i + 25]).abs() < 1e-4, "sample {i}");
        }
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let mut lfo = SineLfo::new(48_000.0, 2.0);
        assert!(!lfo.set_frequency(0.0));
        assert!(!lfo.set_frequency(-3.0));
        assert_eq!(lfo.frequency(), 2.0);
        assert_eq!(lfo.cycle_length(), 24_000.0);

        assert!(lfo.set_frequency(4.0));
        assert_eq!(lfo.cycle_length(), 12_000.0);
    }

    #[test]
    fn very_slow_rates_keep_advancing() {
        // 24 million samples per cycle
        let mut lfo = SineLfo::new(48_000.0, 0.002);
        assert!(lfo.cycle_length() > 16_777_216.0);

        lfo.phase = 16_777_216.0;
        let first = lfo.tick();
        for _ in 0..999 {
            lfo.tick();
        }
        assert_eq!(lfo.phase(), 16_778_216.0);
        assert_ne!(lfo.tick(), first);

        lfo.phase = lfo.cycle_length().ceil() - 1.0;
        lfo.tick();
        assert_eq!(lfo.phase(), 0.0);
    }

    #[test]
    fn shrinking_the_cycle_rewinds_a_stale_phase() {
        let mut lfo = SineLfo::new(1_000.0, 1.0);
        for _ in 0..500 {
            lfo.tick();
        }
        lfo.set_frequency(10.0);
        assert_eq!(lfo.phase(), 0.0);
    }
}
