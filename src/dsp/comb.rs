//! Delay-line filters: comb, comb with a lowpass in the loop, and allpass.
//!
//! All three read their tap before writing, and the tap is what they emit.
//!
//! ```text
//! comb:      y = d(n),  d(n) ← x + g·y
//! comb+lp:   y = d(n),  lp = y + g2·z,  z = lp,  d(n) ← x + g1·lp
//! allpass:   t = d(n),  w = x + g·t,  d(n) ← w,  y = t - g·w
//! ```
//!
//! Delay lengths are in samples, fractional allowed, and held to
//! `[1, capacity - 1]` so the tap never lands on the write head.

use super::delay::DelayLine;

/// Largest combined loop gain the lowpass comb accepts.
pub const MAX_LOOP_GAIN: f32 = 0.999;

#[inline]
fn clamp_delay(line: &DelayLine, delay_samples: f32) -> f32 {
    delay_samples.clamp(1.0, line.max_delay())
}

/// Feedback comb filter. Echoes spaced `delay` samples apart, each scaled by
/// `feedback`.
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    delay: f32,
    feedback: f32,
}

impl CombFilter {
    pub fn new(line: DelayLine, delay_samples: f32, feedback: f32) -> Self {
        let mut comb = Self {
            line,
            delay: 1.0,
            feedback: 0.0,
        };
        comb.set_delay(delay_samples);
        comb.set_feedback(feedback);
        comb
    }

    pub fn line(&self) -> &DelayLine {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut DelayLine {
        &mut self.line
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Returns the delay actually applied.
    pub fn set_delay(&mut self, delay_samples: f32) -> f32 {
        self.delay = clamp_delay(&self.line, delay_samples);
        self.delay
    }

    /// Returns the feedback actually applied, clamped to `[0, 1]`.
    pub fn set_feedback(&mut self, feedback: f32) -> f32 {
        self.feedback = feedback.clamp(0.0, 1.0);
        self.feedback
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let y = self.line.read_interpolated(self.delay);
        self.line.write(x + self.feedback * y);
        y
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.line.reset();
    }
}

/// Comb filter with a one-pole lowpass in the feedback path. Each echo comes
/// back darker than the last.
#[derive(Debug, Clone)]
pub struct LowpassCombFilter {
    line: DelayLine,
    delay: f32,
    g1: f32,
    g2: f32,
    z1: f32,
}

impl LowpassCombFilter {
    pub fn new(line: DelayLine, delay_samples: f32, g1: f32, g2: f32) -> Self {
        let mut comb = Self {
            line,
            delay: 1.0,
            g1: 0.0,
            g2: 0.0,
            z1: 0.0,
        };
        comb.set_delay(delay_samples);
        comb.set_g1(g1);
        comb.set_g2(g2);
        comb
    }

    pub fn line_mut(&mut self) -> &mut DelayLine {
        &mut self.line
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn g1(&self) -> f32 {
        self.g1
    }

    pub fn g2(&self) -> f32 {
        self.g2
    }

    pub fn set_delay(&mut self, delay_samples: f32) -> f32 {
        self.delay = clamp_delay(&self.line, delay_samples);
        self.delay
    }

    /// Set the loop feedback. If `g1 + g2` would exceed [`MAX_LOOP_GAIN`],
    /// g1 is reduced to fit. Returns the applied value.
    pub fn set_g1(&mut self, g1: f32) -> f32 {
        let g1 = g1.clamp(0.0, 1.0);
        self.g1 = if g1 + self.g2 > MAX_LOOP_GAIN {
            MAX_LOOP_GAIN - self.g2
        } else {
            g1
        };
        self.g1
    }

    /// Set the lowpass gain, reduced the same way as [`set_g1`](Self::set_g1).
    pub fn set_g2(&mut self, g2: f32) -> f32 {
        let g2 = g2.clamp(0.0, 1.0);
        self.g2 = if self.g1 + g2 > MAX_LOOP_GAIN {
            MAX_LOOP_GAIN - self.g1
        } else {
            g2
        };
        self.g2
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let y = self.line.read_interpolated(self.delay);
        let lp = y + self.g2 * self.z1;
        self.z1 = lp;
        self.line.write(x + self.g1 * lp);
        y
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.line.reset();
        self.z1 = 0.0;
    }
}

/// Schroeder allpass: flat magnitude, smeared phase.
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
    delay: f32,
    gain: f32,
}

impl AllpassFilter {
    pub fn new(line: DelayLine, delay_samples: f32, gain: f32) -> Self {
        let mut allpass = Self {
            line,
            delay: 1.0,
            gain: 0.0,
        };
        allpass.set_delay(delay_samples);
        allpass.set_gain(gain);
        allpass
    }

    pub fn line_mut(&mut self) -> &mut DelayLine {
        &mut self.line
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn set_delay(&mut self, delay_samples: f32) -> f32 {
        self.delay = clamp_delay(&self.line, delay_samples);
        self.delay
    }

    pub fn set_gain(&mut self, gain: f32) -> f32 {
        self.gain = gain.clamp(0.0, 1.0);
        self.gain
    }

    #[inline]
    pub fn next_sample(&mut self, x: f32) -> f32 {
        let tap = self.line.read_interpolated(self.delay);
        let w = x + self.gain * tap;
        self.line.write(w);
        tap - self.gain * w
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.line.reset();
    }
}
