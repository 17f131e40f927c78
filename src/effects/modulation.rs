use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::node::{block_len, clamp_logged, ms_to_samples, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::delay::DelayLine;
use crate::dsp::lfo::SineLfo;
use crate::error::{check_sample_rate, DspError};

/*
Modulated Delays
================

Both effects here read a short delay line at a position swept by a sine
LFO:

    delay = depth · lfo + 2        (samples, lfo in [0, 1])

The constant 2 keeps the tap away from the write head even at zero depth.

  vibrato     100% wet. Feeding part of the output back into the line
              turns it into a flanger.

  chorus      Stereo, no feedback. Each side mixes its delayed copy with
              the dry input; the right LFO runs a quarter cycle ahead of
              the left so the two sides drift apart.
*/

/// Samples of headroom below every modulated tap.
const DELAY_FLOOR: f32 = 2.0;

fn modulated_line(sample_rate: f32, max_depth_ms: f32) -> Result<DelayLine, DspError> {
    let capacity =
        DelayLine::capacity_for(sample_rate, max_depth_ms).saturating_add(DELAY_FLOOR as usize);
    let mut line = DelayLine::new(2);
    line.resize(capacity)?;
    Ok(line)
}

fn set_lfo_rate(effect: &'static str, lfo: &mut SineLfo, frequency_hz: f32) -> bool {
    let applied = lfo.set_frequency(frequency_hz);
    if !applied {
        warn!(
            effect,
            requested = frequency_hz,
            kept = lfo.frequency(),
            "LFO frequency must be positive, ignored"
        );
    }
    applied
}

pub const VIBRATO_MAX_DEPTH_MS: f32 = 20.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct VibratoConfig {
    pub depth_ms: f32,
    pub frequency: f32,
    pub feedback: f32,
}

impl Default for VibratoConfig {
    fn default() -> Self {
        Self {
            depth_ms: 0.0,
            frequency: 1.0,
            feedback: 0.0,
        }
    }
}

/// Vibrato, or flanger once feedback is turned up.
pub struct VibratoNode {
    line: DelayLine,
    lfo: SineLfo,
    sample_rate: f32,
    depth_ms: f32,
    depth_samples: f32,
    feedback: f32,
}

impl VibratoNode {
    pub const NAME: &'static str = "vibrato";

    pub fn new(sample_rate: f32, config: VibratoConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut node = Self {
            line: modulated_line(sample_rate, VIBRATO_MAX_DEPTH_MS)?,
            lfo: SineLfo::new(sample_rate, 1.0),
            sample_rate,
            depth_ms: 0.0,
            depth_samples: 0.0,
            feedback: 0.0,
        };
        node.set_parameter(Param::Depth, config.depth_ms);
        node.set_parameter(Param::Frequency, config.frequency);
        node.set_parameter(Param::Feedback, config.feedback);
        Ok(node)
    }

    pub fn depth_ms(&self) -> f32 {
        self.depth_ms
    }

    pub fn frequency(&self) -> f32 {
        self.lfo.frequency()
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }
}

impl EffectNode for VibratoNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            let line = modulated_line(sample_rate, VIBRATO_MAX_DEPTH_MS)?;
            self.line = line;
            self.sample_rate = sample_rate;
            self.lfo.set_sample_rate(sample_rate);
            self.depth_samples = ms_to_samples(self.depth_ms, sample_rate);
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        let Some(buffer) = channels.first_mut() else {
            return;
        };
        let max_delay = self.line.max_delay();

        for sample in buffer.iter_mut() {
            let delay = (self.depth_samples * self.lfo.tick() + DELAY_FLOOR).min(max_delay);
            let delayed = self.line.read_interpolated(delay);
            self.line.write(*sample + delayed * self.feedback);
            *sample = delayed;
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Depth => {
                self.depth_ms = clamp_logged(Self::NAME, param, value, 0.0, VIBRATO_MAX_DEPTH_MS);
                self.depth_samples = ms_to_samples(self.depth_ms, self.sample_rate);
            }
            Param::Frequency => {
                set_lfo_rate(Self::NAME, &mut self.lfo, value);
            }
            Param::Feedback => {
                self.feedback = clamp_logged(Self::NAME, param, value, -0.99, 0.99);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.line.reset();
    }

    fn reset(&mut self) {
        self.line.reset();
        self.lfo.reset();
    }
}

pub const CHORUS_MAX_DEPTH_MS: f32 = 40.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ChorusConfig {
    pub depth_left_ms: f32,
    pub depth_right_ms: f32,
    pub frequency: f32,
    /// Wet share in percent
    pub drywet: f32,
}

impl Default for ChorusConfig {
    fn default() -> Self {
        Self {
            depth_left_ms: 10.0,
            depth_right_ms: 10.0,
            frequency: 1.0,
            drywet: 50.0,
        }
    }
}

/// One side of the stereo chorus.
struct ChorusVoice {
    line: DelayLine,
    lfo: SineLfo,
    depth_ms: f32,
    depth_samples: f32,
}

impl ChorusVoice {
    fn new(sample_rate: f32, lfo: SineLfo) -> Result<Self, DspError> {
        Ok(Self {
            line: modulated_line(sample_rate, CHORUS_MAX_DEPTH_MS)?,
            lfo,
            depth_ms: 0.0,
            depth_samples: 0.0,
        })
    }

    fn set_depth(&mut self, depth_ms: f32, sample_rate: f32) {
        self.depth_ms = depth_ms;
        self.depth_samples = ms_to_samples(depth_ms, sample_rate);
    }

    #[inline]
    fn next_sample(&mut self, x: f32, max_delay: f32) -> f32 {
        let delay = (self.depth_samples * self.lfo.tick() + DELAY_FLOOR).min(max_delay);
        let delayed = self.line.read_interpolated(delay);
        self.line.write(x);
        delayed
    }

    fn reset(&mut self) {
        self.line.reset();
        self.lfo.reset();
    }
}

/// Stereo chorus with quadrature LFOs.
pub struct ChorusNode {
    left: ChorusVoice,
    right: ChorusVoice,
    sample_rate: f32,
    wet: f32,
}

impl ChorusNode {
    pub const NAME: &'static str = "chorus";

    pub fn new(sample_rate: f32, config: ChorusConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let lfo = SineLfo::new(sample_rate, 1.0);
        let mut node = Self {
            right: ChorusVoice::new(sample_rate, lfo.quadrature())?,
            left: ChorusVoice::new(sample_rate, lfo)?,
            sample_rate,
            wet: 0.5,
        };
        node.set_parameter(Param::DepthLeft, config.depth_left_ms);
        node.set_parameter(Param::DepthRight, config.depth_right_ms);
        node.set_parameter(Param::Frequency, config.frequency);
        node.set_parameter(Param::DryWet, config.drywet);
        Ok(node)
    }

    pub fn depths_ms(&self) -> (f32, f32) {
        (self.left.depth_ms, self.right.depth_ms)
    }

    pub fn frequency(&self) -> f32 {
        self.left.lfo.frequency()
    }

    /// Wet share in `[0, 1]`.
    pub fn wet(&self) -> f32 {
        self.wet
    }
}

impl EffectNode for ChorusNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::STEREO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate == self.sample_rate {
            return Ok(());
        }

        // Allocate both before touching either so a failure leaves no half
        // resized state behind.
        let left = modulated_line(sample_rate, CHORUS_MAX_DEPTH_MS)?;
        let right = modulated_line(sample_rate, CHORUS_MAX_DEPTH_MS)?;
        self.left.line = left;
        self.right.line = right;
        self.sample_rate = sample_rate;

        for voice in [&mut self.left, &mut self.right] {
            voice.lfo.set_sample_rate(sample_rate);
            let depth_ms = voice.depth_ms;
            voice.set_depth(depth_ms, sample_rate);
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        let n = block_len(channels, 2);
        let [left, right, ..] = channels else {
            return;
        };
        let max_delay = self.left.line.max_delay();
        let wet = self.wet;
        let dry = 1.0 - wet;

        for i in 0..n {
            let delayed_l = self.left.next_sample(left[i], max_delay);
            let delayed_r = self.right.next_sample(right[i], max_delay);
            left[i] = wet * delayed_l + dry * left[i];
            right[i] = wet * delayed_r + dry * right[i];
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::DepthLeft | Param::DepthRight | Param::Depth => {
                let depth = clamp_logged(Self::NAME, param, value, 0.0, CHORUS_MAX_DEPTH_MS);
                if param != Param::DepthRight {
                    self.left.set_depth(depth, self.sample_rate);
                }
                if param != Param::DepthLeft {
                    self.right.set_depth(depth, self.sample_rate);
                }
            }
            Param::Frequency => {
                // Both LFOs share one rate so quadrature holds.
                if set_lfo_rate(Self::NAME, &mut self.left.lfo, value) {
                    self.right.lfo.set_frequency(value);
                }
            }
            Param::DryWet => {
                self.wet = clamp_logged(Self::NAME, param, value, 0.0, 100.0) / 100.0;
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.left.line.reset();
        self.right.line.reset();
    }

    fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }
}
