#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::delay::MAX_DELAY_MS;
use super::node::{clamp_logged, ms_to_samples, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::comb::{AllpassFilter, CombFilter, LowpassCombFilter, MAX_LOOP_GAIN};
use crate::dsp::delay::DelayLine;
use crate::error::{check_sample_rate, DspError};

const DEFAULT_DELAY_MS: f32 = 30.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct CombConfig {
    pub delay_ms: f32,
    pub feedback: f32,
}

impl Default for CombConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            feedback: 0.1,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct CombLowpassConfig {
    pub delay_ms: f32,
    pub g1: f32,
    pub g2: f32,
}

impl Default for CombLowpassConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            g1: 0.1,
            g2: 0.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct AllpassConfig {
    pub delay_ms: f32,
    pub gain: f32,
}

impl Default for AllpassConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_DELAY_MS,
            gain: 0.1,
        }
    }
}

/// Delay time in ms and its sample-rate conversion, shared by the three
/// delay-line filters.
struct DelayTime {
    sample_rate: f32,
    ms: f32,
}

impl DelayTime {
    fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            ms: DEFAULT_DELAY_MS,
        }
    }

    fn set(&mut self, effect: &'static str, ms: f32) -> f32 {
        self.ms = clamp_logged(effect, Param::DelayTime, ms, 0.0, MAX_DELAY_MS);
        self.samples()
    }

    fn samples(&self) -> f32 {
        ms_to_samples(self.ms, self.sample_rate)
    }

    /// Reallocate `line` for a new rate. Returns `false` if the rate did not
    /// change.
    fn prepare(&mut self, line: &mut DelayLine, sample_rate: f32) -> Result<bool, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate == self.sample_rate {
            return Ok(false);
        }
        line.resize(DelayLine::capacity_for(sample_rate, MAX_DELAY_MS))?;
        self.sample_rate = sample_rate;
        Ok(true)
    }
}

fn new_line(sample_rate: f32) -> Result<DelayLine, DspError> {
    DelayLine::for_duration(check_sample_rate(sample_rate)?, MAX_DELAY_MS)
}

/// Feedback comb.
pub struct CombNode {
    comb: CombFilter,
    time: DelayTime,
}

impl CombNode {
    pub const NAME: &'static str = "comb";

    pub fn new(sample_rate: f32, config: CombConfig) -> Result<Self, DspError> {
        let line = new_line(sample_rate)?;
        let mut node = Self {
            comb: CombFilter::new(line, 1.0, 0.0),
            time: DelayTime::new(sample_rate),
        };
        node.set_parameter(Param::DelayTime, config.delay_ms);
        node.set_parameter(Param::Feedback, config.feedback);
        Ok(node)
    }

    pub fn delay_samples(&self) -> f32 {
        self.comb.delay()
    }

    pub fn feedback(&self) -> f32 {
        self.comb.feedback()
    }
}

impl EffectNode for CombNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        if self.time.prepare(self.comb.line_mut(), sample_rate)? {
            self.comb.set_delay(self.time.samples());
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.comb.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::DelayTime => {
                let samples = self.time.set(Self::NAME, value);
                self.comb.set_delay(samples);
            }
            Param::Feedback => {
                let feedback = clamp_logged(Self::NAME, param, value, 0.0, 1.0);
                self.comb.set_feedback(feedback);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.comb.reset();
    }

    fn reset(&mut self) {
        self.comb.reset();
    }
}

/// Comb with a one-pole lowpass in the loop.
pub struct CombLowpassNode {
    comb: LowpassCombFilter,
    time: DelayTime,
}

impl CombLowpassNode {
    pub const NAME: &'static str = "comblp";

    pub fn new(sample_rate: f32, config: CombLowpassConfig) -> Result<Self, DspError> {
        let line = new_line(sample_rate)?;
        let mut node = Self {
            comb: LowpassCombFilter::new(line, 1.0, 0.0, 0.0),
            time: DelayTime::new(sample_rate),
        };
        node.set_parameter(Param::DelayTime, config.delay_ms);
        node.set_parameter(Param::Feedback, config.g1);
        node.set_parameter(Param::G2, config.g2);
        Ok(node)
    }

    pub fn gains(&self) -> (f32, f32) {
        (self.comb.g1(), self.comb.g2())
    }

    fn log_loop_gain(param: Param, requested: f32, applied: f32) {
        if requested != applied {
            warn!(
                effect = Self::NAME,
                param = param.name(),
                requested,
                applied,
                max = MAX_LOOP_GAIN,
                "g1 + g2 too large, reduced for stability"
            );
        }
    }
}

impl EffectNode for CombLowpassNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        if self.time.prepare(self.comb.line_mut(), sample_rate)? {
            self.comb.set_delay(self.time.samples());
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.comb.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::DelayTime => {
                let samples = self.time.set(Self::NAME, value);
                self.comb.set_delay(samples);
            }
            Param::Feedback => {
                let g1 = clamp_logged(Self::NAME, param, value, 0.0, 1.0);
                let applied = self.comb.set_g1(g1);
                Self::log_loop_gain(param, g1, applied);
            }
            Param::G2 => {
                let g2 = clamp_logged(Self::NAME, param, value, 0.0, 1.0);
                let applied = self.comb.set_g2(g2);
                Self::log_loop_gain(param, g2, applied);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.comb.reset();
    }

    fn reset(&mut self) {
        self.comb.reset();
    }
}

/// Schroeder allpass.
pub struct AllpassNode {
    allpass: AllpassFilter,
    time: DelayTime,
}

impl AllpassNode {
    pub const NAME: &'static str = "allpass";

    pub fn new(sample_rate: f32, config: AllpassConfig) -> Result<Self, DspError> {
        let line = new_line(sample_rate)?;
        let mut node = Self {
            allpass: AllpassFilter::new(line, 1.0, 0.0),
            time: DelayTime::new(sample_rate),
        };
        node.set_parameter(Param::DelayTime, config.delay_ms);
        node.set_parameter(Param::Gain, config.gain);
        Ok(node)
    }

    pub fn gain(&self) -> f32 {
        self.allpass.gain()
    }
}

impl EffectNode for AllpassNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        if self.time.prepare(self.allpass.line_mut(), sample_rate)? {
            self.allpass.set_delay(self.time.samples());
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.allpass.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::DelayTime => {
                let samples = self.time.set(Self::NAME, value);
                self.allpass.set_delay(samples);
            }
            Param::Gain => {
                let gain = clamp_logged(Self::NAME, param, value, 0.0, 1.0);
                self.allpass.set_gain(gain);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.allpass.reset();
    }

    fn reset(&mut self) {
        self.allpass.reset();
    }
}
