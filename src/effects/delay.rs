#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::node::{clamp_logged, ms_to_samples, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::delay::DelayLine;
use crate::error::{check_sample_rate, DspError};

/// Longest delay the line is sized for.
pub const MAX_DELAY_MS: f32 = 100.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct DelayConfig {
    pub delay_ms: f32,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self { delay_ms: 10.0 }
    }
}

/// Plain fractional delay.
pub struct DelayNode {
    line: DelayLine,
    sample_rate: f32,
    delay_ms: f32,
    delay_samples: f32,
}

impl DelayNode {
    pub const NAME: &'static str = "delay";

    pub fn new(sample_rate: f32, config: DelayConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut node = Self {
            line: DelayLine::for_duration(sample_rate, MAX_DELAY_MS)?,
            sample_rate,
            delay_ms: 0.0,
            delay_samples: 1.0,
        };
        node.set_delay_ms(config.delay_ms);
        Ok(node)
    }

    pub fn delay_ms(&self) -> f32 {
        self.delay_ms
    }

    /// Current delay in samples after clamping to the line.
    pub fn delay_samples(&self) -> f32 {
        self.delay_samples
    }

    fn set_delay_ms(&mut self, delay_ms: f32) {
        self.delay_ms = clamp_logged(Self::NAME, Param::DelayTime, delay_ms, 0.0, MAX_DELAY_MS);
        self.update_delay();
    }

    fn update_delay(&mut self) {
        self.delay_samples = ms_to_samples(self.delay_ms, self.sample_rate)
            .clamp(1.0, self.line.max_delay());
    }
}

impl EffectNode for DelayNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            self.line
                .resize(DelayLine::capacity_for(sample_rate, MAX_DELAY_MS))?;
            self.sample_rate = sample_rate;
            self.update_delay();
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.line.render(buffer, self.delay_samples);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::DelayTime => self.set_delay_ms(value),
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.line.reset();
    }

    fn reset(&mut self) {
        self.line.reset();
    }
}
