#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::{unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::impulse::ImpulseGenerator;
use crate::error::{check_sample_rate, DspError};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ImpulseConfig {
    pub length: u32,
}

impl Default for ImpulseConfig {
    fn default() -> Self {
        Self { length: 1 }
    }
}

/// Source with no input: overwrites channel 0 with the burst.
pub struct ImpulseNode {
    generator: ImpulseGenerator,
}

impl ImpulseNode {
    pub const NAME: &'static str = "impulse";

    pub fn new(config: ImpulseConfig) -> Self {
        let mut node = Self {
            generator: ImpulseGenerator::new(1),
        };
        node.set_parameter(Param::Length, config.length as f32);
        node
    }

    pub fn length(&self) -> u32 {
        self.generator.length()
    }

    pub fn is_active(&self) -> bool {
        self.generator.is_active()
    }
}

impl EffectNode for ImpulseNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::new(0, 1)
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        check_sample_rate(sample_rate).map(|_| ())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.generator.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Length => {
                let length = if value >= 1.0 {
                    value.round() as u32
                } else {
                    warn!(
                        effect = Self::NAME,
                        requested = value,
                        "impulse length must be at least 1, set to 1"
                    );
                    1
                };
                self.generator.set_length(length);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.generator.trigger();
    }

    fn reset(&mut self) {
        self.generator.reset();
    }
}
