#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::node::{note_adjusted, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::envelope::{PeakFollower, RmsFollower};
use crate::error::{check_sample_rate, DspError};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct PeakConfig {
    pub attack_ms: f32,
    pub release_ms: f32,
}

impl Default for PeakConfig {
    fn default() -> Self {
        Self {
            attack_ms: 1.0,
            release_ms: 20.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct RmsConfig {
    pub time_ms: f32,
}

impl Default for RmsConfig {
    fn default() -> Self {
        Self { time_ms: 4.0 }
    }
}

pub struct PeakNode {
    follower: PeakFollower,
    sample_rate: f32,
}

impl PeakNode {
    pub const NAME: &'static str = "peak";

    pub fn new(sample_rate: f32, config: PeakConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut node = Self {
            follower: PeakFollower::new(sample_rate, 0.0, 0.0),
            sample_rate,
        };
        node.set_parameter(Param::Attack, config.attack_ms);
        node.set_parameter(Param::Release, config.release_ms);
        Ok(node)
    }

    pub fn follower(&self) -> &PeakFollower {
        &self.follower
    }
}

impl EffectNode for PeakNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.follower.set_sample_rate(sample_rate);
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.follower.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Attack => {
                let applied = self.follower.set_attack(value);
                note_adjusted(Self::NAME, param, value, applied);
            }
            Param::Release => {
                let applied = self.follower.set_release(value);
                note_adjusted(Self::NAME, param, value, applied);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.follower.reset();
    }

    fn reset(&mut self) {
        self.follower.reset();
    }
}

pub struct RmsNode {
    follower: RmsFollower,
    sample_rate: f32,
}

impl RmsNode {
    pub const NAME: &'static str = "rms";

    pub fn new(sample_rate: f32, config: RmsConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut node = Self {
            follower: RmsFollower::new(sample_rate, 0.0),
            sample_rate,
        };
        node.set_parameter(Param::Time, config.time_ms);
        Ok(node)
    }

    pub fn follower(&self) -> &RmsFollower {
        &self.follower
    }
}

impl EffectNode for RmsNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            self.follower.set_sample_rate(sample_rate);
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(buffer) = channels.first_mut() {
            self.follower.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Time => {
                let applied = self.follower.set_time(value);
                note_adjusted(Self::NAME, param, value, applied);
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.follower.reset();
    }

    fn reset(&mut self) {
        self.follower.reset();
    }
}
