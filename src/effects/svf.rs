#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::{clamp_logged, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::svf::{
    StateVariableFilter, Unstable, MAX_FREQUENCY, MAX_RESONANCE, MIN_FREQUENCY, MIN_RESONANCE,
};
use crate::error::{check_sample_rate, DspError};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SvfConfig {
    pub frequency: f32,
    pub resonance: f32,
}

impl Default for SvfConfig {
    fn default() -> Self {
        Self {
            frequency: 300.0,
            resonance: 0.707,
        }
    }
}

/// State-variable filter with three outputs: channel 0 carries the input in
/// and the highpass out, channels 1 and 2 receive bandpass and lowpass.
pub struct SvfNode {
    svf: StateVariableFilter,
    sample_rate: f32,
}

impl SvfNode {
    pub const NAME: &'static str = "svf";

    pub fn new(sample_rate: f32, config: SvfConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let mut node = Self {
            svf: StateVariableFilter::new(sample_rate, MIN_FREQUENCY, 1.0),
            sample_rate,
        };
        node.set_parameter(Param::Resonance, config.resonance);
        node.set_parameter(Param::Frequency, config.frequency);
        Ok(node)
    }

    pub fn filter(&self) -> &StateVariableFilter {
        &self.svf
    }

    fn rejected(param: Param, requested: f32, err: Unstable) {
        warn!(
            effect = Self::NAME,
            param = param.name(),
            requested,
            f1 = err.f1,
            limit = err.limit,
            "change rejected, filter would be unstable"
        );
    }
}

impl EffectNode for SvfNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::new(1, 3)
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        if sample_rate != self.sample_rate {
            self.sample_rate = sample_rate;
            if let Err(err) = self.svf.set_sample_rate(sample_rate) {
                Self::rejected(Param::Frequency, self.svf.frequency(), err);
            }
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let [io, bandpass, lowpass, ..] = channels {
            self.svf.render(io, bandpass, lowpass);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Frequency => {
                let fc = clamp_logged(Self::NAME, param, value, MIN_FREQUENCY, MAX_FREQUENCY);
                if let Err(err) = self.svf.set_frequency(fc) {
                    Self::rejected(param, fc, err);
                }
            }
            Param::Resonance => {
                let res = clamp_logged(Self::NAME, param, value, MIN_RESONANCE, MAX_RESONANCE);
                if let Err(err) = self.svf.set_resonance(res) {
                    Self::rejected(param, res, err);
                }
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn trigger(&mut self) {
        self.svf.reset();
    }

    fn reset(&mut self) {
        self.svf.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_three_responses() {
        let mut node = SvfNode::new(48_000.0, SvfConfig::default()).unwrap();
        let mut io = vec![1.0; 4096];
        let mut bp = vec![0.0; 4096];
        let mut lp = vec![0.0; 4096];
        node.process(&mut [io.as_mut_slice(), bp.as_mut_slice(), lp.as_mut_slice()]);

        assert!((lp[4095] - 1.0).abs() < 1e-3);
        assert!(io[4095].abs() < 1e-3);
        assert!(bp.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn too_few_channels_is_a_no_op() {
        let mut node = SvfNode::new(48_000.0, SvfConfig::default()).unwrap();
        let mut io = vec![1.0; 16];
        node.process(&mut [io.as_mut_slice()]);
        assert!(io.iter().all(|&x| x == 1.0));
    }

    #[test]
    fn unstable_frequency_leaves_filter_untouched() {
        let config = SvfConfig {
            frequency: 1_000.0,
            resonance: 50.0,
        };
        let mut node = SvfNode::new(40_000.0, config).unwrap();
        let f1 = node.filter().f1();

        node.set_parameter(Param::Frequency, 20_000.0);
        assert_eq!(node.filter().f1(), f1);
        assert_eq!(node.filter().frequency(), 1_000.0);
    }

    #[test]
    fn reset_zeroes_integrators() {
        let mut node = SvfNode::new(48_000.0, SvfConfig::default()).unwrap();
        let mut io = vec![1.0; 64];
        let mut bp = vec![0.0; 64];
        let mut lp = vec![0.0; 64];
        node.process(&mut [io.as_mut_slice(), bp.as_mut_slice(), lp.as_mut_slice()]);
        node.reset();

        let mut io = vec![0.0; 8];
        let mut bp = vec![0.0; 8];
        let mut lp = vec![0.0; 8];
        node.process(&mut [io.as_mut_slice(), bp.as_mut_slice(), lp.as_mut_slice()]);
        assert!(lp.iter().chain(bp.iter()).chain(io.iter()).all(|&x| x == 0.0));
    }
}
