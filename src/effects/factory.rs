#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::biquad::{BiquadConfig, BiquadEngineConfig, BiquadEngineNode, BiquadNode};
use super::comb::{
    AllpassConfig, AllpassNode, CombConfig, CombLowpassConfig, CombLowpassNode, CombNode,
};
use super::delay::{DelayConfig, DelayNode};
use super::follower::{PeakConfig, PeakNode, RmsConfig, RmsNode};
use super::impulse::{ImpulseConfig, ImpulseNode};
use super::modulation::{ChorusConfig, ChorusNode, VibratoConfig, VibratoNode};
use super::node::EffectNode;
use super::svf::{SvfConfig, SvfNode};
use crate::error::DspError;

/// Creation arguments for any effect.
///
/// Every `build` returns a fresh, independent instance.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effect", rename_all = "snake_case"))]
#[derive(Debug, Clone, PartialEq)]
pub enum EffectSpec {
    Delay(DelayConfig),
    Comb(CombConfig),
    #[cfg_attr(feature = "serde", serde(rename = "comblp"))]
    CombLowpass(CombLowpassConfig),
    Allpass(AllpassConfig),
    Biquad(BiquadConfig),
    BiquadEngine(BiquadEngineConfig),
    Svf(SvfConfig),
    Vibrato(VibratoConfig),
    Chorus(ChorusConfig),
    Peak(PeakConfig),
    Rms(RmsConfig),
    Impulse(ImpulseConfig),
}

impl EffectSpec {
    /// Every name [`from_name`](Self::from_name) accepts.
    pub const NAMES: [&'static str; 12] = [
        DelayNode::NAME,
        CombNode::NAME,
        CombLowpassNode::NAME,
        AllpassNode::NAME,
        BiquadNode::NAME,
        BiquadEngineNode::NAME,
        SvfNode::NAME,
        VibratoNode::NAME,
        ChorusNode::NAME,
        PeakNode::NAME,
        RmsNode::NAME,
        ImpulseNode::NAME,
    ];

    /// Default configuration for the named effect.
    pub fn from_name(name: &str) -> Result<Self, DspError> {
        let spec = match name.trim().to_ascii_lowercase().as_str() {
            DelayNode::NAME => EffectSpec::Delay(DelayConfig::default()),
            CombNode::NAME => EffectSpec::Comb(CombConfig::default()),
            CombLowpassNode::NAME => EffectSpec::CombLowpass(CombLowpassConfig::default()),
            AllpassNode::NAME => EffectSpec::Allpass(AllpassConfig::default()),
            BiquadNode::NAME => EffectSpec::Biquad(BiquadConfig::default()),
            BiquadEngineNode::NAME => EffectSpec::BiquadEngine(BiquadEngineConfig::default()),
            SvfNode::NAME => EffectSpec::Svf(SvfConfig::default()),
            VibratoNode::NAME => EffectSpec::Vibrato(VibratoConfig::default()),
            ChorusNode::NAME => EffectSpec::Chorus(ChorusConfig::default()),
            PeakNode::NAME => EffectSpec::Peak(PeakConfig::default()),
            RmsNode::NAME => EffectSpec::Rms(RmsConfig::default()),
            ImpulseNode::NAME => EffectSpec::Impulse(ImpulseConfig::default()),
            _ => return Err(DspError::UnknownEffect(name.to_string())),
        };
        Ok(spec)
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectSpec::Delay(_) => DelayNode::NAME,
            EffectSpec::Comb(_) => CombNode::NAME,
            EffectSpec::CombLowpass(_) => CombLowpassNode::NAME,
            EffectSpec::Allpass(_) => AllpassNode::NAME,
            EffectSpec::Biquad(_) => BiquadNode::NAME,
            EffectSpec::BiquadEngine(_) => BiquadEngineNode::NAME,
            EffectSpec::Svf(_) => SvfNode::NAME,
            EffectSpec::Vibrato(_) => VibratoNode::NAME,
            EffectSpec::Chorus(_) => ChorusNode::NAME,
            EffectSpec::Peak(_) => PeakNode::NAME,
            EffectSpec::Rms(_) => RmsNode::NAME,
            EffectSpec::Impulse(_) => ImpulseNode::NAME,
        }
    }

    /// Construct the effect, allocating its delay lines for `sample_rate`.
    pub fn build(&self, sample_rate: f32) -> Result<Box<dyn EffectNode>, DspError> {
        debug!(effect = self.name(), sample_rate, "building effect");

        let node: Box<dyn EffectNode> = match self.clone() {
            EffectSpec::Delay(c) => Box::new(DelayNode::new(sample_rate, c)?),
            EffectSpec::Comb(c) => Box::new(CombNode::new(sample_rate, c)?),
            EffectSpec::CombLowpass(c) => Box::new(CombLowpassNode::new(sample_rate, c)?),
            EffectSpec::Allpass(c) => Box::new(AllpassNode::new(sample_rate, c)?),
            EffectSpec::Biquad(c) => Box::new(BiquadNode::new(sample_rate, c)?),
            EffectSpec::BiquadEngine(c) => {
                let mut node = BiquadEngineNode::new(c);
                node.prepare(sample_rate)?;
                Box::new(node)
            }
            EffectSpec::Svf(c) => Box::new(SvfNode::new(sample_rate, c)?),
            EffectSpec::Vibrato(c) => Box::new(VibratoNode::new(sample_rate, c)?),
            EffectSpec::Chorus(c) => Box::new(ChorusNode::new(sample_rate, c)?),
            EffectSpec::Peak(c) => Box::new(PeakNode::new(sample_rate, c)?),
            EffectSpec::Rms(c) => Box::new(RmsNode::new(sample_rate, c)?),
            EffectSpec::Impulse(c) => {
                let mut node = ImpulseNode::new(c);
                node.prepare(sample_rate)?;
                Box::new(node)
            }
        };
        Ok(node)
    }
}

/// Shorthand for `EffectSpec::from_name(name)?.build(sample_rate)`.
pub fn create(name: &str, sample_rate: f32) -> Result<Box<dyn EffectNode>, DspError> {
    EffectSpec::from_name(name)?.build(sample_rate)
}
