#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::node::{clamp_logged, unsupported, ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::biquad::{
    Biquad, BiquadCoefficients, CoefficientBank, FilterType, MAX_FREQUENCY, MAX_RESONANCE,
    MIN_FREQUENCY, MIN_RESONANCE,
};
use crate::error::{check_sample_rate, DspError};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct BiquadConfig {
    pub frequency: f32,
    pub resonance: f32,
    pub filter_type: FilterType,
}

impl Default for BiquadConfig {
    fn default() -> Self {
        Self {
            frequency: 300.0,
            resonance: 0.707,
            filter_type: FilterType::LowPass,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiquadEngineConfig {
    pub coefficients: BiquadCoefficients,
}

/// Biquad filter designed from frequency, resonance and type.
///
/// Parameter changes only stage a new coefficient set; it is swapped in at
/// the start of the next `process` call, so a block never runs on a mix of
/// old and new coefficients.
pub struct BiquadNode {
    filter: Biquad,
    bank: CoefficientBank,
    filter_type: FilterType,
    frequency: f32,
    resonance: f32,
    sample_rate: f32,
}

impl BiquadNode {
    pub const NAME: &'static str = "biquad";

    pub fn new(sample_rate: f32, config: BiquadConfig) -> Result<Self, DspError> {
        let sample_rate = check_sample_rate(sample_rate)?;
        let frequency = clamp_logged(
            Self::NAME,
            Param::Frequency,
            config.frequency,
            MIN_FREQUENCY,
            MAX_FREQUENCY,
        );
        let resonance = clamp_logged(
            Self::NAME,
            Param::Resonance,
            config.resonance,
            MIN_RESONANCE,
            MAX_RESONANCE,
        );
        let coeffs =
            BiquadCoefficients::design(config.filter_type, frequency, resonance, sample_rate);

        Ok(Self {
            filter: Biquad::new(coeffs),
            bank: CoefficientBank::new(coeffs),
            filter_type: config.filter_type,
            frequency,
            resonance,
            sample_rate,
        })
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Coefficients the next block will run with.
    pub fn pending_coefficients(&self) -> BiquadCoefficients {
        self.bank.staged()
    }

    /// Coefficients the last block ran with.
    pub fn active_coefficients(&self) -> BiquadCoefficients {
        self.filter.coefficients()
    }

    fn redesign(&mut self) {
        self.bank.stage(BiquadCoefficients::design(
            self.filter_type,
            self.frequency,
            self.resonance,
            self.sample_rate,
        ));
    }
}

impl EffectNode for BiquadNode {
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
            self.redesign();
        }
        Ok(())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(coeffs) = self.bank.commit() {
            self.filter.set_coefficients(coeffs);
        }
        if let Some(buffer) = channels.first_mut() {
            self.filter.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        match param {
            Param::Frequency => {
                self.frequency =
                    clamp_logged(Self::NAME, param, value, MIN_FREQUENCY, MAX_FREQUENCY);
                self.redesign();
            }
            Param::Resonance => {
                self.resonance =
                    clamp_logged(Self::NAME, param, value, MIN_RESONANCE, MAX_RESONANCE);
                self.redesign();
            }
            _ => unsupported(Self::NAME, param, value),
        }
    }

    fn set_filter_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
        self.redesign();
    }

    fn trigger(&mut self) {
        self.filter.reset();
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}

/// Bare direct-form-II section driven by raw coefficients.
///
/// Nothing is checked: unstable coefficient sets are the caller's business.
pub struct BiquadEngineNode {
    filter: Biquad,
    bank: CoefficientBank,
}

impl BiquadEngineNode {
    pub const NAME: &'static str = "biquad_engine";

    pub fn new(config: BiquadEngineConfig) -> Self {
        Self {
            filter: Biquad::new(config.coefficients),
            bank: CoefficientBank::new(config.coefficients),
        }
    }

    /// Stage a complete set at once.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.bank.stage(coeffs);
    }

    pub fn pending_coefficients(&self) -> BiquadCoefficients {
        self.bank.staged()
    }
}

impl EffectNode for BiquadEngineNode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn layout(&self) -> ChannelLayout {
        ChannelLayout::MONO
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        check_sample_rate(sample_rate).map(|_| ())
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        if let Some(coeffs) = self.bank.commit() {
            self.filter.set_coefficients(coeffs);
        }
        if let Some(buffer) = channels.first_mut() {
            self.filter.render(buffer);
        }
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        let mut coeffs = self.bank.staged();
        match param {
            Param::B0 => coeffs.b0 = value,
            Param::B1 => coeffs.b1 = value,
            Param::B2 => coeffs.b2 = value,
            Param::A1 => coeffs.a1 = value,
            Param::A2 => coeffs.a2 = value,
            _ => return unsupported(Self::NAME, param, value),
        }
        self.bank.stage(coeffs);
    }

    fn trigger(&mut self) {
        self.filter.reset();
    }

    fn reset(&mut self) {
        self.filter.reset();
    }
}
