use tracing::warn;

use super::param::Param;
use crate::dsp::biquad::FilterType;
use crate::error::DspError;

/// Channel counts an effect reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub inputs: usize,
    pub outputs: usize,
}

impl ChannelLayout {
    pub const MONO: Self = Self::new(1, 1);
    pub const STEREO: Self = Self::new(2, 2);

    pub const fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// Buffers a host has to pass to `process`.
    pub fn channels(&self) -> usize {
        self.inputs.max(self.outputs)
    }
}

/// Core trait for block-processing effects.
///
/// Processing is in place: inputs are read from the leading channels and
/// outputs overwrite them. Parameter setters never fail; out-of-range values
/// are clamped and logged.
pub trait EffectNode: Send {
    /// Host name of the effect, e.g. `"comblp"`.
    fn name(&self) -> &'static str;

    fn layout(&self) -> ChannelLayout;

    /// Adapt to a (possibly new) sample rate. Delay buffers are reallocated
    /// only when the rate actually changes; on failure the previous state is
    /// kept.
    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError>;

    /// Process one block. Every channel slice should be the same length; the
    /// shortest one sets the block size.
    fn process(&mut self, channels: &mut [&mut [f32]]);

    fn set_parameter(&mut self, param: Param, value: f32);

    /// Select a filter response. Effects without one log and ignore it.
    fn set_filter_type(&mut self, filter_type: FilterType) {
        warn!(
            effect = self.name(),
            filter_type = filter_type.name(),
            "effect has no filter type"
        );
    }

    /// Zero delay lines and filter memory, or start a burst.
    fn trigger(&mut self);

    fn reset(&mut self);

    fn set_parameter_by_name(&mut self, name: &str, value: f32) {
        match name.parse::<Param>() {
            Ok(param) => self.set_parameter(param, value),
            Err(_) => warn!(effect = self.name(), name, "unknown parameter ignored"),
        }
    }

    /// Unrecognised names fall back to lowpass.
    fn set_type(&mut self, name: &str) {
        self.set_filter_type(FilterType::from_name(name));
    }
}

/// Allow boxed effects to be used as effects (for dynamic dispatch)
impl EffectNode for Box<dyn EffectNode> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn layout(&self) -> ChannelLayout {
        (**self).layout()
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        (**self).prepare(sample_rate)
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        (**self).process(channels)
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        (**self).set_parameter(param, value)
    }

    fn set_filter_type(&mut self, filter_type: FilterType) {
        (**self).set_filter_type(filter_type)
    }

    fn trigger(&mut self) {
        (**self).trigger()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

pub(crate) fn unsupported(effect: &'static str, param: Param, value: f32) {
    warn!(effect, param = param.name(), value, "parameter not supported by this effect");
}

/// Clamp `value` to `[lo, hi]`, logging when it had to move.
pub(crate) fn clamp_logged(effect: &'static str, param: Param, value: f32, lo: f32, hi: f32) -> f32 {
    let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    note_adjusted(effect, param, value, clamped);
    clamped
}

/// Log when a setter applied something other than what was asked for.
pub(crate) fn note_adjusted(effect: &'static str, param: Param, requested: f32, applied: f32) {
    if requested != applied {
        warn!(
            effect,
            param = param.name(),
            requested,
            applied,
            "parameter out of range, clamped"
        );
    }
}

#[inline]
pub(crate) fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Length of the shortest channel among the first `count`.
#[inline]
pub(crate) fn block_len(channels: &[&mut [f32]], count: usize) -> usize {
    channels
        .iter()
        .take(count)
        .map(|c| c.len())
        .min()
        .unwrap_or(0)
}
