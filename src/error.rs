use std::collections::TryReserveError;

/// Errors raised while preparing or constructing effects.
///
/// Parameter changes never fail: out-of-range values are clamped and logged.
/// Only allocation (on construction or sample-rate change) and name lookups
/// can return an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DspError {
    /// A delay buffer of `samples` could not be allocated. The previous buffer
    /// is left in place.
    Allocation {
        samples: usize,
        source: TryReserveError,
    },
    /// Sample rate was zero, negative or not finite.
    InvalidSampleRate(f32),
    /// No effect is registered under this name.
    UnknownEffect(String),
    /// No parameter is known by this name.
    UnknownParameter(String),
}

impl DspError {
    pub(crate) fn allocation(samples: usize, source: TryReserveError) -> Self {
        DspError::Allocation { samples, source }
    }
}

impl std::fmt::Display for DspError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DspError::Allocation { samples, .. } => {
                write!(f, "cannot allocate a delay line of {} samples", samples)
            }
            DspError::InvalidSampleRate(sr) => write!(f, "invalid sample rate: {}", sr),
            DspError::UnknownEffect(name) => write!(f, "unknown effect: {}", name),
            DspError::UnknownParameter(name) => write!(f, "unknown parameter: {}", name),
        }
    }
}

impl std::error::Error for DspError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DspError::Allocation { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Reject sample rates the delay-length and coefficient math cannot use.
pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, DspError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(DspError::InvalidSampleRate(sample_rate))
    }
}
