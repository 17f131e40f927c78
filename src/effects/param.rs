use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::DspError;

/// Scalar controls understood by the effects.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    /// Delay length in ms
    DelayTime,
    /// Loop gain g (g1 for the lowpass comb)
    Feedback,
    /// Lowpass gain inside the comb loop
    G2,
    /// Allpass gain
    Gain,
    /// Cutoff or LFO rate in Hz
    Frequency,
    Resonance,
    /// Modulation depth in ms
    Depth,
    #[cfg_attr(feature = "serde", serde(rename = "depth_l"))]
    DepthLeft,
    #[cfg_attr(feature = "serde", serde(rename = "depth_r"))]
    DepthRight,
    /// Wet share in percent
    DryWet,
    Attack,
    Release,
    /// RMS averaging time in ms
    Time,
    /// Impulse burst length in samples
    Length,
    B0,
    B1,
    B2,
    A1,
    A2,
}

impl Param {
    pub fn name(&self) -> &'static str {
        match self {
            Param::DelayTime => "delaytime",
            Param::Feedback => "feedback",
            Param::G2 => "g2",
            Param::Gain => "gain",
            Param::Frequency => "frequency",
            Param::Resonance => "resonance",
            Param::Depth => "depth",
            Param::DepthLeft => "depth_l",
            Param::DepthRight => "depth_r",
            Param::DryWet => "drywet",
            Param::Attack => "attack",
            Param::Release => "release",
            Param::Time => "time",
            Param::Length => "length",
            Param::B0 => "b0",
            Param::B1 => "b1",
            Param::B2 => "b2",
            Param::A1 => "a1",
            Param::A2 => "a2",
        }
    }
}

impl FromStr for Param {
    type Err = DspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let param = match s.trim().to_ascii_lowercase().as_str() {
            "delaytime" | "delay" => Param::DelayTime,
            "feedback" | "g1" => Param::Feedback,
            "g2" => Param::G2,
            "gain" => Param::Gain,
            "frequency" | "freq" => Param::Frequency,
            "resonance" | "q" => Param::Resonance,
            "depth" => Param::Depth,
            "depth_l" => Param::DepthLeft,
            "depth_r" => Param::DepthRight,
            "drywet" => Param::DryWet,
            "attack" => Param::Attack,
            "release" => Param::Release,
            "time" => Param::Time,
            "length" => Param::Length,
            "b0" => Param::B0,
            "b1" => Param::B1,
            "b2" => Param::B2,
            "a1" => Param::A1,
            "a2" => Param::A2,
            _ => return Err(DspError::UnknownParameter(s.to_string())),
        };
        Ok(param)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
