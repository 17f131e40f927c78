//! Effect nodes: the DSP primitives wrapped behind one block-processing
//! interface, with parameter sanitising, logging and a factory.

pub mod biquad;
pub mod comb;
#[cfg(feature = "rtrb")]
pub mod control;
pub mod delay;
pub mod factory;
pub mod follower;
pub mod impulse;
pub mod modulation;
pub mod node;
pub mod param;
pub mod svf;

pub use biquad::{BiquadConfig, BiquadEngineConfig, BiquadEngineNode, BiquadNode};
pub use comb::{
    AllpassConfig, AllpassNode, CombConfig, CombLowpassConfig, CombLowpassNode, CombNode,
};
#[cfg(feature = "rtrb")]
pub use control::{ControlMessage, EffectHandle, SharedEffect};
pub use delay::{DelayConfig, DelayNode};
pub use factory::{create, EffectSpec};
pub use follower::{PeakConfig, PeakNode, RmsConfig, RmsNode};
pub use impulse::{ImpulseConfig, ImpulseNode};
pub use modulation::{ChorusConfig, ChorusNode, VibratoConfig, VibratoNode};
pub use node::{ChannelLayout, EffectNode};
pub use param::Param;
pub use svf::{SvfConfig, SvfNode};
