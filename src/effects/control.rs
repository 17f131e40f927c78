//! Lock-free control plane between a control thread and the audio thread.
//!
//! ```text
//!  control thread                         audio thread
//!  ──────────────                         ────────────
//!  EffectHandle::set(..)  ──► [ rtrb SPSC, 64 slots ] ──►  SharedEffect::process
//!                                                           └ drain queue, then
//!                                                             run the block
//! ```
//!
//! Messages are applied only at the top of `process`, so every block runs on
//! one consistent parameter set.

use rtrb::{Consumer, Producer, RingBuffer};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::node::{ChannelLayout, EffectNode};
use super::param::Param;
use crate::dsp::biquad::FilterType;
use crate::error::DspError;

pub const CONTROL_QUEUE_SIZE: usize = 64;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlMessage {
    Set(Param, f32),
    SetType(FilterType),
    Trigger,
    Reset,
}

/// Control-thread side of a [`SharedEffect`].
pub struct EffectHandle {
    tx: Producer<ControlMessage>,
}

impl EffectHandle {
    /// Queue a message. Returns `false` (and logs) if the queue is full.
    pub fn send(&mut self, msg: ControlMessage) -> bool {
        match self.tx.push(msg) {
            Ok(()) => true,
            Err(_) => {
                warn!(?msg, "control queue full, message dropped");
                false
            }
        }
    }

    pub fn set(&mut self, param: Param, value: f32) -> bool {
        self.send(ControlMessage::Set(param, value))
    }

    pub fn set_by_name(&mut self, name: &str, value: f32) -> Result<bool, DspError> {
        Ok(self.set(name.parse()?, value))
    }

    pub fn set_type(&mut self, filter_type: FilterType) -> bool {
        self.send(ControlMessage::SetType(filter_type))
    }

    pub fn trigger(&mut self) -> bool {
        self.send(ControlMessage::Trigger)
    }

    pub fn reset(&mut self) -> bool {
        self.send(ControlMessage::Reset)
    }

    /// Free slots left in the queue.
    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Audio-thread side: an effect plus the receiving end of its control queue.
pub struct SharedEffect<E: EffectNode> {
    effect: E,
    rx: Consumer<ControlMessage>,
}

impl<E: EffectNode> SharedEffect<E> {
    pub fn new(effect: E) -> (Self, EffectHandle) {
        let (tx, rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE_SIZE);
        (Self { effect, rx }, EffectHandle { tx })
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn into_inner(self) -> E {
        self.effect
    }

    /// Apply every queued message. Called automatically by `process`.
    pub fn drain(&mut self) {
        while let Ok(msg) = self.rx.pop() {
            match msg {
                ControlMessage::Set(param, value) => self.effect.set_parameter(param, value),
                ControlMessage::SetType(filter_type) => self.effect.set_filter_type(filter_type),
                ControlMessage::Trigger => self.effect.trigger(),
                ControlMessage::Reset => self.effect.reset(),
            }
        }
    }
}

impl<E: EffectNode> EffectNode for SharedEffect<E> {
    fn name(&self) -> &'static str {
        self.effect.name()
    }

    fn layout(&self) -> ChannelLayout {
        self.effect.layout()
    }

    fn prepare(&mut self, sample_rate: f32) -> Result<(), DspError> {
        self.effect.prepare(sample_rate)
    }

    fn process(&mut self, channels: &mut [&mut [f32]]) {
        self.drain();
        self.effect.process(channels);
    }

    fn set_parameter(&mut self, param: Param, value: f32) {
        self.effect.set_parameter(param, value);
    }

    fn set_filter_type(&mut self, filter_type: FilterType) {
        self.effect.set_filter_type(filter_type);
    }

    fn trigger(&mut self) {
        self.effect.trigger();
    }

    fn reset(&mut self) {
        self.effect.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::biquad::{BiquadConfig, BiquadNode};
    use crate::effects::impulse::{ImpulseConfig, ImpulseNode};

    #[test]
    fn messages_apply_at_next_block() {
        let node = BiquadNode::new(48_000.0, BiquadConfig::default()).unwrap();
        let (mut shared, mut handle) = SharedEffect::new(node);

        assert!(handle.set(Param::Frequency, 1_000.0));
        assert!(handle.set_type(FilterType::HighPass));
        assert_eq!(shared.effect().frequency(), 300.0);

        let mut buffer = vec![0.0; 32];
        shared.process(&mut [buffer.as_mut_slice()]);

        assert_eq!(shared.effect().frequency(), 1_000.0);
        assert_eq!(shared.effect().filter_type(), FilterType::HighPass);
    }

    #[test]
    fn trigger_crosses_the_queue() {
        let (mut shared, mut handle) = SharedEffect::new(ImpulseNode::new(ImpulseConfig::default()));
        handle.trigger();

        let mut buffer = vec![0.0; 4];
        shared.process(&mut [buffer.as_mut_slice()]);
        assert_eq!(buffer, vec![1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn full_queue_drops_messages() {
        let (_shared, mut handle) = SharedEffect::new(ImpulseNode::new(ImpulseConfig::default()));
        for _ in 0..CONTROL_QUEUE_SIZE {
            assert!(handle.trigger());
        }
        assert_eq!(handle.slots(), 0);
        assert!(!handle.trigger());
    }

    #[test]
    fn set_by_name_rejects_unknown_parameters() {
        let (_shared, mut handle) = SharedEffect::new(ImpulseNode::new(ImpulseConfig::default()));
        assert_eq!(handle.set_by_name("length", 4.0), Ok(true));
        assert!(matches!(
            handle.set_by_name("bogus", 1.0),
            Err(DspError::UnknownParameter(_))
        ));
    }

    #[test]
    fn works_with_boxed_effects() {
        let boxed: Box<dyn EffectNode> = Box::new(ImpulseNode::new(ImpulseConfig { length: 2 }));
        let (mut shared, mut handle) = SharedEffect::new(boxed);
        handle.trigger();

        let mut buffer = vec![0.0; 4];
        shared.process(&mut [buffer.as_mut_slice()]);
        assert_eq!(buffer, vec![1.0, 1.0, 0.0, 0.0]);
    }
}
