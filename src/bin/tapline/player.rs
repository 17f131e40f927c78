//! Player - builds the effect chain and drives the output stream

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use tapline::{
    effects::{ImpulseConfig, ImpulseNode, SharedEffect},
    EffectNode, EffectSpec, MAX_BLOCK_SIZE,
};

const RETRIGGER_INTERVAL: Duration = Duration::from_millis(500);

pub struct Player {
    spec: EffectSpec,
    settings: Vec<(String, String)>,
}

impl Player {
    pub fn new(spec: EffectSpec, settings: Vec<(String, String)>) -> Self {
        Self { spec, settings }
    }

    fn build_effect(&self, sample_rate: f32) -> EyreResult<Box<dyn EffectNode>> {
        let mut effect = self
            .spec
            .build(sample_rate)
            .wrap_err_with(|| format!("failed to build {}", self.spec.name()))?;

        for (key, value) in &self.settings {
            if key == "type" {
                effect.set_type(value);
                continue;
            }
            let value: f32 = value
                .parse()
                .wrap_err_with(|| format!("{key}: {value:?} is not a number"))?;
            effect.set_parameter_by_name(key, value);
        }
        Ok(effect)
    }

    /// Run until interrupted.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let device_channels = config.channels() as usize;

        let mut effect = self.build_effect(sample_rate)?;
        let layout = effect.layout();
        let (mut source, mut handle) = SharedEffect::new(ImpulseNode::new(ImpulseConfig::default()));

        info!(
            effect = effect.name(),
            sample_rate,
            inputs = layout.inputs,
            outputs = layout.outputs,
            "playing, press Ctrl+C to stop"
        );

        // Enough scratch for the widest effect (svf: 1 in, 3 out).
        let mut scratch = [
            vec![0.0f32; MAX_BLOCK_SIZE],
            vec![0.0f32; MAX_BLOCK_SIZE],
            vec![0.0f32; MAX_BLOCK_SIZE],
        ];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / device_channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let n = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let [a, b, c] = &mut scratch;

                    source.process(&mut [&mut a[..n]]);
                    b[..n].copy_from_slice(&a[..n]);
                    c[..n].fill(0.0);

                    effect.process(&mut [&mut a[..n], &mut b[..n], &mut c[..n]]);

                    // Stereo effects keep their sides; everything else plays
                    // its last output on every channel.
                    let outputs = [&a[..n], &b[..n], &c[..n]];
                    let out_off = frames_written * device_channels;
                    for i in 0..n {
                        for ch in 0..device_channels {
                            let out = if layout.outputs == 2 {
                                outputs[ch.min(1)]
                            } else {
                                outputs[layout.outputs.saturating_sub(1)]
                            };
                            data[out_off + i * device_channels + ch] = out[i];
                        }
                    }

                    frames_written += n;
                }
            },
            |err| error!(%err, "audio stream error"),
            None,
        )?;

        stream.play()?;

        loop {
            handle.trigger();
            std::thread::sleep(RETRIGGER_INTERVAL);
        }
    }
}
