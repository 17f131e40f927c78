//! tapline - play one effect through the default output device
//!
//! Run with: cargo run --features player -- <effect> [param=value ...]
//!
//! The effect is fed by an impulse retriggered every 500ms, e.g.
//!
//!   tapline comb delaytime=40 feedback=0.8
//!   tapline biquad type=bandpass frequency=800 resonance=8
//!   tapline chorus depth_l=4 depth_r=6 drywet=70

mod player;

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use tapline::EffectSpec;

use player::Player;

fn usage() -> String {
    format!(
        "usage: tapline <effect> [param=value ...]\neffects: {}",
        EffectSpec::NAMES.join(", ")
    )
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let effect = args.next().ok_or_else(|| eyre!(usage()))?;
    let spec = EffectSpec::from_name(&effect).wrap_err_with(usage)?;

    let mut settings = Vec::new();
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| eyre!("expected param=value, got {arg:?}"))?;
        settings.push((key.to_string(), value.to_string()));
    }

    Player::new(spec, settings).run()
}
