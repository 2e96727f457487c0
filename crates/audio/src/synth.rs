//! Offline synthesis of the show's sound cues.

use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};
use kira::Frame;
use rand::Rng;
use std::f32::consts::TAU;

pub const SAMPLE_RATE: u32 = 44_100;

const LAUNCH_SECONDS: f32 = 0.5;
const LAUNCH_FREQ: (f32, f32) = (100.0, 1200.0);
const LAUNCH_GAIN: (f32, f32) = (0.04, 0.001);

const NOISE_SECONDS: f32 = 0.5;
const NOISE_CUTOFF_HZ: f32 = 1000.0;
const NOISE_GAIN: (f32, f32) = (0.3, 0.01);
const THUMP_SECONDS: f32 = 0.3;
const THUMP_HZ: f32 = 60.0;
const THUMP_GAIN: f32 = 0.2;

/// `from * (to / from)^t` for `t` in 0..=1.
fn exp_ramp((from, to): (f32, f32), t: f32) -> f32 {
    from * (to / from).powf(t)
}

fn sample_count(seconds: f32, rate: u32) -> usize {
    (seconds * rate as f32).round() as usize
}

/// Rising sawtooth whistle: an exponential pitch sweep under an exponential fade.
pub fn launch_samples(rate: u32) -> Vec<f32> {
    let n = sample_count(LAUNCH_SECONDS, rate);
    let mut phase = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            let saw = 2.0 * phase - 1.0;
            phase = (phase + exp_ramp(LAUNCH_FREQ, t) / rate as f32).fract();
            saw * exp_ramp(LAUNCH_GAIN, t)
        })
        .collect()
}

/// Low-passed noise crack over a short low sine thump.
pub fn explosion_samples(rate: u32, rng: &mut impl Rng) -> Vec<f32> {
    let n = sample_count(NOISE_SECONDS, rate);
    let thump = sample_count(THUMP_SECONDS, rate);
    // One-pole low-pass coefficient for the cutoff.
    let alpha = 1.0 - (-TAU * NOISE_CUTOFF_HZ / rate as f32).exp();
    let mut lowpassed = 0.0_f32;
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32;
            lowpassed += alpha * (rng.gen_range(-1.0..1.0) - lowpassed);
            let mut s = lowpassed * exp_ramp(NOISE_GAIN, t);
            if i < thump {
                s += (TAU * THUMP_HZ * i as f32 / rate as f32).sin() * THUMP_GAIN;
            }
            s
        })
        .collect()
}

/// Wrap mono samples as playable sound data, duplicated to both channels.
pub fn sound_data(samples: &[f32], rate: u32) -> StaticSoundData {
    StaticSoundData {
        sample_rate: rate,
        frames: samples.iter().map(|&s| Frame::from_mono(s)).collect(),
        settings: StaticSoundSettings::default(),
        slice: None,
    }
}
