//! Test signal generation
//!
//! Standard signals for exercising the tap pipeline: sine tones, silence,
//! white noise, and impulses. All generators produce interleaved buffers
//! with the same signal copied to every channel.

use std::f32::consts::PI;

/// Generate an interleaved sine tone.
///
/// # Arguments
/// * `frequency` - Tone frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `frames` - Number of frames to generate
/// * `amplitude` - Peak amplitude (0.0 to 1.0)
/// * `channels` - Number of interleaved channels
pub fn sine(frequency: f32, sample_rate: u32, frames: usize, amplitude: f32, channels: usize) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency * t).sin() * amplitude;
        for _ in 0..channels {
            samples.push(sample);
        }
    }
    samples
}

/// Generate an interleaved all-zero buffer
pub fn silence(frames: usize, channels: usize) -> Vec<f32> {
    vec![0.0; frames * channels]
}

/// Generate interleaved white noise with the given peak amplitude
pub fn white_noise(frames: usize, amplitude: f32, channels: usize) -> Vec<f32> {
    let mut samples = Vec::with_capacity(frames * channels);
    for _ in 0..frames {
        let sample = (rand::random::<f32>() * 2.0 - 1.0) * amplitude;
        for _ in 0..channels {
            samples.push(sample);
        }
    }
    samples
}

/// Generate an interleaved unit impulse at frame `position`
pub fn impulse(frames: usize, position: usize, channels: usize) -> Vec<f32> {
    let mut samples = vec![0.0; frames * channels];
    if position < frames {
        for ch in 0..channels {
            samples[position * channels + ch] = 1.0;
        }
    }
    samples
}
