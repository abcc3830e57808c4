use std::f32::consts::PI;
use crate::error::SignalError;
use crate::types::Sample;
/// Shape used for one synthetic heartbeat.
///
/// Both profiles approximate the same PQRST morphology; they are
/// interchangeable parameterizations, not distinct features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveProfile {
    /// Five time-shifted Gaussian pulses per beat (P, Q, R, S, T).
    MultiGaussian,
    /// Sinusoidal P/T waves with exponential QRS deflections, designed
    /// around a one-second beat and rescaled to the requested rate.
    SineExponential,
}
impl Default for WaveProfile {
    fn default() -> Self {
        WaveProfile::MultiGaussian
    }
}
/// Generate a deterministic synthetic ECG trace.
///
/// Beats are `60 / heart_rate_bpm` seconds long. The output covers
/// `duration_secs` at `sample_rate_hz`; a non-positive duration yields an
/// empty trace.
pub fn synthesize(
    profile: WaveProfile,
    duration_secs: f32,
    sample_rate_hz: f32,
    heart_rate_bpm: f32,
) -> Result<Vec<Sample>, SignalError> {
    if !(heart_rate_bpm > 0.0) {
        return Err(SignalError::InvalidParameter(
            "heart rate must be greater than zero",
        ));
    }
    if !(sample_rate_hz > 0.0) {
        return Err(SignalError::InvalidParameter(
            "sample rate must be greater than zero",
        ));
    }
    if duration_secs <= 0.0 {
        return Ok(Vec::new());
    }
    let beat_secs = 60.0 / heart_rate_bpm;
    let count = (duration_secs * sample_rate_hz) as usize;
    let dt = 1.0 / sample_rate_hz;
    let mut samples: Vec<Sample> = (0..count)
        .map(|i| Sample::new(i as f32 * dt, 0.0))
        .collect();
    match profile {
        WaveProfile::MultiGaussian => {
            let mut beat_start = 0.0f32;
            while beat_start < duration_secs {
                for sample in &mut samples {
                    sample.voltage += gaussian_beat(sample.time, beat_start);
                }
                beat_start += beat_secs;
            }
        }
        WaveProfile::SineExponential => {
            for sample in &mut samples {
                // Normalize beat-local time onto the one-second shape.
                let u = (sample.time % beat_secs) / beat_secs;
                sample.voltage = sine_exponential_beat(u);
            }
        }
    }
    Ok(samples)
}
fn gaussian_beat(t: f32, beat_start: f32) -> f32 {
    gaussian(t, 0.25, beat_start + 0.10, 0.01)
        + gaussian(t, -0.10, beat_start + 0.20, 0.005)
        + gaussian(t, 1.0, beat_start + 0.22, 0.01)
        + gaussian(t, -0.25, beat_start + 0.24, 0.005)
        + gaussian(t, 0.5, beat_start + 0.35, 0.02)
}
fn gaussian(t: f32, amplitude: f32, center: f32, sigma: f32) -> f32 {
    let delta = t - center;
    amplitude * (-(delta * delta) / (2.0 * sigma * sigma)).exp()
}
fn sine_exponential_beat(u: f32) -> f32 {
    let p = 0.1 * (2.0 * PI * u).sin();
    let q = -1.5 * (-((u - 0.3) * (u - 0.3)) / 0.002).exp();
    let r = 3.0 * (-((u - 0.4) * (u - 0.4)) / 0.001).exp();
    let s = -0.8 * (-((u - 0.5) * (u - 0.5)) / 0.002).exp();
    let t = if u > 0.6 {
        0.3 * (2.0 * PI * 0.5 * (u - 0.6)).sin()
    } else {
        0.0
    };
    p + q + r + s + t
}
