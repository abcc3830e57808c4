use std::f32::consts::PI;
use log::warn;
#[derive(Clone, Copy, Debug)]
struct BiquadCoeffs {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
}
#[derive(Clone, Copy, Debug, Default)]
struct BiquadState {
    z1: f32,
    z2: f32,
}
#[derive(Clone, Copy, Debug)]
struct BiquadFilter {
    coeffs: BiquadCoeffs,
    state: BiquadState,
}
impl BiquadFilter {
    fn new(coeffs: BiquadCoeffs) -> Self {
        Self {
            coeffs,
            state: BiquadState::default(),
        }
    }
    fn process(&mut self, input: f32) -> f32 {
        // Transposed direct form II
        let y = self.coeffs.b0 * input + self.state.z1;
        self.state.z1 = self.coeffs.b1 * input - self.coeffs.a1 * y + self.state.z2;
        self.state.z2 = self.coeffs.b2 * input - self.coeffs.a2 * y;
        y
    }
}
/// Band-pass the signal to suppress baseline wander and T-wave energy
/// before peak detection.
///
/// Returns `None` when the filtered output is not finite; callers are
/// expected to fall back to the raw signal in that case.
pub fn bandpass_filter(
    voltages: &[f32],
    sample_rate_hz: f32,
    low_hz: f32,
    high_hz: f32,
) -> Option<Vec<f32>> {
    if sample_rate_hz <= 0.0 || voltages.is_empty() {
        return None;
    }
    let nyquist = sample_rate_hz * 0.5;
    let (low, high) = band_edges(low_hz, high_hz, nyquist);
    if high - low < f32::EPSILON {
        return None;
    }
    let center = (low * high).sqrt();
    let q = (center / (high - low)).clamp(0.1, 100.0);
    let mut section = BiquadFilter::new(bandpass(center, sample_rate_hz, q));
    let filtered: Vec<f32> = voltages.iter().map(|&v| section.process(v)).collect();
    if filtered.iter().any(|v| !v.is_finite()) {
        warn!("band-pass output is not finite; falling back to the raw signal");
        return None;
    }
    Some(filtered)
}
fn nyquist_clamp(freq_hz: f32, nyquist: f32) -> f32 {
    freq_hz.clamp(0.01, nyquist - 0.01)
}
fn band_edges(low_hz: f32, high_hz: f32, nyquist: f32) -> (f32, f32) {
    let low = nyquist_clamp(low_hz.min(high_hz), nyquist);
    let high = nyquist_clamp(low_hz.max(high_hz), nyquist);
    (low, high)
}
fn bandpass(center_hz: f32, sample_rate_hz: f32, q: f32) -> BiquadCoeffs {
    let w0 = 2.0 * PI * center_hz / sample_rate_hz;
    let alpha = (w0 / 2.0).sin() / (2.0 * q);
    let cos_w0 = w0.cos();
    let sin_w0 = w0.sin();
    let b0 = sin_w0 / 2.0 / q;
    let b1 = 0.0;
    let b2 = -b0;
    let a0 = 1.0 + alpha;
    let a1 = -2.0 * cos_w0;
    let a2 = 1.0 - alpha;
    normalize(b0, b1, b2, a0, a1, a2)
}
fn normalize(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> BiquadCoeffs {
    let a0_inv = 1.0 / a0;
    BiquadCoeffs {
        b0: b0 * a0_inv,
        b1: b1 * a0_inv,
        b2: b2 * a0_inv,
        a1: a1 * a0_inv,
        a2: a2 * a0_inv,
    }
}
