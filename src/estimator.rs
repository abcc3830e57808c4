use log::debug;
use serde::Serialize;
/// Physiological plausibility bounds for the estimate.
#[derive(Clone, Copy, Debug)]
pub struct EstimatorConfig {
    /// RR intervals outside this range (seconds) are rejected as outliers.
    pub rr_bounds_secs: (f32, f32),
    /// A computed BPM outside this range is reported as `Invalid`.
    pub bpm_bounds: (u16, u16),
}
impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            rr_bounds_secs: (0.3, 2.0),
            bpm_bounds: (30, 200),
        }
    }
}
/// Rhythm status derived from the estimated rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RhythmClass {
    Bradycardia,
    Normal,
    Tachycardia,
    /// A rate was computed but falls outside the plausible BPM range.
    Invalid,
    /// Not enough plausible RR intervals to estimate anything.
    InsufficientData,
}
/// Heart rate in beats per minute plus its rhythm classification.
///
/// `bpm` is `Some` only for a plausible estimate; `Invalid` and
/// `InsufficientData` never report a number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct HeartRateEstimate {
    pub bpm: Option<u16>,
    pub rhythm: RhythmClass,
}
impl HeartRateEstimate {
    pub fn insufficient_data() -> Self {
        Self {
            bpm: None,
            rhythm: RhythmClass::InsufficientData,
        }
    }
    pub fn is_determined(&self) -> bool {
        self.bpm.is_some()
    }
}
/// Estimate BPM from R-peak timestamps with default bounds.
pub fn estimate(r_peak_times: &[f32]) -> HeartRateEstimate {
    estimate_with(r_peak_times, &EstimatorConfig::default())
}
/// Estimate BPM from ascending R-peak timestamps.
///
/// Consecutive differences form the RR intervals; only intervals inside
/// the plausibility bounds contribute to the mean. Stateless and pure.
pub fn estimate_with(r_peak_times: &[f32], config: &EstimatorConfig) -> HeartRateEstimate {
    let (rr_min, rr_max) = config.rr_bounds_secs;
    let retained: Vec<f32> = r_peak_times
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|rr| (rr_min..=rr_max).contains(rr))
        .collect();
    if retained.is_empty() {
        return HeartRateEstimate::insufficient_data();
    }
    let mean_rr = retained.iter().sum::<f32>() / retained.len() as f32;
    let bpm = (60.0 / mean_rr).round();
    let (bpm_min, bpm_max) = config.bpm_bounds;
    if bpm < bpm_min as f32 || bpm > bpm_max as f32 {
        debug!("estimated {bpm} BPM is outside [{bpm_min}, {bpm_max}]");
        return HeartRateEstimate {
            bpm: None,
            rhythm: RhythmClass::Invalid,
        };
    }
    let bpm = bpm as u16;
    let rhythm = if bpm < 60 {
        RhythmClass::Bradycardia
    } else if bpm <= 100 {
        RhythmClass::Normal
    } else {
        RhythmClass::Tachycardia
    };
    HeartRateEstimate {
        bpm: Some(bpm),
        rhythm,
    }
}
