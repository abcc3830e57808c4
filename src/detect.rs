use log::debug;
use crate::filter::bandpass_filter;
use crate::types::{ComponentMarks, ComponentPoint, Intervals, Sample};
/// Tunable knobs for R-peak and component detection.
#[derive(Clone, Copy, Debug)]
pub struct DetectorConfig {
    /// Minimum spacing between accepted R peaks, in seconds.
    pub min_distance_secs: f32,
    /// Fixed amplitude threshold in millivolts (unfiltered path).
    pub height_threshold_mv: f32,
    /// `k` in the adaptive `mean + k * std` threshold.
    pub adaptive_k: f32,
    /// Band-pass the window before peak detection. Signal conditioning
    /// only; detection must still work without it.
    pub use_bandpass: bool,
    pub band_low_hz: f32,
    pub band_high_hz: f32,
}
impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_distance_secs: 0.4,
            height_threshold_mv: 0.5,
            adaptive_k: 0.5,
            use_bandpass: false,
            band_low_hz: 5.0,
            band_high_hz: 20.0,
        }
    }
}
/// Result of one detection cycle over an analysis window.
///
/// `r_peaks` are indices into the window that was analyzed. Fewer than two
/// accepted peaks leaves components and intervals fully undetermined.
#[derive(Clone, Debug, Default)]
pub struct Detection {
    pub r_peaks: Vec<usize>,
    pub components: ComponentMarks,
    pub intervals: Intervals,
}
/// One way of locating R peaks in a voltage series.
///
/// `threshold` is an absolute voltage; `min_distance` is in samples.
/// Implementations must return strictly ascending indices no closer than
/// `min_distance` to each other.
pub trait RPeakStrategy {
    fn name(&self) -> &'static str;
    /// Whether this strategy wants the adaptive `mean + k * std` threshold
    /// instead of the fixed height.
    fn prefers_adaptive_threshold(&self) -> bool {
        false
    }
    fn find_r_peaks(&self, voltages: &[f32], threshold: f32, min_distance: usize) -> Vec<usize>;
}
/// Dedicated peak-finding pass: local maxima above the threshold, pruned
/// by descending height so no two accepted peaks violate the separation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeparationPeakFinder;
impl RPeakStrategy for SeparationPeakFinder {
    fn name(&self) -> &'static str {
        "separation-peak-finder"
    }
    fn find_r_peaks(&self, voltages: &[f32], threshold: f32, min_distance: usize) -> Vec<usize> {
        let mut candidates = Vec::new();
        for i in 1..voltages.len().saturating_sub(1) {
            let v = voltages[i];
            if v > threshold && v > voltages[i - 1] && v >= voltages[i + 1] {
                candidates.push(i);
            }
        }
        enforce_min_distance(candidates, voltages, min_distance)
    }
}
/// Threshold-crossing fallback: groups consecutive above-threshold runs
/// and takes each run's maximum as the peak candidate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThresholdGroupingFinder;
impl RPeakStrategy for ThresholdGroupingFinder {
    fn name(&self) -> &'static str {
        "threshold-grouping"
    }
    fn prefers_adaptive_threshold(&self) -> bool {
        true
    }
    fn find_r_peaks(&self, voltages: &[f32], threshold: f32, min_distance: usize) -> Vec<usize> {
        let mut candidates = Vec::new();
        let mut run_best: Option<usize> = None;
        for (i, &v) in voltages.iter().enumerate() {
            if v > threshold {
                run_best = Some(match run_best {
                    Some(best) if voltages[best] >= v => best,
                    _ => i,
                });
            } else if let Some(best) = run_best.take() {
                candidates.push(best);
            }
        }
        if let Some(best) = run_best {
            candidates.push(best);
        }
        enforce_min_distance(candidates, voltages, min_distance)
    }
}
/// Keep the tallest candidates first, dropping any candidate within
/// `min_distance` samples of one already accepted. Returns ascending indices.
fn enforce_min_distance(candidates: Vec<usize>, voltages: &[f32], min_distance: usize) -> Vec<usize> {
    let mut by_height = candidates;
    by_height.sort_by(|&a, &b| voltages[b].total_cmp(&voltages[a]).then(a.cmp(&b)));
    let mut accepted: Vec<usize> = Vec::new();
    for idx in by_height {
        if accepted
            .iter()
            .all(|&kept| idx.abs_diff(kept) >= min_distance)
        {
            accepted.push(idx);
        }
    }
    accepted.sort_unstable();
    accepted
}
/// Peak/component detector with a pluggable R-peak strategy.
pub struct Detector {
    strategy: Box<dyn RPeakStrategy + Send + Sync>,
    config: DetectorConfig,
}
impl Detector {
    /// Prefer the dedicated peak-finding pass; the threshold-grouping
    /// fallback stays available through [`Detector::with_strategy`].
    pub fn auto() -> Self {
        Self::with_strategy(Box::new(SeparationPeakFinder), DetectorConfig::default())
    }
    pub fn with_strategy(
        strategy: Box<dyn RPeakStrategy + Send + Sync>,
        config: DetectorConfig,
    ) -> Self {
        Self { strategy, config }
    }
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }
    /// Run one detection cycle over a window of samples.
    ///
    /// Pure over its inputs: the same window always yields the same result.
    /// "No peaks found" is a result state, not an error.
    pub fn detect(&self, window: &[Sample], sample_rate_hz: f32) -> Detection {
        if window.len() < 2 || sample_rate_hz <= 0.0 {
            return Detection::default();
        }
        let raw: Vec<f32> = window.iter().map(|s| s.voltage).collect();
        let filtered = if self.config.use_bandpass {
            bandpass_filter(
                &raw,
                sample_rate_hz,
                self.config.band_low_hz,
                self.config.band_high_hz,
            )
        } else {
            None
        };
        let conditioned = filtered.as_deref().unwrap_or(&raw);
        let adaptive = filtered.is_some() || self.strategy.prefers_adaptive_threshold();
        let threshold = if adaptive {
            let mean = mean(conditioned);
            mean + self.config.adaptive_k * std_dev(conditioned, mean)
        } else {
            self.config.height_threshold_mv
        };
        let min_distance = ((self.config.min_distance_secs * sample_rate_hz).round() as usize).max(1);
        let r_peaks = self.strategy.find_r_peaks(conditioned, threshold, min_distance);
        debug!(
            "{}: {} peak(s) over {} samples (threshold {:.3} mV)",
            self.strategy.name(),
            r_peaks.len(),
            window.len(),
            threshold,
        );
        if r_peaks.len() < 2 {
            return Detection {
                r_peaks,
                ..Detection::default()
            };
        }
        let components = mark_components(window, window[r_peaks[0]]);
        let intervals = derive_intervals(&components);
        Detection {
            r_peaks,
            components,
            intervals,
        }
    }
}
/// Locate P/Q/S/T around the first peak of the first accepted pair.
/// Component positions always come from the raw window, never the
/// conditioned copy.
fn mark_components(window: &[Sample], r_peak: Sample) -> ComponentMarks {
    let t1 = r_peak.time;
    ComponentMarks {
        p: extremum_in(window, t1 - 0.20, t1 - 0.05, Extremum::Max),
        q: extremum_in(window, t1 - 0.05, t1, Extremum::Min),
        r: Some(r_peak.into()),
        s: extremum_in(window, t1, t1 + 0.05, Extremum::Min),
        t: extremum_in(window, t1 + 0.16, t1 + 0.30, Extremum::Max),
    }
}
#[derive(Clone, Copy)]
enum Extremum {
    Min,
    Max,
}
/// Extreme sample within `[start_time, end_time]`, or `None` when the
/// interval is empty, inverted, or outside the window. Never an error.
fn extremum_in(
    window: &[Sample],
    start_time: f32,
    end_time: f32,
    extremum: Extremum,
) -> Option<ComponentPoint> {
    if start_time > end_time {
        return None;
    }
    let lo = window.partition_point(|s| s.time < start_time);
    let hi = window.partition_point(|s| s.time <= end_time);
    let slice = window.get(lo..hi)?;
    let best = match extremum {
        Extremum::Max => slice.iter().max_by(|a, b| a.voltage.total_cmp(&b.voltage)),
        Extremum::Min => slice.iter().min_by(|a, b| a.voltage.total_cmp(&b.voltage)),
    }?;
    Some((*best).into())
}
fn derive_intervals(components: &ComponentMarks) -> Intervals {
    let ms = |from: ComponentPoint, to: ComponentPoint| (to.time - from.time) * 1000.0;
    Intervals {
        pr_ms: components.p.zip(components.q).map(|(p, q)| ms(p, q)),
        qrs_ms: components.q.zip(components.s).map(|(q, s)| ms(q, s)),
        qt_ms: components.q.zip(components.t).map(|(q, t)| ms(q, t)),
    }
}
fn mean(data: &[f32]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().copied().sum::<f32>() / data.len() as f32
}
fn std_dev(data: &[f32], mean: f32) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let variance = data
        .iter()
        .map(|v| {
            let delta = v - mean;
            delta * delta
        })
        .sum::<f32>()
        / data.len() as f32;
    variance.sqrt()
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synthesize, WaveProfile};
    fn trace_75bpm() -> Vec<Sample> {
        synthesize(WaveProfile::MultiGaussian, 10.0, 500.0, 75.0).unwrap()
    }
    #[test]
    fn finds_one_peak_per_beat() {
        let window = trace_75bpm();
        let detection = Detector::auto().detect(&window, 500.0);
        // 10 s at 75 BPM is 12.5 beats; the last beat may be clipped.
        assert!(
            (11..=13).contains(&detection.r_peaks.len()),
            "peaks: {}",
            detection.r_peaks.len()
        );
    }
    #[test]
    fn detection_is_idempotent() {
        let window = trace_75bpm();
        let detector = Detector::auto();
        let first = detector.detect(&window, 500.0);
        let second = detector.detect(&window, 500.0);
        assert_eq!(first.r_peaks, second.r_peaks);
        assert_eq!(first.components, second.components);
        assert_eq!(first.intervals, second.intervals);
    }
    #[test]
    fn accepted_peaks_honor_min_separation() {
        let window = trace_75bpm();
        for detector in [
            Detector::auto(),
            Detector::with_strategy(Box::new(ThresholdGroupingFinder), DetectorConfig::default()),
        ] {
            let detection = detector.detect(&window, 500.0);
            for pair in detection.r_peaks.windows(2) {
                let gap = window[pair[1]].time - window[pair[0]].time;
                assert!(gap >= 0.4, "{}: gap {gap}", detector.strategy_name());
            }
        }
    }
    #[test]
    fn strategies_agree_on_clean_signal() {
        let window = trace_75bpm();
        let precise = Detector::auto().detect(&window, 500.0);
        let fallback =
            Detector::with_strategy(Box::new(ThresholdGroupingFinder), DetectorConfig::default())
                .detect(&window, 500.0);
        assert_eq!(precise.r_peaks.len(), fallback.r_peaks.len());
        for (a, b) in precise.r_peaks.iter().zip(&fallback.r_peaks) {
            let drift = (window[*a].time - window[*b].time).abs();
            assert!(drift < 0.02, "drift {drift}");
        }
    }
    #[test]
    fn component_positions_match_pulse_centers() {
        let window = trace_75bpm();
        let detection = Detector::auto().detect(&window, 500.0);
        let marks = detection.components;
        // First beat: P at 0.10 s, Q at 0.20 s, R at 0.22 s, S at 0.24 s.
        assert!((marks.p.unwrap().time - 0.10).abs() < 0.01);
        assert!((marks.q.unwrap().time - 0.20).abs() < 0.01);
        assert!((marks.r.unwrap().time - 0.22).abs() < 0.01);
        assert!((marks.s.unwrap().time - 0.24).abs() < 0.01);
        // The T search interval opens at R + 0.16 s, past the 0.35 s pulse
        // center, so the mark lands on the interval's leading edge.
        assert!((marks.t.unwrap().time - 0.38).abs() < 0.01);
        let intervals = detection.intervals;
        assert!((intervals.pr_ms.unwrap() - 100.0).abs() < 8.0);
        assert!((intervals.qrs_ms.unwrap() - 40.0).abs() < 8.0);
        assert!((intervals.qt_ms.unwrap() - 180.0).abs() < 10.0);
    }
    #[test]
    fn fewer_than_two_peaks_leaves_everything_undetermined() {
        let flat: Vec<Sample> = (0..1000).map(|i| Sample::new(i as f32 / 500.0, 0.01)).collect();
        let detection = Detector::auto().detect(&flat, 500.0);
        assert!(detection.r_peaks.is_empty());
        assert!(detection.components.is_empty());
        assert!(detection.intervals.is_undetermined());
        // A single beat gives a single peak and still no components.
        let one_beat = synthesize(WaveProfile::MultiGaussian, 0.6, 500.0, 75.0).unwrap();
        let detection = Detector::auto().detect(&one_beat, 500.0);
        assert_eq!(detection.r_peaks.len(), 1);
        assert!(detection.components.is_empty());
        assert!(detection.intervals.is_undetermined());
    }
    #[test]
    fn component_search_stays_inside_window() {
        // Window starts mid-beat so the P/Q search intervals fall before
        // the first sample; those components must come back undetected.
        let full = trace_75bpm();
        let start = full.partition_point(|s| s.time < 0.20);
        let end = full.partition_point(|s| s.time < 1.30);
        let clipped = &full[start..end];
        let detection = Detector::auto().detect(clipped, 500.0);
        assert_eq!(detection.r_peaks.len(), 2);
        assert!(detection.components.p.is_none());
        assert!(detection.components.r.is_some());
        assert!(detection.intervals.pr_ms.is_none());
    }
    #[test]
    fn band_pass_path_still_detects_beats() {
        let window = trace_75bpm();
        let config = DetectorConfig {
            use_bandpass: true,
            ..DetectorConfig::default()
        };
        let detector = Detector::with_strategy(Box::new(SeparationPeakFinder), config);
        let detection = detector.detect(&window, 500.0);
        assert!(detection.r_peaks.len() >= 11, "peaks: {}", detection.r_peaks.len());
        for pair in detection.r_peaks.windows(2) {
            assert!(window[pair[1]].time - window[pair[0]].time >= 0.4);
        }
    }
    #[test]
    fn grouping_finder_picks_run_maxima() {
        let voltages = [0.0, 0.6, 0.9, 0.7, 0.0, 0.0, 0.0, 0.8, 1.1, 0.2];
        let peaks = ThresholdGroupingFinder.find_r_peaks(&voltages, 0.5, 3);
        assert_eq!(peaks, vec![2, 8]);
    }
    #[test]
    fn empty_and_tiny_windows_are_not_errors() {
        let detector = Detector::auto();
        assert!(detector.detect(&[], 500.0).r_peaks.is_empty());
        let single = [Sample::new(0.0, 1.0)];
        assert!(detector.detect(&single, 500.0).r_peaks.is_empty());
    }
}
