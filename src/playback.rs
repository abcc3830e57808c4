use log::debug;
use serde::Serialize;
use crate::buffer::SampleBuffer;
use crate::detect::Detector;
use crate::error::SignalError;
use crate::estimator::{estimate_with, EstimatorConfig, RhythmClass};
use crate::types::{ComponentMarks, Intervals, Sample};
/// Playback knobs. Batch size and tick cadence are independent; the
/// driver consumes `points_per_tick` per call and leaves the actual
/// sleeping between ticks to its owner.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PlaybackConfig {
    pub points_per_tick: usize,
    pub tick_interval_ms: u64,
    pub window_seconds: f32,
    pub sample_rate_hz: f32,
}
impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            points_per_tick: 5,
            tick_interval_ms: 50,
            window_seconds: 5.0,
            sample_rate_hz: 500.0,
        }
    }
}
/// Cursor + transport state as a plain value, snapshotted on request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlaybackState {
    pub cursor: usize,
    pub playing: bool,
}
/// Everything the display layer needs after one tick.
#[derive(Clone, Debug, Serialize)]
pub struct DisplayFrame {
    pub current_time: f32,
    pub total_duration: f32,
    pub heart_rate_bpm: Option<u16>,
    pub rhythm: RhythmClass,
    pub components: ComponentMarks,
    pub intervals: Intervals,
}
/// Advances a cursor over a pre-generated or loaded trace, revealing
/// samples into the buffer and re-running detection + estimation on the
/// current window after each batch.
pub struct PlaybackDriver {
    source: Vec<Sample>,
    buffer: SampleBuffer,
    state: PlaybackState,
    config: PlaybackConfig,
    detector: Detector,
    estimator: EstimatorConfig,
}
impl PlaybackDriver {
    pub fn new(source: Vec<Sample>, config: PlaybackConfig) -> Self {
        Self::with_detector(source, config, Detector::auto(), EstimatorConfig::default())
    }
    pub fn with_detector(
        source: Vec<Sample>,
        config: PlaybackConfig,
        detector: Detector,
        estimator: EstimatorConfig,
    ) -> Self {
        let buffer = SampleBuffer::with_capacity(source.len());
        Self {
            source,
            buffer,
            state: PlaybackState::default(),
            config,
            detector,
            estimator,
        }
    }
    pub fn state(&self) -> PlaybackState {
        self.state
    }
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }
    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }
    pub fn total_duration(&self) -> f32 {
        self.source.last().map(|s| s.time).unwrap_or(0.0)
    }
    pub fn is_finished(&self) -> bool {
        self.state.cursor >= self.source.len()
    }
    /// Start (or resume) playback. Starting again after the trace has run
    /// out rewinds first, matching transport-button behavior.
    pub fn play(&mut self) {
        if self.is_finished() {
            self.seek_to_start();
        }
        self.state.playing = true;
    }
    pub fn pause(&mut self) {
        self.state.playing = false;
    }
    pub fn reset(&mut self) {
        self.state = PlaybackState::default();
        self.buffer.reset();
    }
    /// Rewind without touching the transport flag.
    pub fn seek_to_start(&mut self) {
        self.state.cursor = 0;
        self.buffer.reset();
    }
    /// Reveal the next batch and re-evaluate the current window.
    ///
    /// Returns `Ok(None)` when paused or when the trace is exhausted;
    /// reaching the end pauses the transport automatically.
    pub fn tick(&mut self) -> Result<Option<DisplayFrame>, SignalError> {
        if !self.state.playing || self.is_finished() {
            if self.is_finished() {
                self.state.playing = false;
            }
            return Ok(None);
        }
        let end = (self.state.cursor + self.config.points_per_tick).min(self.source.len());
        self.buffer.append(&self.source[self.state.cursor..end])?;
        self.state.cursor = end;
        if self.is_finished() {
            debug!("playback reached the end of the trace");
            self.state.playing = false;
        }
        Ok(Some(self.evaluate()))
    }
    /// Detect + estimate over the current analysis window and package the
    /// result for the display layer.
    fn evaluate(&self) -> DisplayFrame {
        let current_time = self.buffer.latest_time().unwrap_or(0.0);
        let window = self.buffer.window(current_time, self.config.window_seconds);
        let detection = self.detector.detect(window, self.config.sample_rate_hz);
        let r_times: Vec<f32> = detection.r_peaks.iter().map(|&i| window[i].time).collect();
        let estimate = estimate_with(&r_times, &self.estimator);
        DisplayFrame {
            current_time,
            total_duration: self.total_duration(),
            heart_rate_bpm: estimate.bpm,
            rhythm: estimate.rhythm,
            components: detection.components,
            intervals: detection.intervals,
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{synthesize, WaveProfile};
    fn driver_75bpm() -> PlaybackDriver {
        let trace = synthesize(WaveProfile::MultiGaussian, 10.0, 500.0, 75.0).unwrap();
        PlaybackDriver::new(trace, PlaybackConfig::default())
    }
    #[test]
    fn tick_honors_batch_size_and_pause() {
        let mut driver = driver_75bpm();
        assert!(driver.tick().unwrap().is_none(), "paused driver must not advance");
        driver.play();
        for _ in 0..3 {
            driver.tick().unwrap().unwrap();
        }
        assert_eq!(driver.state().cursor, 15);
        assert_eq!(driver.buffer().len(), 15);
        driver.pause();
        assert!(driver.tick().unwrap().is_none());
        assert_eq!(driver.state().cursor, 15);
    }
    #[test]
    fn full_playback_converges_on_the_synthesized_rate() {
        let mut driver = driver_75bpm();
        driver.play();
        let mut last_frame = None;
        while let Some(frame) = driver.tick().unwrap() {
            last_frame = Some(frame);
        }
        let frame = last_frame.expect("playback produced no frames");
        assert!(driver.is_finished());
        assert!(!driver.state().playing, "transport must auto-pause at the end");
        let bpm = frame.heart_rate_bpm.expect("final window must yield a rate");
        assert!((73..=77).contains(&bpm), "bpm {bpm}");
        assert_eq!(frame.rhythm, RhythmClass::Normal);
    }
    #[test]
    fn early_frames_report_insufficient_data() {
        let mut driver = driver_75bpm();
        driver.play();
        let frame = driver.tick().unwrap().unwrap();
        assert_eq!(frame.heart_rate_bpm, None);
        assert_eq!(frame.rhythm, RhythmClass::InsufficientData);
        assert!(frame.components.is_empty());
        assert!(frame.intervals.is_undetermined());
    }
    #[test]
    fn reset_clears_buffer_and_state() {
        let mut driver = driver_75bpm();
        driver.play();
        for _ in 0..10 {
            driver.tick().unwrap();
        }
        driver.reset();
        assert_eq!(driver.state(), PlaybackState::default());
        assert!(driver.buffer().is_empty());
        // Playback may start over cleanly after a reset.
        driver.play();
        assert!(driver.tick().unwrap().is_some());
    }
    #[test]
    fn play_after_finish_rewinds() {
        let mut driver = driver_75bpm();
        driver.play();
        while driver.tick().unwrap().is_some() {}
        assert!(driver.is_finished());
        driver.play();
        assert_eq!(driver.state().cursor, 0);
        assert!(driver.tick().unwrap().is_some());
    }
    #[test]
    fn frame_carries_progress_metadata() {
        let mut driver = driver_75bpm();
        driver.play();
        let frame = driver.tick().unwrap().unwrap();
        assert!(frame.current_time >= 0.0);
        assert!((frame.total_duration - 9.998).abs() < 0.01);
    }
}
