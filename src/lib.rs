pub mod buffer;
pub mod detect;
pub mod error;
pub mod estimator;
pub mod filter;
pub mod loader;
pub mod playback;
pub mod render;
pub mod synth;
pub mod types;
pub use buffer::SampleBuffer;
pub use detect::{
    Detection, Detector, DetectorConfig, RPeakStrategy, SeparationPeakFinder,
    ThresholdGroupingFinder,
};
pub use error::SignalError;
pub use estimator::{estimate, estimate_with, EstimatorConfig, HeartRateEstimate, RhythmClass};
pub use filter::bandpass_filter;
pub use loader::{load_csv, load_csv_path};
pub use playback::{DisplayFrame, PlaybackConfig, PlaybackDriver, PlaybackState};
pub use render::{render_trace_png, TraceStyle};
pub use synth::{synthesize, WaveProfile};
pub use types::{ComponentMarks, ComponentPoint, Intervals, Sample, WaveComponent};
