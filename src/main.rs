use std::thread;
use std::time::Duration;
use anyhow::Context;
use log::info;
use cardioscope::{
    load_csv_path, render_trace_png, synthesize, PlaybackConfig, PlaybackDriver, TraceStyle,
    WaveProfile,
};
fn main() -> anyhow::Result<()> {
    env_logger::init();
    let samples = match std::env::args().nth(1) {
        Some(path) => load_csv_path(&path).with_context(|| format!("loading {path}"))?,
        None => {
            info!("no CSV given; synthesizing 10 s at 75 BPM");
            synthesize(WaveProfile::MultiGaussian, 10.0, 500.0, 75.0)?
        }
    };
    // Faster transport than the library default so the demo finishes quickly.
    let config = PlaybackConfig {
        points_per_tick: 25,
        tick_interval_ms: 20,
        ..PlaybackConfig::default()
    };
    let tick_interval = Duration::from_millis(config.tick_interval_ms);
    let mut driver = PlaybackDriver::new(samples, config);
    driver.play();
    let mut last_frame = None;
    let mut ticks = 0u64;
    while let Some(frame) = driver.tick()? {
        ticks += 1;
        if ticks % 100 == 0 {
            match frame.heart_rate_bpm {
                Some(bpm) => info!(
                    "t={:.2}s/{:.2}s  {} BPM ({:?})",
                    frame.current_time, frame.total_duration, bpm, frame.rhythm
                ),
                None => info!(
                    "t={:.2}s/{:.2}s  -- BPM ({:?})",
                    frame.current_time, frame.total_duration, frame.rhythm
                ),
            }
        }
        last_frame = Some(frame);
        thread::sleep(tick_interval);
    }
    let frame = last_frame.context("trace produced no playback frames")?;
    println!("{}", serde_json::to_string_pretty(&frame)?);
    let window = driver
        .buffer()
        .window(frame.current_time, config.window_seconds);
    let png = render_trace_png(window, &frame.components, &TraceStyle::default())?;
    std::fs::write("trace.png", &png)?;
    info!("wrote trace.png ({} bytes)", png.len());
    Ok(())
}
