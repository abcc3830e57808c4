use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf32;
use plotters::prelude::*;
use crate::error::SignalError;
use crate::types::{ComponentMarks, Sample, WaveComponent};
/// Appearance of the offscreen trace render.
#[derive(Clone, Debug)]
pub struct TraceStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub trace: RGBColor,
    /// Overlay the clinical calibration grid (minor 0.04 s / 0.1 mV,
    /// major 0.20 s / 0.5 mV).
    pub paper_grid: bool,
}
impl Default for TraceStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 400,
            background: RGBColor(0, 0, 0),
            // Monitor-green trace on black, like the bedside units.
            trace: RGBColor(0, 255, 0),
            paper_grid: true,
        }
    }
}
const MINOR_TIME_STEP: f32 = 0.04;
const MAJOR_TIME_STEP: f32 = 0.20;
const MINOR_VOLT_STEP: f32 = 0.1;
const MAJOR_VOLT_STEP: f32 = 0.5;
/// Render a window of samples (plus detected component markers) to a PNG
/// byte buffer. A demo display collaborator; the playback driver never
/// calls this.
pub fn render_trace_png(
    window: &[Sample],
    marks: &ComponentMarks,
    style: &TraceStyle,
) -> Result<Vec<u8>, SignalError> {
    let (first, last) = match (window.first(), window.last()) {
        (Some(first), Some(last)) if last.time > first.time => (*first, *last),
        _ => {
            return Err(SignalError::Render(
                "trace window needs at least two samples".into(),
            ))
        }
    };
    let (y_min, y_max) = voltage_bounds(window);
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("ECG", ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 45)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(first.time..last.time, y_min..y_max)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .axis_style(&WHITE)
            .label_style(("sans-serif", 12).into_font().color(&WHITE))
            .x_desc("Time (s)")
            .y_desc("Voltage (mV)")
            .draw()?;
        if style.paper_grid {
            draw_paper_grid(&mut chart, first.time, last.time, y_min, y_max)?;
        }
        chart.draw_series(LineSeries::new(
            window.iter().map(|s| (s.time, s.voltage)),
            &style.trace,
        ))?;
        draw_component_marks(&mut chart, marks)?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
type TraceChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf32, RangedCoordf32>>;
fn draw_paper_grid(
    chart: &mut TraceChart,
    x0: f32,
    x1: f32,
    y0: f32,
    y1: f32,
) -> Result<(), SignalError> {
    // Faded red like ECG paper; majors drawn over the minors.
    let minor = RGBColor(150, 60, 60).mix(0.35);
    let major = RGBColor(200, 80, 80).mix(0.7);
    for (step, color) in [(MINOR_TIME_STEP, &minor), (MAJOR_TIME_STEP, &major)] {
        let mut x = (x0 / step).ceil() * step;
        while x <= x1 {
            chart.draw_series(LineSeries::new(vec![(x, y0), (x, y1)], color))?;
            x += step;
        }
    }
    for (step, color) in [(MINOR_VOLT_STEP, &minor), (MAJOR_VOLT_STEP, &major)] {
        let mut y = (y0 / step).ceil() * step;
        while y <= y1 {
            chart.draw_series(LineSeries::new(vec![(x0, y), (x1, y)], color))?;
            y += step;
        }
    }
    Ok(())
}
fn draw_component_marks(
    chart: &mut TraceChart,
    marks: &ComponentMarks,
) -> Result<(), SignalError> {
    for component in WaveComponent::ALL {
        let Some(point) = marks.get(component) else {
            continue;
        };
        let label = match component {
            WaveComponent::P => "P",
            WaveComponent::Q => "Q",
            WaveComponent::R => "R",
            WaveComponent::S => "S",
            WaveComponent::T => "T",
        };
        chart.draw_series(std::iter::once(Circle::new(
            (point.time, point.voltage),
            4,
            YELLOW.filled(),
        )))?;
        chart.draw_series(std::iter::once(Text::new(
            label,
            (point.time, point.voltage),
            ("sans-serif", 14).into_font().color(&WHITE),
        )))?;
    }
    Ok(())
}
fn voltage_bounds(window: &[Sample]) -> (f32, f32) {
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for sample in window {
        min = min.min(sample.voltage);
        max = max.max(sample.voltage);
    }
    if (max - min).abs() < f32::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    let pad = (max - min) * 0.1;
    (min - pad, max + pad)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, SignalError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| SignalError::Render("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
