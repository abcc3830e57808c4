use serde::Serialize;
/// One ECG sample: absolute time in seconds, lead voltage in millivolts.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    pub time: f32,
    pub voltage: f32,
}
impl Sample {
    pub fn new(time: f32, voltage: f32) -> Self {
        Self { time, voltage }
    }
}
/// The five deflections of one heartbeat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum WaveComponent {
    P,
    Q,
    R,
    S,
    T,
}
impl WaveComponent {
    pub const ALL: [WaveComponent; 5] = [
        WaveComponent::P,
        WaveComponent::Q,
        WaveComponent::R,
        WaveComponent::S,
        WaveComponent::T,
    ];
}
/// Detected position of a single waveform component.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ComponentPoint {
    pub time: f32,
    pub voltage: f32,
}
impl From<Sample> for ComponentPoint {
    fn from(sample: Sample) -> Self {
        Self {
            time: sample.time,
            voltage: sample.voltage,
        }
    }
}
/// Component positions for the most recent detection cycle.
///
/// Recomputed whole every cycle; `None` means undetected in this window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ComponentMarks {
    pub p: Option<ComponentPoint>,
    pub q: Option<ComponentPoint>,
    pub r: Option<ComponentPoint>,
    pub s: Option<ComponentPoint>,
    pub t: Option<ComponentPoint>,
}
impl ComponentMarks {
    pub fn get(&self, component: WaveComponent) -> Option<ComponentPoint> {
        match component {
            WaveComponent::P => self.p,
            WaveComponent::Q => self.q,
            WaveComponent::R => self.r,
            WaveComponent::S => self.s,
            WaveComponent::T => self.t,
        }
    }
    pub fn is_empty(&self) -> bool {
        WaveComponent::ALL.iter().all(|c| self.get(*c).is_none())
    }
}
/// Clinical timing intervals in milliseconds; `None` means undetermined.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Intervals {
    pub pr_ms: Option<f32>,
    pub qrs_ms: Option<f32>,
    pub qt_ms: Option<f32>,
}
impl Intervals {
    pub fn is_undetermined(&self) -> bool {
        self.pr_ms.is_none() && self.qrs_ms.is_none() && self.qt_ms.is_none()
    }
}
