use crate::error::SignalError;
use crate::types::Sample;
/// Append-only store of everything played so far in one session.
///
/// Timestamps are strictly increasing; `append` rejects a batch whose first
/// offending sample fails to advance time. Windows are borrowed slices into
/// the underlying storage, so snapshotting allocates nothing.
#[derive(Debug, Default)]
pub struct SampleBuffer {
    data: Vec<Sample>,
}
impl SampleBuffer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }
    pub fn append(&mut self, samples: &[Sample]) -> Result<(), SignalError> {
        for (offset, sample) in samples.iter().enumerate() {
            if let Some(last) = self.data.last() {
                if sample.time <= last.time {
                    return Err(SignalError::NonMonotonicTime {
                        index: self.data.len() + offset,
                        previous: last.time,
                    });
                }
            }
            self.data.push(*sample);
        }
        Ok(())
    }
    /// All samples with `end_time - length_secs <= time <= end_time`,
    /// in timestamp order.
    pub fn window(&self, end_time: f32, length_secs: f32) -> &[Sample] {
        let start_time = end_time - length_secs;
        let lo = self.data.partition_point(|s| s.time < start_time);
        let hi = self.data.partition_point(|s| s.time <= end_time);
        if lo >= hi {
            return &[];
        }
        &self.data[lo..hi]
    }
    pub fn reset(&mut self) {
        self.data.clear();
    }
    pub fn samples(&self) -> &[Sample] {
        &self.data
    }
    pub fn latest_time(&self) -> Option<f32> {
        self.data.last().map(|s| s.time)
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn ramp(times: &[f32]) -> Vec<Sample> {
        times.iter().map(|&t| Sample::new(t, t * 10.0)).collect()
    }
    #[test]
    fn append_keeps_order_and_rejects_regression() {
        let mut buffer = SampleBuffer::new();
        buffer.append(&ramp(&[0.0, 0.1, 0.2])).unwrap();
        let err = buffer.append(&ramp(&[0.2])).unwrap_err();
        match err {
            SignalError::NonMonotonicTime { index, .. } => assert_eq!(index, 3),
            other => panic!("unexpected error: {other}"),
        }
        // The valid prefix before the offending sample is kept.
        assert_eq!(buffer.len(), 3);
        buffer.append(&ramp(&[0.3])).unwrap();
        assert_eq!(buffer.latest_time(), Some(0.3));
    }
    #[test]
    fn window_is_inclusive_on_both_ends() {
        let mut buffer = SampleBuffer::new();
        buffer.append(&ramp(&[0.0, 0.5, 1.0, 1.5, 2.0, 2.5])).unwrap();
        let view = buffer.window(2.0, 1.0);
        let times: Vec<f32> = view.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![1.0, 1.5, 2.0]);
    }
    #[test]
    fn window_outside_data_is_empty() {
        let mut buffer = SampleBuffer::new();
        buffer.append(&ramp(&[0.0, 0.5])).unwrap();
        assert!(buffer.window(10.0, 1.0).is_empty());
        assert!(buffer.window(0.5, -1.0).is_empty());
        assert!(SampleBuffer::new().window(1.0, 1.0).is_empty());
    }
    #[test]
    fn reset_clears_all_state() {
        let mut buffer = SampleBuffer::new();
        buffer.append(&ramp(&[0.0, 0.5])).unwrap();
        buffer.reset();
        assert!(buffer.is_empty());
        // A fresh session may restart from zero.
        buffer.append(&ramp(&[0.0])).unwrap();
        assert_eq!(buffer.len(), 1);
    }
}
