use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use log::info;
use crate::error::SignalError;
use crate::types::Sample;
/// Load ECG samples from a CSV file on disk.
///
/// See [`load_csv`] for the accepted format.
pub fn load_csv_path(path: impl AsRef<Path>) -> Result<Vec<Sample>, SignalError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let samples = load_csv(BufReader::new(file))?;
    info!("loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}
/// Parse CSV ECG data: a header row, then `time_secs,voltage_mv` records.
///
/// Only the first two columns are interpreted; extras are ignored. Missing
/// columns, non-numeric values, or a non-monotonic time column fail the
/// whole load with [`SignalError::MalformedInput`] so the detection core
/// never sees malformed data.
pub fn load_csv<R: BufRead>(reader: R) -> Result<Vec<Sample>, SignalError> {
    let mut lines = reader.lines();
    match lines.next() {
        Some(header) => {
            header?;
        }
        None => {
            return Err(SignalError::MalformedInput {
                line: 1,
                reason: "missing header row".into(),
            })
        }
    }
    let mut samples: Vec<Sample> = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line_number = offset + 2;
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        let time = parse_field(fields.next(), line_number, "time")?;
        let voltage = parse_field(fields.next(), line_number, "voltage")?;
        if let Some(last) = samples.last() {
            if time <= last.time {
                return Err(SignalError::MalformedInput {
                    line: line_number,
                    reason: format!(
                        "time column is not monotonic ({time} follows {})",
                        last.time
                    ),
                });
            }
        }
        samples.push(Sample::new(time, voltage));
    }
    Ok(samples)
}
fn parse_field(field: Option<&str>, line: usize, name: &str) -> Result<f32, SignalError> {
    let raw = field.ok_or_else(|| SignalError::MalformedInput {
        line,
        reason: format!("missing {name} column"),
    })?;
    let value: f32 = raw.trim().parse().map_err(|_| SignalError::MalformedInput {
        line,
        reason: format!("{name} column is not numeric: {raw:?}"),
    })?;
    if !value.is_finite() {
        return Err(SignalError::MalformedInput {
            line,
            reason: format!("{name} column is not finite: {raw:?}"),
        });
    }
    Ok(value)
}
