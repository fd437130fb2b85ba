//! Pre-extracted frame file parsing.
//!
//! Reads `*.frames.csv` files produced by an external pitch tracker. Uses the
//! `csv` crate so quoting, a UTF-8 BOM and padded fields are handled.

use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::frames::FrameSeries;

/// Internal record for CSV deserialization.
#[derive(Debug, Deserialize)]
struct FrameRecord {
    frequency: f32,
    intensity: f32,
}

/// Parse a frame file into a series at `frame_rate` frames per second.
///
/// Expects the columns `frequency` and `intensity`; any other columns are
/// ignored. Values must be finite and non-negative.
pub fn read_frame_file(path: &Path, frame_rate: u32) -> Result<FrameSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| Error::FrameFileRead {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut frequencies = Vec::new();
    let mut intensities = Vec::new();

    for (line_num, result) in reader.deserialize::<FrameRecord>().enumerate() {
        let line = line_num + 2;
        let record = result.map_err(|e| Error::InvalidFrameFile {
            path: path.to_path_buf(),
            message: format!("line {line}: {e}"),
        })?;

        for (name, value) in [
            ("frequency", record.frequency),
            ("intensity", record.intensity),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidFrameFile {
                    path: path.to_path_buf(),
                    message: format!(
                        "line {line}: {name} must be finite and non-negative, got {value}"
                    ),
                });
            }
        }

        frequencies.push(record.frequency);
        intensities.push(record.intensity);
    }

    FrameSeries::new(frequencies, intensities, frame_rate)
}
