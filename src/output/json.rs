//! JSON output format writer.

use crate::analysis::{Direction, SpeedEstimate};
use crate::error::{Error, Result};
use crate::output::{OutputWriter, RunContext};
use crate::utils::duration::format_clock;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// JSON result file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonResultFile {
    /// Source file name.
    pub source_file: String,
    /// Analysis timestamp.
    pub analysis_date: DateTime<Utc>,
    /// Analysis settings.
    pub settings: JsonSettings,
    /// Speed estimates in time order.
    pub estimates: Vec<JsonEstimate>,
    /// Summary statistics.
    pub summary: JsonSummary,
}

/// Analysis settings for JSON output.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSettings {
    /// Speed of sound, m/s.
    pub speed_of_sound: f64,
    /// Threshold in standard deviations above the mean intensity.
    pub threshold_sigma: f64,
    /// Frames per second.
    pub frame_rate: u32,
}

/// Single estimate in JSON format.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEstimate {
    /// Peak time in seconds.
    pub time_seconds: f64,
    /// Peak time as clock text.
    pub time: String,
    /// Speed, m/s.
    pub speed_mps: f64,
    /// Speed, km/h.
    pub speed_kmh: f64,
    /// Frame index of the intensity peak.
    pub peak_index: usize,
    /// Frequency at the peak, Hz.
    pub peak_frequency: f64,
    /// Mean approach frequency, Hz.
    pub approach_frequency: f64,
    /// Mean recede frequency, Hz.
    pub recede_frequency: f64,
    /// Direction of travel.
    pub direction: Direction,
}

impl From<&SpeedEstimate> for JsonEstimate {
    fn from(e: &SpeedEstimate) -> Self {
        Self {
            time_seconds: e.time_secs,
            time: format_clock(e.time_secs),
            speed_mps: e.speed_mps,
            speed_kmh: e.speed_kmh(),
            peak_index: e.peak_index,
            peak_frequency: e.peak_frequency,
            approach_frequency: e.approach_frequency,
            recede_frequency: e.recede_frequency,
            direction: e.direction,
        }
    }
}

/// Summary statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonSummary {
    /// Frames analyzed.
    pub frames: usize,
    /// Passages found by segmentation.
    pub passages: usize,
    /// Passages with a speed estimate.
    pub estimates: usize,
    /// Passages skipped as degenerate.
    pub skipped: usize,
    /// Mean estimated speed, m/s. Absent when there are no estimates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_speed_mps: Option<f64>,
    /// Highest estimated speed, m/s.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed_mps: Option<f64>,
    /// Duration covered by the frames, seconds.
    pub duration_seconds: f64,
}

/// Writer for JSON result files.
///
/// Estimates are buffered and the whole document is written at finalize.
pub struct JsonResultWriter {
    estimates: Vec<JsonEstimate>,
    output_path: PathBuf,
    context: RunContext,
}

impl JsonResultWriter {
    /// Create a new JSON result writer.
    pub fn new(output_path: &Path, context: RunContext) -> Self {
        Self {
            estimates: Vec::new(),
            output_path: output_path.to_path_buf(),
            context,
        }
    }

    fn compute_summary(&self) -> JsonSummary {
        let speeds = self.estimates.iter().map(|e| e.speed_mps);
        #[allow(clippy::cast_precision_loss)]
        let mean_speed_mps = (!self.estimates.is_empty())
            .then(|| speeds.clone().sum::<f64>() / self.estimates.len() as f64);
        let max_speed_mps = speeds.reduce(f64::max);

        JsonSummary {
            frames: self.context.frames,
            passages: self.context.events,
            estimates: self.estimates.len(),
            skipped: self.context.skipped,
            mean_speed_mps,
            max_speed_mps,
            duration_seconds: self.context.duration_secs,
        }
    }
}

impl OutputWriter for JsonResultWriter {
    fn write_header(&mut self) -> Result<()> {
        // Written at finalize
        Ok(())
    }

    fn write_estimate(&mut self, estimate: &SpeedEstimate) -> Result<()> {
        self.estimates.push(JsonEstimate::from(estimate));
        Ok(())
    }

    fn finalize(&mut self) -> Result<()> {
        let summary = self.compute_summary();
        let source_file = self
            .context
            .source_file
            .file_name()
            .map_or_else(
                || self.context.source_file.display().to_string(),
                |n| n.to_string_lossy().into_owned(),
            );

        let result = JsonResultFile {
            source_file,
            analysis_date: Utc::now(),
            settings: JsonSettings {
                speed_of_sound: self.context.settings.speed_of_sound,
                threshold_sigma: self.context.settings.threshold_sigma,
                frame_rate: self.context.frame_rate,
            },
            estimates: std::mem::take(&mut self.estimates),
            summary,
        };

        let file = File::create(&self.output_path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, &result).map_err(|e| Error::JsonWrite {
            path: self.output_path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::analysis::AnalysisSettings;
    use tempfile::tempdir;

    fn context(events: usize, skipped: usize) -> RunContext {
        RunContext {
            source_file: PathBuf::from("/recordings/street.wav"),
            settings: AnalysisSettings::default(),
            frame_rate: 100,
            frames: 6000,
            events,
            skipped,
            duration_secs: 60.0,
        }
    }

    fn estimate(time_secs: f64, speed_mps: f64) -> SpeedEstimate {
        SpeedEstimate {
            time_secs,
            speed_mps,
            peak_index: 0,
            peak_frequency: 400.0,
            approach_frequency: 430.0,
            recede_frequency: 370.0,
            direction: Direction::LeftToRight,
        }
    }

    #[test]
    fn test_json_writer_basic() {
        let dir = tempdir().expect("create temp dir");
        let output_path = dir.path().join("street.speeds.json");

        let mut writer = JsonResultWriter::new(&output_path, context(3, 1));
        writer.write_header().expect("write header");
        writer.write_estimate(&estimate(1.5, 20.0)).expect("write e1");
        writer.write_estimate(&estimate(30.0, 10.0)).expect("write e2");
        writer.finalize().expect("finalize");

        let content = std::fs::read_to_string(&output_path).expect("read file");
        let result: JsonResultFile = serde_json::from_str(&content).expect("parse JSON");

        assert_eq!(result.source_file, "street.wav");
        assert_eq!(result.settings.frame_rate, 100);
        assert_eq!(result.estimates.len(), 2);
        assert_eq!(result.estimates[0].time, "0:00:01.500000");
        assert_eq!(result.estimates[0].direction, Direction::LeftToRight);
        assert!((result.estimates[0].speed_kmh - 72.0).abs() < 1e-9);
        assert_eq!(result.summary.passages, 3);
        assert_eq!(result.summary.skipped, 1);
        assert_eq!(result.summary.estimates, 2);
        assert_eq!(result.summary.mean_speed_mps, Some(15.0));
        assert_eq!(result.summary.max_speed_mps, Some(20.0));
        assert!(content.contains("\"direction\": \"left_to_right\""));
    }

    #[test]
    fn test_json_summary_without_estimates() {
        let dir = tempdir().expect("create temp dir");
        let output_path = dir.path().join("quiet.speeds.json");

        let mut writer = JsonResultWriter::new(&output_path, context(0, 0));
        writer.write_header().expect("write header");
        writer.finalize().expect("finalize");

        let content = std::fs::read_to_string(&output_path).expect("read file");
        assert!(!content.contains("mean_speed_mps"));

        let result: JsonResultFile = serde_json::from_str(&content).expect("parse JSON");
        assert!(result.estimates.is_empty());
        assert_eq!(result.summary.mean_speed_mps, None);
    }
}
