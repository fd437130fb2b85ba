//! Output writer trait definition.

use crate::analysis::{AnalysisSettings, SpeedEstimate};
use crate::error::Result;
use std::path::PathBuf;

/// Trait for writing speed estimates.
pub trait OutputWriter {
    /// Write the file header (if applicable).
    fn write_header(&mut self) -> Result<()>;

    /// Write a single estimate.
    fn write_estimate(&mut self, estimate: &SpeedEstimate) -> Result<()>;

    /// Finalize the output (flush, close, etc.).
    fn finalize(&mut self) -> Result<()>;
}

/// What was analyzed and how, for writers that record provenance.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Source audio or frame file.
    pub source_file: PathBuf,
    /// Settings the analysis ran with.
    pub settings: AnalysisSettings,
    /// Frames per second of the analyzed series.
    pub frame_rate: u32,
    /// Number of frames analyzed.
    pub frames: usize,
    /// Passages found by segmentation.
    pub events: usize,
    /// Passages without an estimate.
    pub skipped: usize,
    /// Duration covered by the frame series, seconds.
    pub duration_secs: f64,
}
