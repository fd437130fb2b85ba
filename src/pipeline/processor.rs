//! Single file processing pipeline.

use crate::analysis::{self, Analysis, AnalysisSettings};
use crate::audio::{decode_audio_file, resample};
use crate::config::{ExtractionConfig, OutputFormat};
use crate::error::{Error, Result};
use crate::frames::{FrameExtractor, FrameSeries, PeakPickingExtractor, read_frame_file};
use crate::output::{CsvWriter, JsonResultWriter, OutputWriter, RunContext};
use crate::pipeline::{InputKind, ProcessOptions, output_path_for};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Analyze a single input file and write its speed estimates.
///
/// Audio is decoded, resampled to the extraction rate and reduced to frames;
/// frame files are read directly at the configured frame rate.
pub fn process_file(
    input_path: &Path,
    output_dir: &Path,
    options: &ProcessOptions,
    settings: &AnalysisSettings,
    extraction: &ExtractionConfig,
) -> Result<ProcessResult> {
    let start_time = Instant::now();

    info!("Processing: {}", input_path.display());

    let series = load_series(input_path, extraction)?;
    debug!(
        "{} frames at {} fps ({:.1}s)",
        series.len(),
        series.frame_rate(),
        series.duration_secs()
    );

    let analysis = analysis::run(&series, settings)?;
    info!(
        "Found {} passage(s), {} speed estimate(s), {} skipped",
        analysis.events,
        analysis.estimates.len(),
        analysis.skipped
    );
    for estimate in &analysis.estimates {
        debug!(
            "t={:.2}s speed={:.2} m/s ({:.1} km/h) {}",
            estimate.time_secs,
            estimate.speed_mps,
            estimate.speed_kmh(),
            estimate.direction
        );
    }

    let context = RunContext {
        source_file: input_path.to_path_buf(),
        settings: *settings,
        frame_rate: series.frame_rate().get(),
        frames: series.len(),
        events: analysis.events,
        skipped: analysis.skipped,
        duration_secs: series.duration_secs(),
    };

    if options.stdout {
        let stdout = std::io::stdout();
        let mut writer = CsvWriter::new(stdout.lock(), false)?;
        write_estimates(&mut writer, &analysis)?;
    } else {
        for format in &options.formats {
            write_output(
                input_path,
                output_dir,
                *format,
                &analysis,
                &context,
                options.csv_bom,
            )?;
        }
    }

    let duration_secs = start_time.elapsed().as_secs_f64();
    let realtime_factor = if duration_secs > 0.0 {
        context.duration_secs / duration_secs
    } else {
        0.0
    };
    info!(
        "Processed {} frames in {:.2}s ({:.1}x realtime)",
        series.len(),
        duration_secs,
        realtime_factor
    );

    Ok(ProcessResult {
        estimates: analysis.estimates.len(),
        events: analysis.events,
        skipped: analysis.skipped,
        duration_secs,
        media_duration_secs: context.duration_secs,
    })
}

/// Turn an input file into a frame series.
fn load_series(input_path: &Path, extraction: &ExtractionConfig) -> Result<FrameSeries> {
    match InputKind::of(input_path) {
        Some(InputKind::Frames) => {
            debug!("Reading frame file at {} fps", extraction.frame_rate);
            read_frame_file(input_path, extraction.frame_rate)
        }
        Some(InputKind::Audio) => {
            let decoded = decode_audio_file(input_path)?;
            info!(
                "Decoded {:.1}s of audio at {} Hz",
                decoded.duration_secs, decoded.sample_rate
            );

            let samples = if decoded.sample_rate == extraction.sample_rate {
                decoded.samples
            } else {
                debug!(
                    "Resampling from {} Hz to {} Hz...",
                    decoded.sample_rate, extraction.sample_rate
                );
                resample(decoded.samples, decoded.sample_rate, extraction.sample_rate)?
            };

            PeakPickingExtractor::from_config(extraction).extract(&samples, extraction.sample_rate)
        }
        None => Err(Error::NoValidInputFiles),
    }
}

/// Write estimates to an output file.
fn write_output(
    input_path: &Path,
    output_dir: &Path,
    format: OutputFormat,
    analysis: &Analysis,
    context: &RunContext,
    csv_bom_enabled: bool,
) -> Result<()> {
    let output_path = output_path_for(input_path, output_dir, format);
    debug!("Writing {} output: {}", format, output_path.display());

    let mut writer: Box<dyn OutputWriter> = match format {
        OutputFormat::Csv => Box::new(CsvWriter::create(&output_path, csv_bom_enabled)?),
        OutputFormat::Json => Box::new(JsonResultWriter::new(&output_path, context.clone())),
    };

    write_estimates(writer.as_mut(), analysis)
}

fn write_estimates(writer: &mut dyn OutputWriter, analysis: &Analysis) -> Result<()> {
    writer.write_header()?;
    for estimate in &analysis.estimates {
        writer.write_estimate(estimate)?;
    }
    writer.finalize()
}

/// Result of processing a single file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Number of speed estimates written.
    pub estimates: usize,
    /// Number of passages found.
    pub events: usize,
    /// Number of passages skipped as degenerate.
    pub skipped: usize,
    /// Processing duration in seconds.
    pub duration_secs: f64,
    /// Duration covered by the analyzed frames, seconds.
    pub media_duration_secs: f64,
}
