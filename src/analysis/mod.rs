//! Passage detection and Doppler speed estimation.

mod estimate;
mod segment;

pub use estimate::{Direction, SkipReason, SpeedEstimate, estimate};
pub use segment::{PassageEvent, intensity_threshold, segment, segment_with_sigma};

use crate::constants::{DEFAULT_SPEED_OF_SOUND, DEFAULT_THRESHOLD_SIGMA};
use crate::error::{Error, Result};
use crate::frames::FrameSeries;
use tracing::debug;

/// Tunable parameters of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisSettings {
    /// Propagation speed of sound in the medium, m/s.
    pub speed_of_sound: f64,
    /// Standard deviations above the mean for a frame to count as loud.
    pub threshold_sigma: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            threshold_sigma: DEFAULT_THRESHOLD_SIGMA,
        }
    }
}

impl AnalysisSettings {
    /// Reject settings that would make every estimate meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.speed_of_sound.is_finite() && self.speed_of_sound > 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "speed of sound must be a positive number, got {}",
                    self.speed_of_sound
                ),
            });
        }

        if !(self.threshold_sigma.is_finite() && self.threshold_sigma >= 0.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "threshold sigma must be non-negative, got {}",
                    self.threshold_sigma
                ),
            });
        }

        Ok(())
    }
}

/// Outcome of analyzing one frame series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Analysis {
    /// Estimates in ascending time order.
    pub estimates: Vec<SpeedEstimate>,
    /// Number of passages found by segmentation.
    pub events: usize,
    /// Number of passages that produced no estimate.
    pub skipped: usize,
}

/// Detect passages in `series` and estimate a speed for each.
///
/// Degenerate passages are skipped without failing the run. Invalid settings
/// fail before any passage is examined.
pub fn run(series: &FrameSeries, settings: &AnalysisSettings) -> Result<Analysis> {
    settings.validate()?;

    let rate = series.frame_rate();
    let events = segment_with_sigma(series.intensities(), rate, settings.threshold_sigma);
    debug!("Found {} passage(s) in {} frames", events.len(), series.len());

    let mut analysis = Analysis {
        estimates: Vec::with_capacity(events.len()),
        events: events.len(),
        skipped: 0,
    };

    for event in &events {
        match estimate(
            event,
            series.frequencies(),
            series.intensities(),
            rate,
            settings.speed_of_sound,
        ) {
            Ok(est) => {
                debug!(
                    "Passage at {:.2}s: {:.2} m/s ({})",
                    est.time_secs, est.speed_mps, est.direction
                );
                analysis.estimates.push(est);
            }
            Err(reason) => {
                debug!(
                    "Skipping passage at frames {}..={}: {}",
                    event.first(),
                    event.last(),
                    reason
                );
                analysis.skipped += 1;
            }
        }
    }

    Ok(analysis)
}
