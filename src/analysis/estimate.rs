//! Doppler speed estimation for a single passage.

use crate::analysis::PassageEvent;
use crate::constants::MPS_TO_KMH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;

/// Direction of travel inferred from the sign of the pitch shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Approach pitch higher than recede pitch.
    LeftToRight,
    /// Recede pitch higher than or equal to approach pitch.
    RightToLeft,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LeftToRight => write!(f, "left-to-right"),
            Self::RightToLeft => write!(f, "right-to-left"),
        }
    }
}

/// Speed estimate for one passage.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedEstimate {
    /// Time of peak intensity in seconds.
    pub time_secs: f64,
    /// Estimated speed in metres per second (never negative).
    pub speed_mps: f64,
    /// Frame index of peak intensity.
    pub peak_index: usize,
    /// Frequency at the peak, taken as the unshifted source frequency.
    pub peak_frequency: f64,
    /// Mean frequency of frames before the peak.
    pub approach_frequency: f64,
    /// Mean frequency of frames after the peak.
    pub recede_frequency: f64,
    /// Inferred direction of travel.
    pub direction: Direction,
}

impl SpeedEstimate {
    /// Estimated speed in kilometres per hour.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_mps * MPS_TO_KMH
    }
}

/// Why a passage produced no estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No pitch at the peak frame; the Doppler ratio would divide by zero.
    ZeroPeakFrequency,
    /// No usable frames before the peak.
    EmptyApproach,
    /// No usable frames after the peak.
    EmptyRecede,
    /// A frequency used by the estimate is NaN or infinite.
    NonFiniteFrequency,
    /// The event refers to a frame outside the series.
    IndexOutOfRange {
        /// Offending frame index.
        index: usize,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPeakFrequency => write!(f, "no pitch at peak frame"),
            Self::EmptyApproach => write!(f, "no frames before peak"),
            Self::EmptyRecede => write!(f, "no frames after peak"),
            Self::NonFiniteFrequency => write!(f, "non-finite frequency"),
            Self::IndexOutOfRange { index } => write!(f, "frame {index} outside series"),
        }
    }
}

/// Estimate the speed of one passage from its pitch shift.
///
/// The loudest frame (first one on ties) is the moment of closest approach and
/// its frequency the true source frequency. Speed is
/// `speed_of_sound * |f_approach - f_recede| / (2 * f_peak)`.
///
/// `sample_rate` is the frame rate of `frequencies`/`intensities`.
pub fn estimate(
    event: &PassageEvent,
    frequencies: &[f32],
    intensities: &[f32],
    sample_rate: NonZeroU32,
    speed_of_sound: f64,
) -> Result<SpeedEstimate, SkipReason> {
    let peak_index = peak_frame(event, intensities)?;
    let peak_frequency = frequencies
        .get(peak_index)
        .map(|&f| f64::from(f))
        .ok_or(SkipReason::IndexOutOfRange { index: peak_index })?;

    if !peak_frequency.is_finite() {
        return Err(SkipReason::NonFiniteFrequency);
    }
    if peak_frequency <= 0.0 {
        return Err(SkipReason::ZeroPeakFrequency);
    }

    let indices = event.indices();
    let split = indices.partition_point(|&i| i < peak_index);
    let before = &indices[..split];
    let after = &indices[split + 1..];

    let approach_frequency =
        mean_frequency(before, frequencies)?.ok_or(SkipReason::EmptyApproach)?;
    let recede_frequency = mean_frequency(after, frequencies)?.ok_or(SkipReason::EmptyRecede)?;

    let (direction, shift) = if approach_frequency > recede_frequency {
        (
            Direction::LeftToRight,
            approach_frequency - recede_frequency,
        )
    } else {
        (
            Direction::RightToLeft,
            recede_frequency - approach_frequency,
        )
    };

    let speed_mps = speed_of_sound * shift / (2.0 * peak_frequency);

    #[allow(clippy::cast_precision_loss)]
    let time_secs = peak_index as f64 / f64::from(sample_rate.get());

    Ok(SpeedEstimate {
        time_secs,
        speed_mps,
        peak_index,
        peak_frequency,
        approach_frequency,
        recede_frequency,
        direction,
    })
}

/// Index of the loudest frame in the event, first one on ties.
fn peak_frame(event: &PassageEvent, intensities: &[f32]) -> Result<usize, SkipReason> {
    let mut peak: Option<(usize, f32)> = None;

    for &index in event.indices() {
        let value = *intensities
            .get(index)
            .ok_or(SkipReason::IndexOutOfRange { index })?;
        match peak {
            Some((_, best)) if value <= best => {}
            _ => peak = Some((index, value)),
        }
    }

    // PassageEvent is never empty.
    Ok(peak.map_or(event.first(), |(index, _)| index))
}

/// Mean frequency over `indices`, `None` if empty.
fn mean_frequency(indices: &[usize], frequencies: &[f32]) -> Result<Option<f64>, SkipReason> {
    if indices.is_empty() {
        return Ok(None);
    }

    let mut sum = 0.0;
    for &index in indices {
        let value = frequencies
            .get(index)
            .ok_or(SkipReason::IndexOutOfRange { index })?;
        sum += f64::from(*value);
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = sum / indices.len() as f64;
    if mean.is_finite() {
        Ok(Some(mean))
    } else {
        Err(SkipReason::NonFiniteFrequency)
    }
}
