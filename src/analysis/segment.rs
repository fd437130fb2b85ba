//! Passage segmentation.
//!
//! Frames louder than `mean + sigma * stddev` are candidates. Candidates are
//! grouped into passages until the gap to the previous candidate exceeds one
//! second's worth of frames.

use crate::constants::DEFAULT_THRESHOLD_SIGMA;
use std::num::NonZeroU32;

/// Frame indices belonging to one vehicle passage.
///
/// Indices are non-empty and strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassageEvent {
    indices: Vec<usize>,
}

impl PassageEvent {
    /// Build an event from frame indices.
    ///
    /// Returns `None` if `indices` is empty or not strictly increasing.
    pub fn new(indices: Vec<usize>) -> Option<Self> {
        if indices.is_empty() || indices.windows(2).any(|w| w[1] <= w[0]) {
            return None;
        }
        Some(Self { indices })
    }

    /// Frame indices in ascending order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// First frame of the passage.
    pub fn first(&self) -> usize {
        self.indices[0]
    }

    /// Last frame of the passage.
    pub fn last(&self) -> usize {
        self.indices[self.indices.len() - 1]
    }
}

enum Grouping {
    Idle,
    Open { indices: Vec<usize>, last: usize },
}

/// Segment an intensity series into passages using a 2-sigma threshold.
pub fn segment(intensities: &[f32], sample_rate: NonZeroU32) -> Vec<PassageEvent> {
    segment_with_sigma(intensities, sample_rate, DEFAULT_THRESHOLD_SIGMA)
}

/// Segment an intensity series into passages.
///
/// `sample_rate` is the frame rate of the series; a gap of more than that
/// many frames between two candidates starts a new passage. Non-finite
/// intensities never become candidates.
pub fn segment_with_sigma(
    intensities: &[f32],
    sample_rate: NonZeroU32,
    sigma: f64,
) -> Vec<PassageEvent> {
    let Some(threshold) = intensity_threshold(intensities, sigma) else {
        return Vec::new();
    };
    let max_gap = usize::try_from(sample_rate.get()).unwrap_or(usize::MAX);

    let mut events = Vec::new();
    let mut state = Grouping::Idle;

    for (index, &value) in intensities.iter().enumerate() {
        if !value.is_finite() || f64::from(value) <= threshold {
            continue;
        }

        state = match state {
            Grouping::Idle => Grouping::Open {
                indices: vec![index],
                last: index,
            },
            Grouping::Open { indices, last } if index - last > max_gap => {
                events.push(PassageEvent { indices });
                Grouping::Open {
                    indices: vec![index],
                    last: index,
                }
            }
            Grouping::Open { mut indices, .. } => {
                indices.push(index);
                Grouping::Open {
                    indices,
                    last: index,
                }
            }
        };
    }

    // The trailing passage is never closed by a gap.
    if let Grouping::Open { indices, .. } = state {
        events.push(PassageEvent { indices });
    }

    events
}

/// `mean + sigma * stddev` over the finite values of the series (population
/// statistics).
///
/// Returns `None` when the series has no finite values.
pub fn intensity_threshold(intensities: &[f32], sigma: f64) -> Option<f64> {
    let finite = || {
        intensities
            .iter()
            .filter(|v| v.is_finite())
            .map(|&v| f64::from(v))
    };

    let count = finite().count();
    if count == 0 {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let n = count as f64;
    let mean = finite().sum::<f64>() / n;
    let variance = finite()
        .map(|v| {
            let d = v - mean;
            d * d
        })
        .sum::<f64>()
        / n;

    Some(sigma.mul_add(variance.sqrt(), mean))
}
