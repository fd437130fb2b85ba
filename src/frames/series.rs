//! Per-frame pitch and intensity series.

use crate::error::{Error, Result};
use std::num::NonZeroU32;

/// Dominant frequency and intensity for every analysis frame.
///
/// Frame `i` starts at `i / frame_rate` seconds. A frequency of `0.0` means
/// no pitch was detected in that frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSeries {
    frequencies: Vec<f32>,
    intensities: Vec<f32>,
    frame_rate: NonZeroU32,
}

impl FrameSeries {
    /// Build a series from parallel arrays.
    ///
    /// Fails when the arrays differ in length, the frame rate is zero, or any
    /// value is negative, NaN or infinite.
    pub fn new(frequencies: Vec<f32>, intensities: Vec<f32>, frame_rate: u32) -> Result<Self> {
        let frame_rate =
            NonZeroU32::new(frame_rate).ok_or(Error::InvalidSampleRate { value: frame_rate })?;

        if frequencies.len() != intensities.len() {
            return Err(Error::FrameLengthMismatch {
                frequencies: frequencies.len(),
                intensities: intensities.len(),
            });
        }

        check_values(&frequencies, "frequency")?;
        check_values(&intensities, "intensity")?;

        Ok(Self {
            frequencies,
            intensities,
            frame_rate,
        })
    }

    /// Dominant frequency per frame in Hz.
    pub fn frequencies(&self) -> &[f32] {
        &self.frequencies
    }

    /// Intensity per frame.
    pub fn intensities(&self) -> &[f32] {
        &self.intensities
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> NonZeroU32 {
        self.frame_rate
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// Whether the series holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Start time of a frame in seconds.
    #[allow(clippy::cast_precision_loss)]
    pub fn time_of(&self, index: usize) -> f64 {
        index as f64 / f64::from(self.frame_rate.get())
    }

    /// Total covered duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.time_of(self.len())
    }
}

fn check_values(values: &[f32], field: &'static str) -> Result<()> {
    match values.iter().position(|v| !(v.is_finite() && *v >= 0.0)) {
        Some(index) => Err(Error::InvalidFrameValue {
            index,
            field,
            value: values[index],
        }),
        None => Ok(()),
    }
}
