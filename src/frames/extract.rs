//! Dominant-pitch frame extraction using realfft.

use crate::config::ExtractionConfig;
use crate::error::{Error, Result};
use crate::frames::FrameSeries;
use realfft::RealFftPlanner;
use realfft::num_complex::Complex;
use tracing::debug;

/// Produces one (frequency, intensity) pair per frame from mono samples.
pub trait FrameExtractor {
    /// Extract a frame series from `samples` recorded at `sample_rate` Hz.
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FrameSeries>;
}

/// Picks the loudest spectral bin in a frequency band for every frame.
///
/// Each frame is Hann-windowed and transformed with a real FFT. The peak bin
/// is refined by parabolic interpolation. Frames whose peak is quieter than
/// `magnitude_floor` times the loudest peak in the recording are reported as
/// `(0.0, 0.0)`.
#[derive(Debug, Clone)]
pub struct PeakPickingExtractor {
    fft_size: usize,
    frame_rate: u32,
    min_freq: f32,
    max_freq: f32,
    magnitude_floor: f32,
}

impl PeakPickingExtractor {
    /// Create an extractor.
    pub fn new(
        fft_size: usize,
        frame_rate: u32,
        min_freq: f32,
        max_freq: f32,
        magnitude_floor: f32,
    ) -> Self {
        Self {
            fft_size,
            frame_rate,
            min_freq,
            max_freq,
            magnitude_floor,
        }
    }

    /// Create an extractor from the `[extraction]` config section.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            config.fft_size,
            config.frame_rate,
            config.min_freq,
            config.max_freq,
            config.magnitude_floor,
        )
    }

    /// Frames per second of the produced series.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    /// Hop length in samples for audio at `sample_rate`.
    ///
    /// The frame rate must divide the sample rate exactly so frame times stay
    /// on an integer grid.
    pub fn hop_size(&self, sample_rate: u32) -> Result<usize> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate { value: sample_rate });
        }
        if self.frame_rate == 0 || sample_rate % self.frame_rate != 0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "frame rate {} must evenly divide sample rate {sample_rate}",
                    self.frame_rate
                ),
            });
        }
        Ok((sample_rate / self.frame_rate) as usize)
    }

    /// Inclusive FFT bin range covering `[min_freq, max_freq]`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn bin_range(&self, sample_rate: u32) -> Result<(usize, usize)> {
        let bin_hz = sample_rate as f32 / self.fft_size as f32;
        let nyquist_bin = self.fft_size / 2;
        // Keep one neighbour on each side for interpolation.
        let lo = ((self.min_freq / bin_hz).ceil() as usize).max(1);
        let hi = ((self.max_freq / bin_hz).floor() as usize).min(nyquist_bin - 1);

        if lo > hi {
            return Err(Error::FrameExtraction {
                reason: format!(
                    "band {}-{} Hz is empty at {sample_rate} Hz with FFT size {}",
                    self.min_freq, self.max_freq, self.fft_size
                ),
            });
        }
        Ok((lo, hi))
    }
}

impl FrameExtractor for PeakPickingExtractor {
    fn extract(&self, samples: &[f32], sample_rate: u32) -> Result<FrameSeries> {
        if self.fft_size < 4 {
            return Err(Error::FrameExtraction {
                reason: format!("FFT size {} is too small", self.fft_size),
            });
        }
        let hop = self.hop_size(sample_rate)?;
        let (lo, hi) = self.bin_range(sample_rate)?;

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(self.fft_size);
        let mut input = plan.make_input_vec();
        let mut spectrum = plan.make_output_vec();
        let mut scratch = plan.make_scratch_vec();
        let window = hann_window(self.fft_size);

        #[allow(clippy::cast_precision_loss)]
        let bin_hz = sample_rate as f32 / self.fft_size as f32;

        let mut peaks = Vec::with_capacity(samples.len().div_ceil(hop));
        for start in (0..samples.len()).step_by(hop) {
            let end = (start + self.fft_size).min(samples.len());
            let frame = &samples[start..end];

            for (i, slot) in input.iter_mut().enumerate() {
                *slot = frame.get(i).map_or(0.0, |s| s * window[i]);
            }

            plan.process_with_scratch(&mut input, &mut spectrum, &mut scratch)
                .map_err(|e| Error::FrameExtraction {
                    reason: e.to_string(),
                })?;

            peaks.push(dominant_peak(&spectrum, lo, hi, bin_hz));
        }

        let loudest = peaks.iter().map(|&(_, mag)| mag).fold(0.0_f32, f32::max);
        let floor = loudest * self.magnitude_floor;

        let (frequencies, intensities): (Vec<f32>, Vec<f32>) = peaks
            .into_iter()
            .map(|(freq, mag)| {
                if mag > 0.0 && mag >= floor {
                    (freq, mag)
                } else {
                    (0.0, 0.0)
                }
            })
            .unzip();

        debug!(
            "Extracted {} frames (hop {} samples, {} frames/s)",
            frequencies.len(),
            hop,
            self.frame_rate
        );

        FrameSeries::new(frequencies, intensities, self.frame_rate)
    }
}

/// Loudest bin in `lo..=hi`, refined by parabolic interpolation.
///
/// Returns `(frequency_hz, magnitude)`.
#[allow(clippy::cast_precision_loss)]
fn dominant_peak(spectrum: &[Complex<f32>], lo: usize, hi: usize, bin_hz: f32) -> (f32, f32) {
    let mut best = lo;
    let mut best_mag = spectrum[lo].norm();
    for (k, c) in spectrum.iter().enumerate().take(hi + 1).skip(lo + 1) {
        let mag = c.norm();
        if mag > best_mag {
            best = k;
            best_mag = mag;
        }
    }

    if best_mag <= 0.0 {
        return (0.0, 0.0);
    }

    let alpha = spectrum[best - 1].norm();
    let gamma = spectrum[best + 1].norm();
    let denom = alpha - 2.0 * best_mag + gamma;
    let offset = if denom.abs() > f32::EPSILON {
        (0.5 * (alpha - gamma) / denom).clamp(-0.5, 0.5)
    } else {
        0.0
    };

    let frequency = (best as f32 + offset) * bin_hz;
    let magnitude = (0.25 * (alpha - gamma)).mul_add(-offset, best_mag);
    (frequency, magnitude)
}

/// Symmetric Hann window.
#[allow(clippy::cast_precision_loss)]
fn hann_window(size: usize) -> Vec<f32> {
    let denom = (size - 1) as f32;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / denom).cos()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::cast_precision_loss)]
mod tests {
    use super::*;

    fn extractor() -> PeakPickingExtractor {
        PeakPickingExtractor::new(2048, 100, 50.0, 4000.0, 0.1)
    }

    fn tone(freq: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin() * 0.5
            })
            .collect()
    }

    #[test]
    fn test_hop_size_requires_exact_division() {
        let ex = extractor();
        assert_eq!(ex.hop_size(44_100).unwrap(), 441);
        assert_eq!(ex.hop_size(48_000).unwrap(), 480);

        let odd = PeakPickingExtractor::new(2048, 97, 50.0, 4000.0, 0.1);
        assert!(matches!(
            odd.hop_size(44_100).unwrap_err(),
            Error::ConfigValidation { .. }
        ));
    }

    #[test]
    fn test_frame_count_covers_all_samples() {
        let samples = vec![0.0; 44_100 + 10];
        let series = extractor().extract(&samples, 44_100).unwrap();
        assert_eq!(series.len(), 101);
        assert_eq!(series.frame_rate().get(), 100);
    }

    #[test]
    fn test_empty_input_gives_empty_series() {
        let series = extractor().extract(&[], 44_100).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_silence_is_unvoiced() {
        let series = extractor().extract(&vec![0.0; 8820], 44_100).unwrap();
        assert!(series.frequencies().iter().all(|&f| f == 0.0));
        assert!(series.intensities().iter().all(|&i| i == 0.0));
    }

    #[test]
    fn test_pure_tone_frequency_detected() {
        let samples = tone(440.0, 44_100, 1.0);
        let series = extractor().extract(&samples, 44_100).unwrap();

        // Skip the tail where the window runs past the signal.
        let full_frames = (samples.len() - 2048) / 441;
        for &f in &series.frequencies()[..full_frames] {
            assert!((f - 440.0).abs() < 10.0, "got {f} Hz");
        }
    }

    #[test]
    fn test_band_limits_are_respected() {
        let samples = tone(6000.0, 44_100, 0.2);
        let series = extractor().extract(&samples, 44_100).unwrap();
        assert!(series.frequencies().iter().all(|&f| f <= 4000.0));
    }

    #[test]
    fn test_empty_band_is_error() {
        let ex = PeakPickingExtractor::new(2048, 100, 3000.0, 1000.0, 0.1);
        assert!(matches!(
            ex.extract(&[0.0; 1000], 44_100).unwrap_err(),
            Error::FrameExtraction { .. }
        ));
    }

    #[test]
    fn test_hann_window_endpoints() {
        let w = hann_window(8);
        assert!(w[0].abs() < 1e-6);
        assert!(w[7].abs() < 1e-6);
        assert!(w.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }
}
