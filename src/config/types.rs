//! Configuration type definitions.

use crate::analysis::AnalysisSettings;
use crate::constants::{DEFAULT_SPEED_OF_SOUND, DEFAULT_THRESHOLD_SIGMA, extraction};
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output settings.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Passage detection and speed estimation settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Spectral frame extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Default output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Output formats.
    pub formats: Vec<OutputFormat>,

    /// Prepend a UTF-8 BOM to CSV output.
    pub csv_bom: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            formats: vec![OutputFormat::Csv],
            csv_bom: true,
        }
    }
}

/// Passage detection and speed estimation settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Speed of sound in m/s. Adjust for air temperature or other media.
    pub speed_of_sound: f64,

    /// Standard deviations above mean intensity for a frame to belong to a passage.
    pub threshold_sigma: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            speed_of_sound: DEFAULT_SPEED_OF_SOUND,
            threshold_sigma: DEFAULT_THRESHOLD_SIGMA,
        }
    }
}

impl From<&AnalysisConfig> for AnalysisSettings {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            speed_of_sound: config.speed_of_sound,
            threshold_sigma: config.threshold_sigma,
        }
    }
}

/// Spectral frame extraction settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Sample rate audio is resampled to before extraction, in Hz.
    pub sample_rate: u32,

    /// Frames per second; must divide `sample_rate` evenly.
    pub frame_rate: u32,

    /// FFT window length in samples.
    pub fft_size: usize,

    /// Lower bound of the pitch search band in Hz.
    pub min_freq: f32,

    /// Upper bound of the pitch search band in Hz.
    pub max_freq: f32,

    /// Fraction of the loudest peak below which a frame counts as unvoiced.
    pub magnitude_floor: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            sample_rate: extraction::DEFAULT_SAMPLE_RATE,
            frame_rate: extraction::DEFAULT_FRAME_RATE,
            fft_size: extraction::DEFAULT_FFT_SIZE,
            min_freq: extraction::DEFAULT_MIN_FREQ,
            max_freq: extraction::DEFAULT_MAX_FREQ,
            magnitude_floor: extraction::DEFAULT_MAGNITUDE_FLOOR,
        }
    }
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Time (s),Speed (m/s)` table.
    Csv,
    /// JSON document with settings, estimates and summary.
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}
