//! Configuration validation.

use crate::analysis::AnalysisSettings;
use crate::config::{Config, ExtractionConfig};
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.defaults.formats.is_empty() {
        return Err(invalid("at least one output format is required"));
    }

    AnalysisSettings::from(&config.analysis)
        .validate()
        .map_err(|e| match e {
            Error::InvalidConfiguration { message } => Error::ConfigValidation { message },
            other => other,
        })?;

    validate_extraction(&config.extraction)
}

/// Validate extraction settings.
fn validate_extraction(extraction: &ExtractionConfig) -> Result<()> {
    if extraction.sample_rate == 0 {
        return Err(invalid("sample_rate must be greater than zero"));
    }

    if extraction.frame_rate == 0 || extraction.sample_rate % extraction.frame_rate != 0 {
        return Err(invalid(format!(
            "frame_rate must evenly divide sample_rate ({}), got {}",
            extraction.sample_rate, extraction.frame_rate
        )));
    }

    if extraction.fft_size < 4 {
        return Err(invalid(format!(
            "fft_size must be at least 4, got {}",
            extraction.fft_size
        )));
    }

    #[allow(clippy::cast_precision_loss)]
    let nyquist = extraction.sample_rate as f32 / 2.0;
    if !(extraction.min_freq >= 0.0
        && extraction.min_freq < extraction.max_freq
        && extraction.max_freq <= nyquist)
    {
        return Err(invalid(format!(
            "frequency band must satisfy 0 <= min_freq < max_freq <= {nyquist}, got {}-{}",
            extraction.min_freq, extraction.max_freq
        )));
    }

    if !(0.0..=1.0).contains(&extraction.magnitude_floor) {
        return Err(invalid(format!(
            "magnitude_floor must be between 0.0 and 1.0, got {}",
            extraction.magnitude_floor
        )));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> Error {
    Error::ConfigValidation {
        message: message.into(),
    }
}
