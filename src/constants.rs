//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "doppler-speed";

/// Speed of sound in air at roughly 20 °C, in metres per second.
pub const DEFAULT_SPEED_OF_SOUND: f64 = 343.0;

/// Number of standard deviations above the mean an intensity must exceed
/// to count as part of a passage.
pub const DEFAULT_THRESHOLD_SIGMA: f64 = 2.0;

/// Metres per second to kilometres per hour.
pub const MPS_TO_KMH: f64 = 3.6;

/// Spectral frame extraction defaults.
pub mod extraction {
    /// Analysis sample rate audio is resampled to before extraction.
    pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

    /// Frames per second produced by the extractor.
    ///
    /// Must divide the analysis sample rate evenly (441-sample hop at 44.1 kHz).
    pub const DEFAULT_FRAME_RATE: u32 = 100;

    /// FFT window length in samples.
    pub const DEFAULT_FFT_SIZE: usize = 2048;

    /// Lowest frequency considered when picking the dominant pitch.
    pub const DEFAULT_MIN_FREQ: f32 = 50.0;

    /// Highest frequency considered when picking the dominant pitch.
    pub const DEFAULT_MAX_FREQ: f32 = 4000.0;

    /// Peaks quieter than this fraction of the loudest peak are treated as unvoiced.
    pub const DEFAULT_MAGNITUDE_FLOOR: f32 = 0.1;
}

/// Output file extensions by format.
pub mod output_extensions {
    /// CSV output extension.
    pub const CSV: &str = ".speeds.csv";
    /// JSON output extension.
    pub const JSON: &str = ".speeds.json";
}

/// Suffix identifying pre-extracted frame files.
pub const FRAME_FILE_SUFFIX: &str = ".frames.csv";

/// Supported audio file extensions.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];

/// Decimal places for speed formatting.
pub const SPEED_DECIMAL_PLACES: usize = 6;

/// UTF-8 Byte Order Mark for Excel compatibility in CSV files.
pub const UTF8_BOM: &[u8; 3] = b"\xEF\xBB\xBF";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "DOPPLER_SPEED_CONFIG";
