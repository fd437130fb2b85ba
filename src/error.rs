//! Error types for doppler-speed.

/// Result type alias for doppler-speed operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for doppler-speed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration directory could not be determined.
    #[error("could not determine configuration directory for this platform")]
    ConfigDirNotFound,

    /// Failed to read configuration file.
    #[error("failed to read config file '{path}'")]
    ConfigRead {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}'")]
    ConfigParse {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying parse error.
        #[source]
        source: toml::de::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}'")]
    ConfigWrite {
        /// Path to the config file.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize configuration.
    #[error("failed to serialize config")]
    ConfigSerialize {
        /// Underlying serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Analysis was requested with a frame rate of zero.
    #[error("invalid sample rate: {value} (must be greater than zero)")]
    InvalidSampleRate {
        /// The rejected rate.
        value: u32,
    },

    /// Analysis settings are unusable (speed of sound, threshold sigma).
    #[error("invalid analysis configuration: {message}")]
    InvalidConfiguration {
        /// Description of the problem.
        message: String,
    },

    /// Frequency and intensity arrays differ in length.
    #[error("frame series length mismatch: {frequencies} frequencies vs {intensities} intensities")]
    FrameLengthMismatch {
        /// Number of frequency values.
        frequencies: usize,
        /// Number of intensity values.
        intensities: usize,
    },

    /// A frame value is negative, NaN or infinite.
    #[error("frame {index}: {field} must be finite and non-negative, got {value}")]
    InvalidFrameValue {
        /// Zero-based frame index.
        index: usize,
        /// Which series holds the value.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// No valid input files found.
    #[error("no valid audio or frame files found in the provided paths")]
    NoValidInputFiles,

    /// `--stdout` was given more or fewer than one input file.
    #[error("--stdout requires exactly one input file, found {found}")]
    StdoutRequiresSingleInput {
        /// Number of input files collected.
        found: usize,
    },

    /// Failed to open audio file.
    #[error("failed to open audio file '{path}'")]
    AudioOpen {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Failed to decode audio.
    #[error("failed to decode audio from '{path}'")]
    AudioDecode {
        /// Path to the audio file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// No audio tracks found.
    #[error("no audio tracks found in '{path}'")]
    NoAudioTracks {
        /// Path to the audio file.
        path: std::path::PathBuf,
    },

    /// Failed to resample audio.
    #[error("failed to resample audio: {reason}")]
    Resample {
        /// Description of the resampling failure.
        reason: String,
    },

    /// Spectral frame extraction failed.
    #[error("frame extraction failed: {reason}")]
    FrameExtraction {
        /// Description of the failure.
        reason: String,
    },

    /// Failed to open or read a frame file.
    #[error("failed to read frame file '{path}'")]
    FrameFileRead {
        /// Path to the frame file.
        path: std::path::PathBuf,
        /// Underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Frame file content is malformed.
    #[error("invalid frame file '{path}': {message}")]
    InvalidFrameFile {
        /// Path to the frame file.
        path: std::path::PathBuf,
        /// Description of the format error.
        message: String,
    },

    /// Failed to create output directory.
    #[error("failed to create output directory '{path}'")]
    OutputDirCreateFailed {
        /// Path to the output directory.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write JSON output file.
    #[error("failed to write JSON output file '{path}'")]
    JsonWrite {
        /// Path to the JSON file.
        path: std::path::PathBuf,
        /// Underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}
