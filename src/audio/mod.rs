//! Audio decoding and resampling ahead of frame extraction.

mod decode;
mod resample;

pub use decode::{DecodedAudio, decode_audio_file};
pub use resample::resample;
