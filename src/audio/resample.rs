//! Audio resampling using rubato.

use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};
use tracing::debug;

/// Input block size fed to the FFT resampler.
const CHUNK_SIZE: usize = 1024;

/// Resample mono audio to `to_rate`.
///
/// Returns the input unchanged if already at the target rate. The final
/// partial block is zero-padded and the output trimmed to the proportional
/// length.
pub fn resample(samples: Vec<f32>, from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate {
        return Ok(samples);
    }
    if from_rate == 0 || to_rate == 0 {
        return Err(Error::Resample {
            reason: format!("cannot resample between {from_rate} Hz and {to_rate} Hz"),
        });
    }

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let block = resampler.input_frames_next();
    let expected = expected_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(expected + CHUNK_SIZE);

    let mut blocks = samples.chunks_exact(block);
    for chunk in blocks.by_ref() {
        output.extend(process_block(&mut resampler, chunk)?);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let mut padded = tail.to_vec();
        padded.resize(block, 0.0);
        output.extend(process_block(&mut resampler, &padded)?);
    }

    output.truncate(expected);
    debug!(
        "Resampled {} samples at {} Hz to {} samples at {} Hz",
        samples.len(),
        from_rate,
        output.len(),
        to_rate
    );
    Ok(output)
}

/// Run one fixed-size mono block through the resampler.
fn process_block(resampler: &mut Fft<f32>, block: &[f32]) -> Result<Vec<f32>> {
    let input = SequentialSlice::new(block, 1, block.len()).map_err(|e| Error::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    Ok(resampled.take_data())
}

/// Output length proportional to the input length.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn expected_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).ceil() as usize
}
