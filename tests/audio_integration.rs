//! End-to-end runs over synthesized WAV recordings.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::f64::consts::TAU;
use std::path::Path;
use tempfile::TempDir;

fn doppler(config_dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("doppler-speed");
    cmd.env("DOPPLER_SPEED_CONFIG", config_dir.join("config.toml"))
        .env_remove("RUST_LOG")
        .env_remove("DOPPLER_SAMPLE_RATE")
        .env_remove("DOPPLER_FRAME_RATE")
        .env_remove("DOPPLER_SPEED_OF_SOUND")
        .env_remove("DOPPLER_THRESHOLD_SIGMA");
    cmd
}

/// Silence with one passing tone centred at `peak_secs`.
///
/// Loudness rises and falls linearly over `half_width` seconds either side of
/// the peak while the pitch sweeps from `f_high` down to `f_low`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn write_passage_wav(
    path: &Path,
    sample_rate: u32,
    secs: f64,
    peak_secs: f64,
    f_high: f64,
    f_low: f64,
) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();

    let half_width = 2.0;
    let rate = f64::from(sample_rate);
    let total = (secs * rate) as usize;
    let mut phase = 0.0_f64;

    for n in 0..total {
        let t = n as f64 / rate;
        let offset = t - peak_secs;
        let amplitude = (1.0 - offset.abs() / half_width).max(0.0);

        // Linear sweep across the loud window.
        let progress = ((offset + half_width) / (2.0 * half_width)).clamp(0.0, 1.0);
        let freq = f_high + (f_low - f_high) * progress;
        phase = (phase + TAU * freq / rate) % TAU;

        let sample = amplitude * 0.8 * phase.sin() * f64::from(i16::MAX);
        writer.write_sample(sample as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn data_rows(csv: &str) -> Vec<(String, f64)> {
    csv.trim_start_matches('\u{feff}')
        .lines()
        .skip(1)
        .map(|line| {
            let (time, speed) = line.rsplit_once(',').unwrap();
            (time.to_string(), speed.parse().unwrap())
        })
        .collect()
}

#[test]
fn test_wav_passage_yields_one_estimate() {
    let config = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let wav = data.path().join("street.wav");
    write_passage_wav(&wav, 44_100, 12.0, 6.0, 540.0, 460.0);

    doppler(config.path())
        .args(["-q", "-f", "csv,json"])
        .arg(&wav)
        .assert()
        .success();

    let csv = std::fs::read_to_string(data.path().join("street.speeds.csv")).unwrap();
    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 1, "unexpected rows: {csv}");

    let (time, speed) = &rows[0];
    assert!(time.starts_with("0:00:05") || time.starts_with("0:00:06"), "{time}");
    // Sweep of 80 Hz around 500 Hz; the loud core sees a fraction of it.
    assert!(*speed > 1.0 && *speed < 30.0, "speed {speed}");

    let json: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(data.path().join("street.speeds.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(json["estimates"][0]["direction"], "left_to_right");
    assert_eq!(json["summary"]["passages"], 1);
}

#[test]
fn test_wav_is_resampled_to_analysis_rate() {
    let config = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let wav = data.path().join("street48k.wav");
    write_passage_wav(&wav, 48_000, 12.0, 6.0, 540.0, 460.0);

    doppler(config.path())
        .arg("--stdout")
        .arg(&wav)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Time (s),Speed (m/s)\n0:00:0"));
}

#[test]
fn test_silent_wav_has_no_estimates() {
    let config = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let wav = data.path().join("quiet.wav");

    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 44_100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&wav, spec).unwrap();
    for _ in 0..(44_100 * 2 * 2) {
        writer.write_sample(0_i16).unwrap();
    }
    writer.finalize().unwrap();

    doppler(config.path())
        .arg("--stdout")
        .arg(&wav)
        .assert()
        .success()
        .stdout("Time (s),Speed (m/s)\n");
}

#[test]
fn test_frame_rate_must_divide_sample_rate() {
    let config = TempDir::new().unwrap();
    let data = TempDir::new().unwrap();
    let wav = data.path().join("street.wav");
    write_passage_wav(&wav, 44_100, 2.0, 1.0, 540.0, 460.0);

    doppler(config.path())
        .args(["--frame-rate", "97"])
        .arg(&wav)
        .assert()
        .failure()
        .stderr(predicate::str::contains("frame_rate must evenly divide"));
}
