//! Clock-style duration text for result files.

const MICROS_PER_SEC: u64 = 1_000_000;
const SECS_PER_DAY: u64 = 86_400;

/// Format seconds as `H:MM:SS` or `H:MM:SS.ffffff`.
///
/// Durations of a day or more get a `N day(s), ` prefix. The fractional part
/// is rounded to microseconds and omitted when zero. Negative and non-finite
/// input formats as zero.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_clock(seconds: f64) -> String {
    let total_micros = if seconds.is_finite() && seconds > 0.0 {
        (seconds * MICROS_PER_SEC as f64).round() as u64
    } else {
        0
    };

    let micros = total_micros % MICROS_PER_SEC;
    let total_secs = total_micros / MICROS_PER_SEC;
    let days = total_secs / SECS_PER_DAY;
    let rem = total_secs % SECS_PER_DAY;
    let (hours, minutes, secs) = (rem / 3600, (rem % 3600) / 60, rem % 60);

    let mut out = String::new();
    if days > 0 {
        let plural = if days == 1 { "" } else { "s" };
        out.push_str(&format!("{days} day{plural}, "));
    }
    out.push_str(&format!("{hours}:{minutes:02}:{secs:02}"));
    if micros > 0 {
        out.push_str(&format!(".{micros:06}"));
    }
    out
}
