//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

fn parse_float(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() {
        return Err(format!("'{s}' is not a finite number"));
    }

    Ok(value)
}

/// Parse a strictly positive float (speed of sound).
pub fn parse_positive_float(s: &str) -> Result<f64, String> {
    let value = parse_float(s)?;

    if value <= 0.0 {
        return Err(format!("value must be greater than 0, got {value}"));
    }

    Ok(value)
}

/// Parse a float that may be zero but not negative (threshold sigma).
pub fn parse_non_negative_float(s: &str) -> Result<f64, String> {
    let value = parse_float(s)?;

    if value < 0.0 {
        return Err(format!("value must not be negative, got {value}"));
    }

    Ok(value)
}
