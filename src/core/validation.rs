//! Validation utilities for CLI arguments and configuration values
//!
//! Used as clap `value_parser` functions and by the TOML config layer, so both
//! sources reject the same inputs with the same messages.

use std::time::Duration;

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a count that may legitimately be zero (e.g. number of producers)
pub fn validate_count(value: &str) -> Result<usize, String> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a valid non-negative integer", value))
}

/// Validate a millisecond duration and convert it
pub fn validate_millis(value: &str) -> Result<Duration, String> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| format!("'{}' is not a valid duration in milliseconds", value))
}

/// Convert a TOML integer into a `usize`, rejecting negatives
pub fn toml_integer_to_usize(key: &str, value: i64) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("'{}' must not be negative (got {})", key, value))
}

/// Convert a TOML integer into a `u64` millisecond count, rejecting negatives
pub fn toml_integer_to_millis(key: &str, value: i64) -> Result<u64, String> {
    u64::try_from(value).map_err(|_| format!("'{}' must not be negative (got {})", key, value))
}
