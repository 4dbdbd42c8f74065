//! CLI TOML configuration tests
//!
//! Tests for configuration layering: defaults, file values, then CLI overrides.

use clap::Parser;
use drainpipe::app::cli::api::{Args, Settings};
use drainpipe::app::summary::SummaryFormat;
use drainpipe::pipeline::PipelineConfig;
use toml::Table;

#[test]
fn test_defaults_without_file_or_flags() {
    let mut settings = Settings::default();
    settings.apply_args(&Args::try_parse_from(["drainpipe"]).unwrap());

    assert_eq!(settings.pipeline, PipelineConfig::default());
    assert_eq!(settings.summary_format, SummaryFormat::Text);
    assert_eq!(settings.color, None);
}

#[test]
fn test_cli_overrides_toml() {
    let mut settings = Settings::default();

    let mut pipeline = Table::new();
    pipeline.insert("capacity".to_string(), toml::Value::Integer(9));
    pipeline.insert("producers".to_string(), toml::Value::Integer(4));
    let mut config = Table::new();
    config.insert("pipeline".to_string(), toml::Value::Table(pipeline));
    config.insert("color".to_string(), toml::Value::Boolean(true));
    settings.apply_toml_values(&config).unwrap();

    let args = Args::try_parse_from(["drainpipe", "--capacity", "2", "--no-color"]).unwrap();
    settings.apply_args(&args);

    assert_eq!(settings.pipeline.capacity, 2);
    assert_eq!(settings.pipeline.producers, 4);
    assert_eq!(settings.color, Some(false));
}

#[test]
fn test_until_done_in_file_can_be_overridden_by_timer() {
    let mut settings = Settings::default();

    let mut config = Table::new();
    config.insert("until-done".to_string(), toml::Value::Boolean(true));
    settings.apply_toml_values(&config).unwrap();
    assert_eq!(settings.pipeline.stop_after_ms, None);

    let args = Args::try_parse_from(["drainpipe", "--stop-after-ms", "1500"]).unwrap();
    settings.apply_args(&args);
    assert_eq!(settings.pipeline.stop_after_ms, Some(1500));
}

#[test]
fn test_negative_durations_rejected() {
    let mut settings = Settings::default();

    let mut config = Table::new();
    config.insert("think-time-ms".to_string(), toml::Value::Integer(-5));
    let err = settings.apply_toml_values(&config).unwrap_err();

    assert!(err.contains("think-time-ms"));
}
