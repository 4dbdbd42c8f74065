//! Command-line arguments
//!
//! Every pipeline option is optional here so that values missing on the
//! command line fall through to the configuration file and then to defaults.

use crate::core::validation::{validate_count, validate_millis, validate_positive_int};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "drainpipe")]
#[command(about = "Bounded producer/consumer pipeline with graceful shutdown")]
#[command(version)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Queue capacity
    #[arg(short = 'b', long = "capacity", value_name = "COUNT", value_parser = validate_positive_int)]
    pub capacity: Option<usize>,

    /// Number of producers
    #[arg(short = 'p', long = "producers", value_name = "COUNT", value_parser = validate_count)]
    pub producers: Option<usize>,

    /// Number of consumers
    #[arg(short = 'k', long = "consumers", value_name = "COUNT", value_parser = validate_positive_int)]
    pub consumers: Option<usize>,

    /// Items emitted by each producer
    #[arg(short = 'n', long = "items", value_name = "COUNT", value_parser = validate_count)]
    pub items: Option<usize>,

    /// Delay before each produced item
    #[arg(long = "think-time-ms", value_name = "MILLIS", value_parser = validate_millis)]
    pub think_time: Option<Duration>,

    /// Time spent processing each consumed item
    #[arg(long = "processing-time-ms", value_name = "MILLIS", value_parser = validate_millis)]
    pub processing_time: Option<Duration>,

    /// Stop the pipeline after this long
    #[arg(
        short = 's',
        long = "stop-after-ms",
        value_name = "MILLIS",
        value_parser = validate_millis,
        conflicts_with = "until_done"
    )]
    pub stop_after: Option<Duration>,

    /// Run until every producer has emitted all of its items
    #[arg(short = 'u', long = "until-done")]
    pub until_done: bool,

    /// Summary output format
    #[arg(long = "summary-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub summary_format: Option<String>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Decrease log verbosity (repeatable)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, conflicts_with = "verbose")]
    pub quiet: u8,
}

impl Args {
    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, otherwise `None` (auto)
    pub fn color_override(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }

    /// Net `-v`/`-q` count
    pub fn verbosity(&self) -> i8 {
        let verbose = i8::try_from(self.verbose).unwrap_or(i8::MAX);
        let quiet = i8::try_from(self.quiet).unwrap_or(i8::MAX);
        verbose.saturating_sub(quiet)
    }
}
