//! TOML configuration file loading and settings resolution
//!
//! Settings are layered: built-in defaults, then the configuration file
//! (`--config-file`, or `<config_dir>/Drainpipe/drainpipe.toml` when present),
//! then command-line flags. Pipeline keys may sit in a `[pipeline]` table or at
//! the top level; all keys are kebab-case.

use crate::app::cli::args::Args;
use crate::app::summary::SummaryFormat;
use crate::core::error_handling::ContextualError;
use crate::core::validation::{toml_integer_to_millis, toml_integer_to_usize};
use crate::pipeline::PipelineConfig;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {path}")]
    NotFound { path: PathBuf },

    #[error("Error reading configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Error in configuration file {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Read { .. })
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}

/// Fully resolved application settings
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    pub pipeline: PipelineConfig,
    pub summary_format: SummaryFormat,
    /// `None` means colour follows the terminal
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Default configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Drainpipe").join("drainpipe.toml"))
}

/// Read and parse the configuration file, if there is one
///
/// An explicitly named file must exist; the default location is optional.
pub async fn load_config_table(
    config_file: Option<&Path>,
) -> Result<Option<(PathBuf, toml::Table)>, ConfigError> {
    let path = match config_file {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            })
        }
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(None),
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents).map_err(|source| ConfigError::Parse {
        path: path.clone(),
        source,
    })?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(Some((path, table)))
}

/// Resolve defaults, configuration file and command line into one [`Settings`]
pub async fn resolve_settings(args: &Args) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some((path, table)) = load_config_table(args.config_file.as_deref()).await? {
        settings
            .apply_toml_values(&table)
            .map_err(|message| ConfigError::Invalid { path, message })?;
    }

    settings.apply_args(args);
    Ok(settings)
}

impl Settings {
    /// Apply TOML configuration values
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), String> {
        let pipeline = match config.get("pipeline") {
            Some(value) => value
                .as_table()
                .ok_or_else(|| "'pipeline' must be a table".to_string())?,
            None => config,
        };

        if let Some(capacity) = integer(pipeline, "capacity")? {
            self.pipeline.capacity = toml_integer_to_usize("capacity", capacity)?;
        }
        if let Some(producers) = integer(pipeline, "producers")? {
            self.pipeline.producers = toml_integer_to_usize("producers", producers)?;
        }
        if let Some(consumers) = integer(pipeline, "consumers")? {
            self.pipeline.consumers = toml_integer_to_usize("consumers", consumers)?;
        }
        if let Some(items) = integer(pipeline, "items-per-producer")? {
            self.pipeline.items_per_producer = toml_integer_to_usize("items-per-producer", items)?;
        }
        if let Some(think) = integer(pipeline, "think-time-ms")? {
            self.pipeline.think_time_ms = toml_integer_to_millis("think-time-ms", think)?;
        }
        if let Some(processing) = integer(pipeline, "processing-time-ms")? {
            self.pipeline.processing_time_ms =
                toml_integer_to_millis("processing-time-ms", processing)?;
        }
        if let Some(stop_after) = integer(pipeline, "stop-after-ms")? {
            self.pipeline.stop_after_ms = Some(toml_integer_to_millis("stop-after-ms", stop_after)?);
        }
        if let Some(true) = pipeline.get("until-done").and_then(|v| v.as_bool()) {
            self.pipeline.stop_after_ms = None;
        }

        if let Some(format) = config.get("summary-format").and_then(|v| v.as_str()) {
            self.summary_format = format.parse()?;
        }
        if let Some(color) = config.get("color").and_then(|v| v.as_bool()) {
            self.color = Some(color);
        }
        if let Some(no_color) = config.get("no-color").and_then(|v| v.as_bool()) {
            self.color = Some(!no_color);
        }
        if let Some(log_level) = config.get("log-level").and_then(|v| v.as_str()) {
            self.log_level = Some(log_level.to_string());
        }
        if let Some(log_format) = config.get("log-format").and_then(|v| v.as_str()) {
            self.log_format = Some(log_format.to_string());
        }
        if let Some(log_file) = config.get("log-file").and_then(|v| v.as_str()) {
            if log_file.eq_ignore_ascii_case("none") || log_file == "-" {
                self.log_file = None;
            } else {
                self.log_file = Some(PathBuf::from(log_file));
            }
        }

        self.pipeline
            .validate()
            .map_err(|err| err.to_string())
    }

    /// Apply command-line overrides
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(capacity) = args.capacity {
            self.pipeline.capacity = capacity;
        }
        if let Some(producers) = args.producers {
            self.pipeline.producers = producers;
        }
        if let Some(consumers) = args.consumers {
            self.pipeline.consumers = consumers;
        }
        if let Some(items) = args.items {
            self.pipeline.items_per_producer = items;
        }

        let mut pipeline = self.pipeline.clone();
        if let Some(think_time) = args.think_time {
            pipeline = pipeline.with_think_time(think_time);
        }
        if let Some(processing_time) = args.processing_time {
            pipeline = pipeline.with_processing_time(processing_time);
        }
        if args.until_done {
            pipeline = pipeline.with_stop_after(None);
        } else if let Some(stop_after) = args.stop_after {
            pipeline = pipeline.with_stop_after(Some(stop_after));
        }
        self.pipeline = pipeline;

        if let Some(format) = args
            .summary_format
            .as_deref()
            .and_then(|f| f.parse().ok())
        {
            self.summary_format = format;
        }
        if let Some(color) = args.color_override() {
            self.color = Some(color);
        }
        if args.log_level.is_some() {
            self.log_level = args.log_level.clone();
        }
        if args.log_format.is_some() {
            self.log_format = args.log_format.clone();
        }
        if let Some(log_file) = &args.log_file {
            if log_file.as_os_str().eq_ignore_ascii_case("none") {
                self.log_file = None;
            } else {
                self.log_file = Some(log_file.clone());
            }
        }
    }
}

fn integer(table: &toml::Table, key: &str) -> Result<Option<i64>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_integer()
            .map(Some)
            .ok_or_else(|| format!("'{}' must be an integer", key)),
    }
}
