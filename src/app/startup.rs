//! Application startup: settings, logging, signals, pipeline run, summary

use crate::app::cli::api::{resolve_settings, Args};
use crate::app::summary::render_summary;
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::logging::{init_logging, level_for_verbosity};
use crate::core::shutdown::install_signal_handlers;
use crate::core::version::banner;
use crate::pipeline::Pipeline;
use clap::Parser;
use std::io::IsTerminal;

/// Run the application and return the process exit code
pub async fn startup() -> i32 {
    let args = Args::parse();

    // Configuration is resolved before logging so the file can choose the log setup
    let settings = match resolve_settings(&args).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e.user_message().unwrap_or_else(|| e.to_string()));
            return 1;
        }
    };

    let use_color = settings
        .color
        .unwrap_or_else(|| std::io::stdout().is_terminal());
    colored::control::set_override(use_color);

    let log_level = settings
        .log_level
        .clone()
        .unwrap_or_else(|| level_for_verbosity(args.verbosity()).to_string());
    let log_file = settings
        .log_file
        .as_ref()
        .map(|path| path.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        Some(&log_level),
        settings.log_format.as_deref(),
        log_file.as_deref(),
        use_color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return 1;
    }

    log::info!("{} starting", banner());
    log::debug!("Settings: {:?}", settings);

    let pipeline = match Pipeline::new(settings.pipeline.clone()) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            log_error_with_context(&e, "Pipeline construction");
            return 1;
        }
    };

    install_signal_handlers(pipeline.shutdown_token());

    let report = match pipeline.run().await {
        Ok(report) => report,
        Err(e) => {
            log_error_with_context(&e, "Pipeline run");
            return 1;
        }
    };

    match render_summary(&report, settings.summary_format) {
        Ok(summary) => println!("{}", summary),
        Err(e) => {
            log::error!("Failed to render summary: {}", e);
            return 1;
        }
    }

    if report.is_clean() {
        0
    } else {
        log::warn!(
            "Pipeline finished with {} unit failures",
            report.failures.len()
        );
        1
    }
}
