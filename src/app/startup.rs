//! Application startup: arguments, configuration, logging, then the demo

use crate::app::cli::api::{Args, DemoConfig};
use crate::app::demo::{run_demo, DemoReport};
use crate::app::error::{AppError, AppResult};
use crate::core::logging::{init_logging, LogSettings};
use crate::core::version;
use clap::Parser;
use colored::Colorize;

pub fn startup() -> AppResult<()> {
    let args = Args::parse();

    let loaded = DemoConfig::load(args.config_file.as_deref());
    // Logging has to work before a bad config file can be reported
    let mut config = match loaded {
        Ok(config) => config,
        Err(e) => {
            let mut fallback = DemoConfig::default();
            fallback.apply_args(&args);
            start_logging(&fallback.log_settings())?;
            return Err(e.into());
        }
    };
    config.apply_args(&args);
    let settings = config.log_settings();
    start_logging(&settings)?;
    colored::control::set_override(settings.color);

    log::info!(
        "pubqueue {} ({}, built {}) starting",
        env!("CARGO_PKG_VERSION"),
        version::git_hash(),
        version::build_time()
    );
    config.validate()?;
    log::debug!("Final configuration: {:#?}", config);

    let report = run_demo(&config)?;
    print_summary(&report);
    Ok(())
}

fn start_logging(settings: &LogSettings) -> AppResult<()> {
    init_logging(settings).map_err(|e| {
        eprintln!("Error initialising logging: {}", e);
        AppError::Logging {
            message: e.to_string(),
        }
    })
}

fn print_summary(report: &DemoReport) {
    println!("All threads finished. Destroying queue.");
    let stats = &report.stats;
    println!(
        "{} {} produced, {} queued, {} discarded, {} evicted",
        "Summary:".bold(),
        report.produced(),
        stats.enqueued,
        stats.discarded,
        stats.evicted
    );
    for subscriber in &report.subscribers {
        println!(
            "  {}: {} received [{}]",
            subscriber.name.green(),
            subscriber.received.len(),
            subscriber.received.join(", ")
        );
    }
}
