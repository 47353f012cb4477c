//! Plansheet CLI entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use plansheet::PlansheetError;
use plansheet_cli::{Args, error_adapter::to_reportables, exit_code};

fn main() {
    miette::set_panic_hook();

    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(input_path = args.input, log_level:?; "Starting plansheet");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = plansheet_cli::run(&args) {
        report(&err);
        process::exit(exit_code(&err));
    }

    info!("Completed successfully");
}

/// Log every problem in `err` as a rendered miette report.
fn report(err: &PlansheetError) {
    if let PlansheetError::Validation(validation) = err {
        error!(
            errors = validation.errors().count(),
            problems = validation.diagnostics().len();
            "Metadata rejected by validation"
        );
    }

    let reporter = miette::GraphicalReportHandler::new();
    for reportable in to_reportables(err) {
        let mut writer = String::new();
        match reporter.render_report(&mut writer, &reportable) {
            Ok(()) => error!("{writer}"),
            Err(_) => error!("{reportable}"),
        }
    }
}
