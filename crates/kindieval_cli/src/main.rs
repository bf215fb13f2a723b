//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `kindieval_core` linkage.
//! - Exercise the config, logging and storage bootstrap end to end.
//!
//! Usage: `kindieval_cli [--config <path>] [command]`
//! - no command prints ping and version.
//! - `classify <text>` prints the suggested domain.
//! - `catalog` seeds reference data and prints the catalog.
//! - `dashboard` seeds reference data and prints the dashboard as JSON.
//!
//! The config path defaults to `kindieval.json`; a missing file means
//! in-memory storage with summaries disabled.

use kindieval_core::{classify_domain, Tracker, TrackerError};
use std::process::ExitCode;

const DEFAULT_CONFIG_PATH: &str = "kindieval.json";

fn main() -> ExitCode {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = match take_config_flag(&mut args) {
        Ok(path) => path,
        Err(message) => {
            eprintln!("error: {message}");
            return ExitCode::from(2);
        }
    };

    match args.first().map(String::as_str) {
        None => {
            println!("kindieval_core ping={}", kindieval_core::ping());
            println!("kindieval_core version={}", kindieval_core::core_version());
            ExitCode::SUCCESS
        }
        Some("classify") => {
            let text = args[1..].join(" ");
            match classify_domain(&text) {
                Some(domain) => println!("{}", domain.label()),
                None => println!("(no match)"),
            }
            ExitCode::SUCCESS
        }
        Some("catalog") => report(print_catalog(&config_path)),
        Some("dashboard") => report(print_dashboard(&config_path)),
        Some(other) => {
            eprintln!("unknown command `{other}`; expected classify|catalog|dashboard");
            ExitCode::from(2)
        }
    }
}

/// Removes `--config <path>` from `args` and returns the path to use.
fn take_config_flag(args: &mut Vec<String>) -> Result<String, String> {
    let Some(index) = args.iter().position(|arg| arg == "--config") else {
        return Ok(DEFAULT_CONFIG_PATH.to_string());
    };
    if index + 1 >= args.len() {
        return Err("--config requires a path".to_string());
    }
    let path = args.remove(index + 1);
    args.remove(index);
    Ok(path)
}

fn report(result: Result<(), TrackerError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn open_seeded(config_path: &str) -> Result<Tracker, TrackerError> {
    let tracker = Tracker::from_config_file(config_path)?;
    tracker.seed_reference_data()?;
    Ok(tracker)
}

fn print_catalog(config_path: &str) -> Result<(), TrackerError> {
    let tracker = open_seeded(config_path)?;
    for target in tracker.catalog()? {
        println!(
            "{}\t{}\t{}\t{}",
            target.code,
            target.age_band.label(),
            target.domain.label(),
            target.content
        );
    }
    Ok(())
}

fn print_dashboard(config_path: &str) -> Result<(), TrackerError> {
    let tracker = open_seeded(config_path)?;
    let snapshot = tracker.dashboard()?;
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("error: failed to render dashboard: {err}"),
    }
    Ok(())
}
