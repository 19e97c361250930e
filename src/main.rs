//! pawpulse command-line entry point.

use std::{env, error::Error, process};

use pawpulse::{
    cli::{CliService, formatting::format_error},
    config::Config,
    tracing_config,
};
use tracing::{debug, instrument};

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    };

    let is_watch = matches!(
        (args.first().map(String::as_str), args.get(1).map(String::as_str)),
        (Some("audio"), Some("watch"))
    );
    let _log_guard = if is_watch {
        Some(tracing_config::init_with_file(config.general.log_level)?)
    } else {
        tracing_config::init(config.general.log_level)?;
        None
    };

    run_cli_command(config, &args)
}

/// Executes CLI commands through the CliService.
///
/// Exits with status 1 after printing the error when the command fails.
///
/// # Errors
/// Only returns errors from setting up the service itself.
#[instrument(skip(config))]
fn run_cli_command(config: Config, args: &[String]) -> Result<(), Box<dyn Error>> {
    let cli_service = CliService::new(config);

    let category = args.first().map(|s| s.as_str()).unwrap_or("help");
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("");
    let command_args = args.get(2..).unwrap_or(&[]);

    debug!(category, command, "Dispatching command");
    match cli_service.execute_command(category, command, command_args) {
        Ok(output) => {
            if !output.trim().is_empty() {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format_error(&e.to_string()));
            process::exit(1);
        }
    }
}
