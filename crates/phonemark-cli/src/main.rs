mod commands;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, init_config, preview, sample, update, Context};
use crate::error::{exit_code_for, report_error};
use phonemark_config as config;

#[derive(Debug, Parser)]
#[command(
    name = "phonemark",
    version,
    about = "Update a status column for every phone number listed in a spreadsheet"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Set the update column for every row whose phone matches the sheet
    Update(update::UpdateArgs),
    /// Show the sheet as it will be read
    Preview(preview::PreviewArgs),
    /// Show stored values of the phone column
    Sample(sample::SampleArgs),
    /// Write a settings file with default values
    #[command(name = "init-config")]
    InitConfig(init_config::InitConfigArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::completions(args),
        Command::InitConfig(args) => init_config::init_config(config_path, json, args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let ctx = Context {
                config: &app_config,
                json,
            };

            match command {
                Command::Update(args) => update::update(&ctx, args),
                Command::Preview(args) => preview::preview(&ctx, args),
                Command::Sample(args) => sample::sample(&ctx, args),
                Command::InitConfig(_) => {
                    unreachable!("init-config command handled before config load")
                }
                Command::Completions(_) => {
                    unreachable!("completions command handled before config load")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
