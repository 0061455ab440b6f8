use crate::commands::print_json;
use anyhow::{Context as _, Result};
use clap::Args;
use phonemark_config as config;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing settings file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct InitConfigReport {
    path: String,
}

pub fn init_config(config_path: Option<PathBuf>, json: bool, args: InitConfigArgs) -> Result<()> {
    let path = config::resolve_config_path(config_path).with_context(|| "resolve config path")?;
    config::write_default(&path, args.force)
        .with_context(|| format!("write config {}", path.display()))?;

    if json {
        return print_json(&InitConfigReport {
            path: path.display().to_string(),
        });
    }
    println!("Settings written to {}", path.display());
    Ok(())
}
