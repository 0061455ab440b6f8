use anyhow::{Context as _, Result};
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

const BIN_NAME: &str = "phonemark";

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate the script for
    #[arg(value_enum)]
    pub shell: Shell,
    /// Write the script to this file instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn completions(args: CompletionsArgs) -> Result<()> {
    let mut cmd = crate::Cli::command();
    match args.output {
        Some(path) => {
            let mut file =
                File::create(&path).with_context(|| format!("create {}", path.display()))?;
            generate(args.shell, &mut cmd, BIN_NAME, &mut file);
            file.flush()
                .with_context(|| format!("write {}", path.display()))?;
            debug!(shell = %args.shell, path = %path.display(), "completions written");
        }
        None => generate(args.shell, &mut cmd, BIN_NAME, &mut io::stdout().lock()),
    }
    Ok(())
}
