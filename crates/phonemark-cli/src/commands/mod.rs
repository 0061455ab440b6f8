use anyhow::{Context as _, Result};
use phonemark_config::AppConfig;
use phonemark_sheet::{read_sheet, SheetOptions, SheetTable};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

pub mod completions;
pub mod init_config;
pub mod preview;
pub mod sample;
pub mod update;

pub const DEFAULT_SAMPLE_LIMIT: usize = 5;

pub struct Context<'a> {
    pub config: &'a AppConfig,
    pub json: bool,
}

impl Context<'_> {
    pub fn sheet_options(&self) -> SheetOptions {
        let sheet = &self.config.sheet;
        SheetOptions::new(sheet.has_header, sheet.start_row)
    }

    pub fn load_sheet(&self, path: &Path) -> Result<SheetTable> {
        read_sheet(path, &self.sheet_options())
            .with_context(|| format!("read spreadsheet {}", path.display()))
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
