use crate::commands::{print_json, Context, DEFAULT_SAMPLE_LIMIT};
use anyhow::{Context as _, Result};
use clap::Args;
use phonemark_core::RawPhoneValue;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const DEFAULT_PREVIEW_ROWS: usize = 100;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[arg(long)]
    pub file: PathBuf,
    /// Number of rows to print
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    pub rows: usize,
}

#[derive(Debug, Serialize)]
struct PreviewReport {
    columns: Vec<String>,
    total_rows: usize,
    rows: Vec<Vec<String>>,
    phone_column: String,
    phone_samples: Vec<String>,
    /// Phone cells stored as numbers; a leading zero is already gone from these.
    numeric_phone_cells: usize,
}

pub fn preview(ctx: &Context<'_>, args: PreviewArgs) -> Result<()> {
    let table = ctx.load_sheet(&args.file)?;
    let index = ctx.config.sheet.phone_column_index;
    let phone_column = table
        .column_name(index)
        .with_context(|| "locate phone column")?
        .to_string();
    let phone_cells = table.column_values(index)?;
    let phone_samples: Vec<String> = phone_cells
        .iter()
        .take(DEFAULT_SAMPLE_LIMIT)
        .map(ToString::to_string)
        .collect();
    let numeric_phone_cells = phone_cells
        .iter()
        .filter(|cell| matches!(cell, RawPhoneValue::Int(_) | RawPhoneValue::Float(_)))
        .count();
    debug!(rows = table.row_count(), column = %phone_column, "sheet previewed");
    if numeric_phone_cells > 0 {
        warn!(
            cells = numeric_phone_cells,
            column = %phone_column,
            "phone cells stored as numbers have lost any leading zero; format the column as text"
        );
    }

    let report = PreviewReport {
        columns: table.columns.clone(),
        total_rows: table.row_count(),
        rows: table
            .rows
            .iter()
            .take(args.rows)
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect(),
        phone_column,
        phone_samples,
        numeric_phone_cells,
    };

    if ctx.json {
        return print_json(&report);
    }

    println!("No.\t{}", report.columns.join("\t"));
    for (index, row) in report.rows.iter().enumerate() {
        println!("{}\t{}", index + 1, row.join("\t"));
    }
    println!("Loaded {} rows.", report.total_rows);
    println!("Phone column: {}", report.phone_column);
    println!("Phone samples: {}", report.phone_samples.join(", "));
    if report.numeric_phone_cells > 0 {
        println!(
            "Warning: {} phone cells are numbers and will not match zero-prefixed numbers. \
             Format the phone column as text.",
            report.numeric_phone_cells
        );
    }
    Ok(())
}
