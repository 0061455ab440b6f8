use crate::commands::{print_json, Context, DEFAULT_SAMPLE_LIMIT};
use anyhow::{Context as _, Result};
use clap::Args;
use phonemark_core::{collect_phone_numbers, PhoneBatch, UpdateRequest, ValidatedNames};
use phonemark_store::{build_and_execute, Backend, Database, Dialect};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info, warn};

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Spreadsheet holding the phone numbers
    #[arg(long)]
    pub file: PathBuf,
    /// Value written to the update column of every matched row
    #[arg(long)]
    pub value: String,
    /// Print the statement instead of running it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Default, Serialize)]
struct UpdateReport {
    affected_rows: u64,
    phones: usize,
    skipped: usize,
    duplicates: usize,
    dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    sql: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    params: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn update(ctx: &Context<'_>, args: UpdateArgs) -> Result<()> {
    let mut report = UpdateReport {
        dry_run: args.dry_run,
        ..UpdateReport::default()
    };

    match run_update(ctx, &args, &mut report) {
        Ok(()) => {
            if ctx.json {
                return print_json(&report);
            }
            if let (Some(sql), Some(params)) = (&report.sql, &report.params) {
                println!("{sql}");
                println!("params: {}", params.join(", "));
                return Ok(());
            }
            println!("{} rows updated.", report.affected_rows);
            Ok(())
        }
        Err(err) => {
            if ctx.json {
                report.affected_rows = 0;
                report.error = Some(format!("{err:#}"));
                print_json(&report)?;
            }
            Err(err)
        }
    }
}

fn run_update(ctx: &Context<'_>, args: &UpdateArgs, report: &mut UpdateReport) -> Result<()> {
    let batch = read_phone_numbers(ctx, args)?;
    report.phones = batch.numbers.len();
    report.skipped = batch.skipped;
    report.duplicates = batch.duplicates;
    info!(
        phones = batch.numbers.len(),
        skipped = batch.skipped,
        duplicates = batch.duplicates,
        "phone numbers collected"
    );

    let db = &ctx.config.database;
    let request = UpdateRequest {
        table: db.table.clone(),
        phone_column: db.phone_column.clone(),
        update_column: db.update_column.clone(),
        update_value: args.value.clone(),
        phones: batch.numbers,
    };
    let names = request.validate().with_context(|| "check update request")?;
    debug!(
        table = %names.table,
        phone_column = %names.phone_column,
        update_column = %names.update_column,
        "update target"
    );

    let dialect = Dialect::from(db.db_type);
    if args.dry_run {
        let statement = dialect.build(&request)?;
        report.sql = Some(statement.sql);
        report.params = Some(statement.params);
        return Ok(());
    }

    let mut database = Database::open(db)
        .with_context(|| format!("open {} database {}", db.db_type, db.database))?;
    log_stored_format(&mut database, &names);

    report.affected_rows = build_and_execute(database, dialect, &request)
        .with_context(|| format!("update {}.{}", names.table, names.update_column))?;
    info!(rows = report.affected_rows, "update committed");
    Ok(())
}

fn read_phone_numbers(ctx: &Context<'_>, args: &UpdateArgs) -> Result<PhoneBatch> {
    let table = ctx.load_sheet(&args.file)?;
    let index = ctx.config.sheet.phone_column_index;
    let cells = table
        .column_values(index)
        .with_context(|| "read phone column")?;
    debug!(
        column = table.column_name(index).unwrap_or_default(),
        rows = table.row_count(),
        "phone column selected"
    );
    Ok(collect_phone_numbers(cells))
}

fn log_stored_format<B: Backend>(backend: &mut B, names: &ValidatedNames) {
    match backend.sample_column(&names.table, &names.phone_column, DEFAULT_SAMPLE_LIMIT) {
        Ok(values) => debug!(samples = ?values, "stored phone values"),
        Err(err) => warn!(error = %err, "sample query failed"),
    }
}
