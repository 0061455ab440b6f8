use crate::commands::{print_json, Context, DEFAULT_SAMPLE_LIMIT};
use crate::error::invalid_input;
use anyhow::{Context as _, Result};
use clap::Args;
use phonemark_core::Identifier;
use phonemark_store::{Backend, Database};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct SampleArgs {
    #[arg(long, default_value_t = DEFAULT_SAMPLE_LIMIT)]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
struct SampleReport {
    table: String,
    column: String,
    values: Vec<String>,
}

pub fn sample(ctx: &Context<'_>, args: SampleArgs) -> Result<()> {
    if args.limit == 0 {
        return Err(invalid_input("limit must be greater than zero"));
    }
    let db = &ctx.config.database;
    let table = Identifier::parse("table", &db.table)?;
    let column = Identifier::parse("phone column", &db.phone_column)?;

    let mut database = Database::open(db)
        .with_context(|| format!("open {} database {}", db.db_type, db.database))?;
    let sampled = database.sample_column(&table, &column, args.limit);
    let closed = database.close();
    let values = sampled.with_context(|| format!("sample {table}.{column}"))?;
    closed.with_context(|| "close database")?;

    if ctx.json {
        return print_json(&SampleReport {
            table: table.to_string(),
            column: column.to_string(),
            values,
        });
    }

    println!("{table}.{column}:");
    for value in values {
        println!("  {value}");
    }
    Ok(())
}
