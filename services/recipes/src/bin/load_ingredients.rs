//! Bulk ingredient import from a header-less `name,unit` CSV file.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use sea_orm::Database;

use foodgram_recipes::infra::db::DbIngredientRepository;
use foodgram_recipes::usecase::ingredient::{IngredientRow, LoadIngredientsUseCase};

#[derive(Parser, Debug)]
#[command(author, version, about = "Load ingredients into the recipes database")]
struct Args {
    /// PostgreSQL connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// CSV file with one `name,measurement_unit` pair per line.
    #[arg(long)]
    file: PathBuf,
}

/// Rows are numbered from 1 in error messages.
fn read_rows(input: impl Read) -> anyhow::Result<Vec<IngredientRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 1;
        let record = record.with_context(|| format!("row {line}: unreadable record"))?;
        if record.len() != 2 {
            bail!("row {line}: expected 2 columns, found {}", record.len());
        }
        let name = record[0].trim();
        let measurement_unit = record[1].trim();
        if name.is_empty() || measurement_unit.is_empty() {
            bail!("row {line}: name and measurement unit must not be empty");
        }
        rows.push(IngredientRow {
            name: name.to_owned(),
            measurement_unit: measurement_unit.to_owned(),
        });
    }
    Ok(rows)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foodgram_core::tracing::init_tracing();
    let args = Args::parse();

    let file = std::fs::File::open(&args.file)
        .with_context(|| format!("failed to open {}", args.file.display()))?;
    let rows = read_rows(file)?;

    let db = Database::connect(&args.database_url)
        .await
        .context("failed to connect to database")?;
    let usecase = LoadIngredientsUseCase {
        repo: DbIngredientRepository { db },
    };
    let report = usecase.execute(rows).await?;

    println!("created {} of {} ingredients", report.created, report.total);
    Ok(())
}
