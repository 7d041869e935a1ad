// src/main.rs
mod extractors;
mod storage;
mod utils;
mod workbook;

use clap::Parser;
use extractors::{sort_company_pl, sort_product_contribution, LayoutConfig, PeriodScope, TidyExtractor};
use std::fmt;
use std::path::PathBuf;
use storage::StorageManager;
use utils::error::ExtractError;
use utils::AppError;

/// Command Line Interface for the Markstrat tidy table extractor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Exported team workbook (.xlsx, .xls, .xlsb or .ods)
    input: PathBuf,

    /// Output directory for the tidy CSV tables
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Sheet holding both sections (overrides the layout file)
    #[arg(long)]
    sheet: Option<String>,

    /// JSON file overriding layout constants (window sizes, label column, ...)
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Fail instead of silently skipping cells that do not fit the inferred layout
    #[arg(long)]
    strict: bool,

    /// Where the Product Contribution period tag is looked up
    #[arg(long, value_enum)]
    period_scope: Option<PeriodScope>,

    /// Also write a JSON metadata file next to each table
    #[arg(long)]
    metadata: bool,

    /// Debug mode - dump each section window as CSV under <output_dir>/debug
    #[arg(short, long)]
    debug: bool,
}

/// One CSV table written by a run.
#[derive(Debug, Clone, PartialEq)]
struct WrittenTable {
    path: PathBuf,
    rows: usize,
}

/// What a successful run wrote, one operator line per table.
#[derive(Debug, Clone, PartialEq)]
struct RunSummary {
    product_contribution: WrittenTable,
    company_pl: WrittenTable,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for table in [&self.product_contribution, &self.company_pl] {
            writeln!(f, "Wrote {} {} rows", table.path.display(), table.rows)?;
        }
        Ok(())
    }
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting extraction for args: {:?}", args);

    let summary = run(args)?;
    print!("{}", summary);
    Ok(())
}

fn run(args: Args) -> Result<RunSummary, AppError> {
    // 3. Resolve layout configuration
    let mut layout = match &args.layout {
        Some(path) => LayoutConfig::from_json_file(path)?,
        None => LayoutConfig::default(),
    };
    if let Some(sheet) = &args.sheet {
        layout.sheet = sheet.clone();
    }
    if let Some(scope) = args.period_scope {
        layout.product_contribution.period_scope = scope;
    }
    let extractor = TidyExtractor::new(layout).with_strict(args.strict);

    // 4. Extract both tables. Either failing aborts the run before anything is written.
    let mut product_contribution = extractor.extract_product_contribution(&args.input)?;
    sort_product_contribution(&mut product_contribution.records);

    let mut company_pl = extractor.extract_company_pl(&args.input)?;
    sort_company_pl(&mut company_pl.records);

    // 5. Write outputs
    let storage = StorageManager::new(&args.output_dir)?;
    let pc_path = storage.save_product_contribution(&product_contribution.records)?;
    let pl_path = storage.save_company_pl(&company_pl.records)?;

    if args.metadata {
        storage.save_metadata(&product_contribution, &pc_path, &args.input)?;
        storage.save_metadata(&company_pl, &pl_path, &args.input)?;
    }

    // 6. Optional window dumps for layout troubleshooting
    if args.debug {
        let grid = workbook::load_sheet(&args.input, &extractor.layout().sheet).map_err(ExtractError::from)?;
        let debug_dir = storage.base_dir().join("debug");
        for extraction in [&product_contribution, &company_pl] {
            if let Err(e) = utils::window_debug::save_window_csv(&grid, extraction, &debug_dir) {
                tracing::warn!("Failed to dump {} window: {}", extraction.section, e);
            }
        }
    }

    tracing::info!(
        "Extraction finished. Product Contribution: {} rows, Company P&L: {} rows",
        product_contribution.records.len(),
        company_pl.records.len()
    );
    Ok(RunSummary {
        product_contribution: WrittenTable {
            path: pc_path,
            rows: product_contribution.records.len(),
        },
        company_pl: WrittenTable {
            path: pl_path,
            rows: company_pl.records.len(),
        },
    })
}
