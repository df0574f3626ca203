// Agricultural Records - command line
// Schema setup, document checks and the dashboard report without the HTTP server

use agro_records::config::{Cli, Command, ReportLabels};
use agro_records::document::{self, DocumentKind};
use agro_records::{logging, ReportService, SqliteStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Init => run_init(&cli.database),
        Command::CheckDocument { document } => run_check_document(&document),
        Command::Report { labels } => run_report(&cli.database, labels),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_init(db_path: &Path) -> Result<ExitCode> {
    println!("🔧 Setting up database at {}", db_path.display());

    // open() creates the tables when missing
    SqliteStore::open(db_path)
        .with_context(|| format!("Failed to initialise {}", db_path.display()))?;

    println!("✓ Schema ready (WAL mode, foreign keys on)");
    Ok(ExitCode::SUCCESS)
}

fn run_check_document(raw: &str) -> Result<ExitCode> {
    let kind = DocumentKind::from_digits(&document::clean(raw));

    match document::normalize(raw) {
        Ok(canonical) => {
            // normalize only succeeds for 11 or 14 digits
            let label = kind.map(|k| k.as_str()).unwrap_or("document");
            println!("✓ Valid {}: {}", label, canonical);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("❌ {}", e);
            Ok(ExitCode::from(2))
        }
    }
}

fn run_report(db_path: &Path, labels: ReportLabels) -> Result<ExitCode> {
    if !db_path.exists() {
        anyhow::bail!(
            "Database not found at {} (run `agro-records init` first)",
            db_path.display()
        );
    }

    let store = SqliteStore::open(db_path)
        .with_context(|| format!("Failed to open {}", db_path.display()))?;
    let reports = ReportService::new(&store, &store, labels);

    let report = serde_json::json!({
        "summary": reports.summary()?,
        "areaTotals": reports.area_totals()?,
        "byState": reports.distribution_by_state()?,
        "byCulture": reports.distribution_by_culture()?,
        "landUse": reports.land_use_distribution()?,
    });

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::SUCCESS)
}
