//! Pass 1: add a `category` field to every known template in the source file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use template_migration::utils::{read_text, write_atomic};
use template_migration::{categorize, unmapped_labels, Settings};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "categorize", about = "Insert category fields into the template source")]
struct Cli {
    /// Settings file layered over the built-in tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Template source to rewrite (default from settings)
    #[arg(short, long)]
    source: Option<PathBuf>,
    /// Report what would change without writing
    #[arg(long)]
    dry_run: bool,
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())
        .context("Failed to load settings")?
        .with_source(cli.source);
    info!(source = %settings.source_path.display(), msg = "Starting categorize pass");

    println!("Template Categorize");
    println!("===================\n");

    let categories = settings.category_map()?;
    let folders = settings.folder_map()?;
    for label in unmapped_labels(&categories, &folders) {
        warn!(label, "category has no folder; split will use the fallback");
    }

    let path = &settings.source_path;
    println!("Source: {:?}\n", path);
    let text = read_text(path)?;

    let result = categorize(&text, &categories);
    let report = &result.report;
    for id in &report.missing {
        warn!(id = %id, "mapped id not found before a name field");
    }
    for (id, n) in &report.repeated {
        warn!(id = %id, occurrences = n, "id appears more than once; all occurrences updated");
    }

    if cli.dry_run {
        println!("Dry run: source left untouched.");
    } else if result.text != text {
        write_atomic(path, &result.text)
            .with_context(|| format!("Failed to rewrite {:?}", path))?;
    }

    println!("Applied {} category assignments", report.applied);
    println!("  -> {} category fields inserted", report.inserted);
    if !report.missing.is_empty() {
        println!("  -> {} ids not matched", report.missing.len());
    }
    println!("\nDone.");
    Ok(())
}
