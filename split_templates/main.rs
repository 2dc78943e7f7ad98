//! Pass 2: split the categorized template source into one file per template
//! plus a generated index.

mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use template_migration::utils::read_text;
use template_migration::{extract_records, split, Settings};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "split_templates", about = "Split the template source into per-category files")]
struct Cli {
    /// Settings file layered over the built-in tables
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Categorized template source (default from settings)
    #[arg(short, long)]
    source: Option<PathBuf>,
    /// Output root for category folders and the index (default from settings)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Print the plan without writing anything
    #[arg(long)]
    dry_run: bool,
    /// Also print a JSON summary
    #[arg(long)]
    json: bool,
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
        .with_source(cli.source)
        .with_output(cli.output);
    info!(
        source = %settings.source_path.display(),
        output = %settings.output_root.display(),
        msg = "Starting split pass"
    );

    println!("Template Split");
    println!("==============\n");

    let folders = settings.folder_map()?;
    let layout = settings.layout();

    println!("Source: {:?}", settings.source_path);
    println!("Output: {:?}\n", layout.root);
    let text = read_text(&settings.source_path)?;

    let extraction = extract_records(&text);
    for diag in &extraction.diagnostics {
        warn!("{}", diag);
        println!("  skipped {}", diag);
    }
    println!("Extracted {} templates\n", extraction.records.len());

    let generated_at = chrono::Local::now().format("%Y/%m/%d %H:%M:%S").to_string();
    let plan = split::plan(&extraction.records, &folders, &layout, &generated_at)
        .context("Failed to plan output files")?;

    if cli.dry_run {
        for (n, file) in plan.files.iter().enumerate() {
            println!("[{}] {} -> {}", n + 1, file.name, file.path.display());
        }
        println!("Dry run: nothing written.");
    } else {
        plan.write(|n, file| {
            println!("[{}] {} -> {}/{}.{}", n, file.name, file.folder, file.id, layout.extension);
        })
        .context("Failed to write template files")?;
        println!("\nWrote {} templates", plan.files.len());
        println!("Wrote index {}", plan.index_path.display());
    }

    if !plan.counts.is_empty() {
        summary::print_counts(&plan);
    }

    if cli.json {
        let s = summary::SplitSummary::new(&plan, &extraction.diagnostics, !cli.dry_run);
        println!("{}", serde_json::to_string_pretty(&s)?);
    }

    println!("\nDone.");
    Ok(())
}
