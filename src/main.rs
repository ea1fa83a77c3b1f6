use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

use receipt_archive::{
    fetch, load_records, receipts_request, save_records, suggested_filename, ArchiveConfig,
    FetchWindow, MergeEngine, Record,
};

/// Merge downloaded warehouse receipts into a local JSON archive.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// JSON config file (defaults are used for missing keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Merge a fetched batch into the existing receipt file
    Merge {
        /// Receipts fetched from the API: a raw response body or a plain JSON array
        #[arg(long)]
        fetched: PathBuf,

        /// Previously saved receipt file (omit to start fresh)
        #[arg(long)]
        existing: Option<PathBuf>,

        /// Directory to write the merged file into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Print the GraphQL request body for the fetch window
    Request {
        /// Last day of the window (YYYY-MM-DD, defaults to today in UTC)
        #[arg(long)]
        today: Option<chrono::NaiveDate>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = ArchiveConfig::load_or_default(args.config.as_deref())?;

    match args.command {
        Command::Merge { fetched, existing, out_dir } => {
            run_merge(&config, &fetched, existing.as_deref(), &out_dir)
        }
        Command::Request { today } => run_request(&config, today),
    }
}

fn run_merge(
    config: &ArchiveConfig,
    fetched: &Path,
    existing: Option<&Path>,
    out_dir: &Path,
) -> Result<()> {
    println!("--- 🛒 Receipt Archive Merge Started ---");

    let prior = match existing {
        Some(path) => load_records(path)?,
        None => {
            println!("ℹ️  No existing file given, starting fresh.");
            Vec::new()
        }
    };
    let fresh = load_fetched(fetched)?;

    println!(
        "\n🔄 Merging {} existing receipts with {} fetched = {} total",
        prior.len(),
        fresh.len(),
        prior.len() + fresh.len()
    );

    let engine = MergeEngine::with_min_key_len(config.min_transaction_key_len);
    let result = engine.merge(prior, fresh);

    println!(
        "✂️  Removed {} duplicate receipts ({} malformed)",
        result.duplicates_removed, result.invalid_records
    );
    println!("✅ Final unique receipt count is {}", result.records.len());

    if result.records.is_empty() {
        println!("ℹ️  No unique receipts found. Nothing to save.");
        return Ok(());
    }

    println!("\n{}", result.report().render());

    let result = result.into_ordered();
    println!("✅ Receipts sorted oldest -> newest");

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;
    let path = out_dir.join(suggested_filename(&config.file_prefix, &result.records));
    save_records(&path, &result.records)?;

    println!("\n--- 💾 Saved to {} ---", path.display());
    Ok(())
}

/// Accepts either the API response envelope or an already extracted array
fn load_fetched(path: &Path) -> Result<Vec<Record>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to open fetched file {}", path.display()))?;

    if text.trim_start().starts_with('[') {
        warn!("{} is a bare array, skipping response checks", path.display());
        return serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse fetched file {}", path.display()));
    }

    let records = fetch::parse_receipts_response_str(&text)
        .with_context(|| format!("Bad receipts response in {}", path.display()))?;
    Ok(records)
}

fn run_request(config: &ArchiveConfig, today: Option<chrono::NaiveDate>) -> Result<()> {
    let today = today.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let window = FetchWindow::from_config(today, config);

    eprintln!("📅 Fetch range: {} to {}", window.start_str(), window.end_str());
    let body = receipts_request(&window);
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
