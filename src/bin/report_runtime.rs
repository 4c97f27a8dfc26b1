//! Report Runtime - load datasets and emit the active report's analytics
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin report_runtime -- data/report_us.csv data/report_uk.csv --summary
//! ```
//!
//! Flags:
//! - `--exclude-bonus` - leave welcome-bonus transactions out of every aggregation
//! - `--summary` - combine the loaded reports into a summary before rendering
//!
//! ## Environment Variables
//!
//! - CHUNK_SIZE - records per processing step (default: 10000)
//! - INCLUDE_BONUS - default state of the bonus toggle (default: true)
//! - RUST_LOG - logging level (optional, default: info)

use coinflow::analytics_core::{compute_snapshot, RecordFilter};
use coinflow::config::RuntimeConfig;
use coinflow::ingest_core::{load_batch, DatasetSource, FileSource};
use coinflow::report_core::ReportStore;
use std::env;
use std::sync::Arc;

struct RuntimeArgs {
    paths: Vec<String>,
    exclude_bonus: bool,
    generate_summary: bool,
}

fn parse_args() -> RuntimeArgs {
    let args: Vec<String> = env::args().skip(1).collect();
    RuntimeArgs {
        paths: args.iter().filter(|a| !a.starts_with("--")).cloned().collect(),
        exclude_bonus: args.contains(&"--exclude-bonus".to_string()),
        generate_summary: args.contains(&"--summary".to_string()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    dotenv::dotenv().ok();

    let config = RuntimeConfig::from_env();
    let args = parse_args();
    if args.paths.is_empty() {
        log::error!("No input files. Usage: report_runtime <files...> [--summary] [--exclude-bonus]");
        return Ok(());
    }

    log::info!("🚀 Starting report runtime");
    log::info!("   Files: {}", args.paths.len());
    log::info!("   Chunk size: {}", config.chunk_size);

    let include_bonus = config.include_bonus && !args.exclude_bonus;
    let filter = RecordFilter::with_bonus(include_bonus);

    let sources: Vec<Arc<dyn DatasetSource>> = args
        .paths
        .iter()
        .map(|path| Arc::new(FileSource::new(path.as_str())) as Arc<dyn DatasetSource>)
        .collect();
    let outcomes = load_batch(sources).await;

    let mut store = ReportStore::new();
    let mut failures = 0usize;
    store.add_reports(outcomes.into_iter().filter_map(|outcome| match outcome.result {
        Ok(records) => Some((outcome.name, records)),
        Err(err) => {
            // Already logged by the loader; keep a per-file message on stderr.
            eprintln!("{}: {}", outcome.name, err);
            failures += 1;
            None
        }
    }));

    if failures > 0 {
        log::warn!("⚠️  {} file(s) failed to ingest", failures);
    }
    if store.reports().is_empty() {
        log::error!("No reports loaded");
        return Ok(());
    }

    if args.generate_summary {
        match store.generate_summary() {
            Some(id) => {
                let summary = store.get(id).expect("summary just created");
                log::info!("🧾 Summary '{}' covers {} sources", summary.display_name, summary.sources.len());
            }
            None => log::warn!("Summary needs at least 2 eligible reports; skipping"),
        }
    }

    let active = store.active_report().expect("non-empty store has an active report");
    log::info!("📊 Active report: '{}' ({} records)", active.display_name, active.records.len());

    let snapshot = compute_snapshot(&active.records, &filter, config.chunk_size);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
