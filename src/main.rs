mod config;
mod fetch;
mod harvest;
mod models;
mod parse;
mod reasons;
mod rules;
mod store;
mod visa;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use fetch::{Fetcher, HttpProxy, Throttle};
use harvest::Harvester;
use models::JobsDataset;
use store::ResultStore;

#[derive(Parser)]
#[command(name = "harvest")]
#[command(about = "Job listing harvester - collect, filter, and enrich postings for the jobs site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured search and write the dataset
    Run {
        /// Output path for the JSON dataset
        #[arg(short, long, default_value = "data/jobs.json")]
        output: PathBuf,

        /// Skip politeness delays (for replayed or local proxies)
        #[arg(long)]
        no_delay: bool,
    },

    /// List the configured searches
    Searches,
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("harvest=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { output, no_delay } => {
            let throttle = if no_delay {
                Throttle::disabled()
            } else {
                Throttle::real()
            };
            let proxy = HttpProxy::new()?;
            let fetcher = Fetcher::new(&proxy, throttle);
            let harvester = Harvester::new(fetcher, throttle);

            println!("Harvesting {} searches...", config::SEARCHES.len());
            let mut store = ResultStore::new();
            let stats = harvester.run(&config::SEARCHES, &mut store);

            let dataset = JobsDataset::new(store.into_sorted_records());
            write_dataset(&output, &dataset)?;

            println!("\nResults:");
            println!("  Pages fetched:    {}", stats.pages_fetched);
            println!("  Listings seen:    {}", stats.listings_seen);
            println!("  Skipped remote:   {}", stats.skipped_remote);
            println!("  Skipped titles:   {}", stats.skipped_irrelevant);
            println!("  Skipped blocked:  {}", stats.skipped_blocked);
            println!("  Skipped dupes:    {}", stats.skipped_duplicates);
            println!("  Wrong country:    {}", stats.skipped_wrong_country);
            if stats.visa_failures > 0 {
                println!("  Visa fetch fails: {}", stats.visa_failures);
            }
            println!("\nWrote {} jobs to {}", dataset.total, output.display());
        }

        Commands::Searches => {
            println!(
                "{:<14} {:<38} {:<20} {:>6}",
                "COUNTRY", "LABEL", "KEYWORDS", "CAP"
            );
            println!("{}", "-".repeat(80));
            for spec in &config::SEARCHES {
                println!(
                    "{:<14} {:<38} {:<20} {:>6}",
                    spec.country, spec.label, spec.keywords, spec.country_cap
                );
            }
        }
    }

    Ok(())
}

fn write_dataset(path: &Path, dataset: &JobsDataset) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(dataset)?;
    // Write to a sibling temp file first so a crash never leaves a
    // partial dataset behind.
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &json).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("Failed to move dataset to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_dataset_creates_parent_and_is_readable_back() {
        let dir = std::env::temp_dir().join(format!("harvest-test-{}", std::process::id()));
        let path = dir.join("nested").join("jobs.json");

        let dataset = JobsDataset::new(vec![]);
        write_dataset(&path, &dataset).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: JobsDataset = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.total, 0);
        // Temp file was renamed away.
        assert!(!path.with_extension("json.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
