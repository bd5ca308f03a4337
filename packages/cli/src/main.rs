#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the Colorado job map toolchain.
//!
//! Reads a jobs CSV, resolves each free-text location to a canonical
//! Colorado city, and reports the results as annotated CSV output, count
//! aggregates, or matching statistics.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) to route
//! `log` output through `indicatif::MultiProgress` so that log lines and
//! progress bars never fight for the terminal.

mod progress;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::MultiProgress;
use job_map_analytics::{
    aggregate_by_city, aggregate_by_county, aggregate_by_secondary, matching_stats,
    unmatched_report,
};
use job_map_analytics_models::{
    CityJobCount, CountyJobCount, MatchingStats, SecondaryCount, UnmatchedLocation,
};
use job_map_batch::{ProcessOptions, process, read_table, write_resolved};
use job_map_catalog::CityCatalog;
use job_map_job_models::ResolvedTable;

use crate::progress::IndicatifProgress;

#[derive(Parser)]
#[command(name = "job_map_cli", about = "Colorado job location matching tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by every subcommand that runs the matcher.
#[derive(Args)]
struct MatchArgs {
    /// Path to a city reference CSV (`City,Latitude,Longitude[,Population]`).
    /// Uses the embedded Colorado catalog when not set.
    #[arg(long)]
    cities: Option<PathBuf>,
    /// Name of the free-text location column. If not set, the first column
    /// whose name contains "location" is used.
    #[arg(long)]
    location_column: Option<String>,
    /// Minimum similarity score for fuzzy matches.
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(60..=100))]
    threshold: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    /// Count matched postings per canonical city
    City,
    /// Count matched postings per county
    County,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve every row of a jobs CSV and report the matching results
    Process {
        /// Input jobs CSV (any schema with a free-text location column)
        input: PathBuf,
        /// Write the annotated table to this CSV file
        #[arg(long)]
        output: Option<PathBuf>,
        /// Only write rows that resolved to a city
        #[arg(long)]
        matched_only: bool,
        #[command(flatten)]
        match_args: MatchArgs,
    },
    /// Print job-count aggregates for the map visualizer
    Aggregate {
        /// Input jobs CSV
        input: PathBuf,
        /// Grouping dimension
        #[arg(long, value_enum, default_value_t = GroupBy::City)]
        by: GroupBy,
        /// Cross-tabulate cities against this column instead (e.g. "industry")
        #[arg(long, conflicts_with = "by")]
        column: Option<String>,
        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        match_args: MatchArgs,
    },
    /// Print matching statistics for a jobs CSV
    Stats {
        /// Input jobs CSV
        input: PathBuf,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        match_args: MatchArgs,
    },
    /// List the reference city catalog
    Cities {
        /// Path to a city reference CSV; uses the embedded catalog when not set
        #[arg(long)]
        cities: Option<PathBuf>,
    },
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            input,
            output,
            matched_only,
            match_args,
        } => {
            let (resolved, catalog) = run_batch(&multi, &input, &match_args)?;
            if let Some(path) = output {
                let written = write_resolved(&resolved, &path, matched_only)?;
                log::info!("Wrote {written} rows to {}", path.display());
            }
            print_summary(&matching_stats(&resolved));
            println!();
            print_city_counts(aggregate_by_city(&resolved, &catalog));
            let unmatched = unmatched_report(&resolved);
            if !unmatched.is_empty() {
                println!();
                print_unmatched(&unmatched);
            }
        }
        Commands::Aggregate {
            input,
            by,
            column,
            json,
            match_args,
        } => {
            let (resolved, catalog) = run_batch(&multi, &input, &match_args)?;
            if let Some(column) = column {
                let counts = aggregate_by_secondary(&resolved, &column)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&counts)?);
                } else {
                    print_secondary_counts(counts);
                }
            } else {
                match by {
                    GroupBy::City => {
                        let counts = aggregate_by_city(&resolved, &catalog);
                        if json {
                            println!("{}", serde_json::to_string_pretty(&counts)?);
                        } else {
                            print_city_counts(counts);
                        }
                    }
                    GroupBy::County => {
                        let counts = aggregate_by_county(&resolved);
                        if json {
                            println!("{}", serde_json::to_string_pretty(&counts)?);
                        } else {
                            print_county_counts(counts);
                        }
                    }
                }
            }
        }
        Commands::Stats {
            input,
            json,
            match_args,
        } => {
            let (resolved, _) = run_batch(&multi, &input, &match_args)?;
            let stats = matching_stats(&resolved);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_summary(&stats);
                if !stats.top_unmatched_locations.is_empty() {
                    println!();
                    println!("Top unmatched locations:");
                    for location in &stats.top_unmatched_locations {
                        println!("  {:<40} {}", location.raw_location, location.count);
                    }
                }
            }
        }
        Commands::Cities { cities } => {
            let catalog = CityCatalog::load_or_fallback(cities.as_deref());
            print_catalog(&catalog);
        }
    }

    Ok(())
}

/// Loads the catalog, reads the input CSV, and resolves every row behind a
/// progress bar.
fn run_batch(
    multi: &MultiProgress,
    input: &Path,
    args: &MatchArgs,
) -> Result<(ResolvedTable, CityCatalog), Box<dyn std::error::Error>> {
    let catalog = CityCatalog::load_or_fallback(args.cities.as_deref());
    let table = read_table(input)?;
    let options = ProcessOptions {
        location_column: args.location_column.clone(),
        threshold: args.threshold,
    };

    let bar = IndicatifProgress::records_bar(multi, "Matching locations");
    let resolved = process(&table, &catalog, &options, &bar)?;
    bar.finish(format!(
        "Matched {} of {} rows",
        resolved.matched_count(),
        resolved.len()
    ));

    Ok((resolved, catalog))
}

fn print_summary(stats: &MatchingStats) {
    println!("Total rows:         {}", stats.total);
    println!("Matched:            {}", stats.matched);
    println!("Unmatched:          {}", stats.unmatched);
    println!("Match rate:         {:.2}%", stats.match_rate_pct);
    println!("Average confidence: {:.2}", stats.average_confidence);
}

fn print_city_counts(mut counts: Vec<CityJobCount>) {
    counts.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    println!("{:<22} {:>8} {:>12}", "CITY", "JOBS", "PER 10K");
    println!("{}", "-".repeat(44));
    for count in counts {
        let per_10k = count
            .jobs_per_10k
            .map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        println!("{:<22} {:>8} {:>12}", count.city, count.job_count, per_10k);
    }
}

fn print_county_counts(mut counts: Vec<CountyJobCount>) {
    counts.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    println!("{:<22} {:>8}", "COUNTY", "JOBS");
    println!("{}", "-".repeat(31));
    for count in counts {
        println!("{:<22} {:>8}", count.county, count.job_count);
    }
}

fn print_secondary_counts(mut counts: Vec<SecondaryCount>) {
    counts.sort_by(|a, b| b.job_count.cmp(&a.job_count));
    println!("{:<22} {:<24} {:>8}", "CITY", "VALUE", "JOBS");
    println!("{}", "-".repeat(56));
    for count in counts {
        println!(
            "{:<22} {:<24} {:>8}",
            count.city, count.value, count.job_count
        );
    }
}

fn print_unmatched(report: &[UnmatchedLocation]) {
    println!("{:<40} {:>8}", "UNMATCHED LOCATION", "ROWS");
    println!("{}", "-".repeat(49));
    for location in report {
        println!("{:<40} {:>8}", location.raw_location, location.count);
    }
}

fn print_catalog(catalog: &CityCatalog) {
    println!("{:<22} {:>10}  COUNTY", "CITY", "POPULATION");
    println!("{}", "-".repeat(50));
    for city in catalog.cities() {
        let population = city
            .population
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let county = catalog.county(&city.city).unwrap_or("(none assigned)");
        println!("{:<22} {:>10}  {county}", city.city, population);
    }
    println!();
    println!(
        "{} cities, {} aliases",
        catalog.len(),
        catalog.aliases().len()
    );
}
