mod geocode;
mod parser;
mod records;
mod store;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};
use tracing::info;

use records::ListingRecord;

#[derive(Parser)]
#[command(name = "mansion_scraper", about = "Apartment building page extractor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse saved building pages into a JSON array
    Extract {
        /// Directory holding the saved pages
        #[arg(short, long, default_value = "apartment-pages")]
        input: PathBuf,
        /// Glob pattern for page files inside the input directory
        #[arg(short, long, default_value = "*.html")]
        pattern: String,
        /// JSON array output
        #[arg(short, long, default_value = "apartments.json")]
        output: PathBuf,
    },
    /// Geocode extracted listings and export them as JSON lines
    Enrich {
        /// JSON array written by `extract`
        #[arg(short, long, default_value = "apartments.json")]
        input: PathBuf,
        /// JSONL output
        #[arg(short, long, default_value = "apartments.jsonl")]
        output: PathBuf,
    },
    /// Extract + enrich in one pipeline
    Run {
        #[arg(short, long, default_value = "apartment-pages")]
        input: PathBuf,
        #[arg(short, long, default_value = "*.html")]
        pattern: String,
        #[arg(short, long, default_value = "apartments.json")]
        output: PathBuf,
        #[arg(long, default_value = "apartments.jsonl")]
        jsonl: PathBuf,
    },
    /// Show counts for an extracted JSON array
    Stats {
        #[arg(short, long, default_value = "apartments.json")]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract {
            input,
            pattern,
            output,
        } => {
            let listings = extract_pages(&input, &pattern)?;
            if listings.is_empty() {
                println!("No pages matched {} in {}.", pattern, input.display());
                return Ok(());
            }
            store::save_listings(&output, &listings)?;
            println!("Wrote {} listings to {}", listings.len(), output.display());
            Ok(())
        }
        Commands::Enrich { input, output } => {
            let listings = store::load_listings(&input)?;
            if listings.is_empty() {
                println!("No listings in {}. Run 'extract' first.", input.display());
                return Ok(());
            }
            enrich(&listings, &output).await
        }
        Commands::Run {
            input,
            pattern,
            output,
            jsonl,
        } => {
            // Phase 1: Extract
            let t_extract = Instant::now();
            let listings = extract_pages(&input, &pattern)?;
            if listings.is_empty() {
                println!("No pages matched {} in {}.", pattern, input.display());
                return Ok(());
            }
            store::save_listings(&output, &listings)?;
            println!(
                "Extracted {} listings to {} in {:.1}s",
                listings.len(),
                output.display(),
                t_extract.elapsed().as_secs_f64()
            );

            // Phase 2: Enrich
            enrich(&listings, &jsonl).await
        }
        Commands::Stats { input } => {
            let listings = store::load_listings(&input)?;
            let s = store::summarize(&listings);
            println!("Listings:       {}", s.listings);
            println!("With address:   {}", s.with_address);
            println!("With sales:     {} ({} events)", s.with_sales, s.sale_events);
            println!("With rentals:   {} ({} events)", s.with_rentals, s.rental_events);
            println!("With appraisal: {}", s.with_appraisal);
            println!("With review:    {}", s.with_review);
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

/// Parse every matching page in parallel. The batch is returned only once
/// all pages are done, in sorted path order.
fn extract_pages(dir: &Path, pattern: &str) -> anyhow::Result<Vec<ListingRecord>> {
    use indicatif::{ProgressBar, ProgressStyle};
    use rayon::prelude::*;

    let paths = store::discover_pages(dir, pattern)?;
    info!("Found {} pages in {}", paths.len(), dir.display());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")?
            .progress_chars("#>-"),
    );

    let listings = paths
        .par_iter()
        .map(|path| {
            let listing = parser::parse_file(path);
            pb.inc(1);
            listing
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    pb.finish_and_clear();
    Ok(listings)
}

async fn enrich(listings: &[ListingRecord], output: &Path) -> anyhow::Result<()> {
    let geocoder = geocode::Geocoder::from_env()?;
    println!("Geocoding {} listings...", listings.len());
    let (points, stats) = geocode::geocode_listings(geocoder, listings).await?;
    println!(
        "Geocoded {} listings ({} found, {} no match, {} errors, {} without address)",
        stats.total, stats.found, stats.missing, stats.errors, stats.skipped
    );
    let written = store::save_jsonl(output, listings, &points)?;
    println!("Wrote {} rows to {}", written, output.display());
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
