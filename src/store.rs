use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::records::{ExportRow, GeoPoint, ListingRecord};

/// HTML pages under `dir` matching `pattern`, sorted so output order is stable.
pub fn discover_pages(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let full_pattern = dir.join(pattern);
    let pattern_str = full_pattern.to_string_lossy();

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern_str)
        .with_context(|| format!("Bad glob pattern {}", pattern_str))?
    {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Write the whole batch as one pretty-printed JSON array.
pub fn save_listings(path: &Path, listings: &[ListingRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(listings)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

pub fn load_listings(path: &Path) -> Result<Vec<ListingRecord>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// One compact export row per line, geocode fields merged in.
pub fn save_jsonl(
    path: &Path,
    listings: &[ListingRecord],
    points: &[Option<GeoPoint>],
) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_jsonl(&mut out, listings, points)?;
    out.flush()?;
    Ok(listings.len())
}

fn write_jsonl<W: Write>(
    out: &mut W,
    listings: &[ListingRecord],
    points: &[Option<GeoPoint>],
) -> Result<()> {
    for (i, listing) in listings.iter().enumerate() {
        let geo = points.get(i).and_then(|p| p.as_ref());
        serde_json::to_writer(&mut *out, &ExportRow::new(listing, geo))?;
        out.write_all(b"\n")?;
    }
    Ok(())
}

pub struct BatchStats {
    pub listings: usize,
    pub with_address: usize,
    pub with_sales: usize,
    pub with_rentals: usize,
    pub sale_events: usize,
    pub rental_events: usize,
    pub with_appraisal: usize,
    pub with_review: usize,
}

pub fn summarize(listings: &[ListingRecord]) -> BatchStats {
    BatchStats {
        listings: listings.len(),
        with_address: listings.iter().filter(|l| l.address().is_some()).count(),
        with_sales: listings.iter().filter(|l| !l.sales_history.is_empty()).count(),
        with_rentals: listings.iter().filter(|l| !l.rental_history.is_empty()).count(),
        sale_events: listings.iter().map(|l| l.sales_history.len()).sum(),
        rental_events: listings.iter().map(|l| l.rental_history.len()).sum(),
        with_appraisal: listings.iter().filter(|l| !l.estimated_prices.is_empty()).count(),
        with_review: listings
            .iter()
            .filter(|l| l.review_metrics.deviation.is_some())
            .count(),
    }
}
