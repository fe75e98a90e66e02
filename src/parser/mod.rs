pub mod document;
pub mod extract;
pub mod normalize;

use std::path::Path;

use anyhow::{Context, Result};
use scraper::Html;
use tracing::warn;

use crate::records::ListingRecord;
use extract::{appraisal, history, info, location, market, review};

/// Build one listing from a page. Every extractor runs on its own against
/// the same document; a missing section only empties its own field.
pub fn parse_page(html: &str, source_path: &str) -> ListingRecord {
    let doc = Html::parse_document(html);

    let sales_market_series = market::extract_sales(&doc).unwrap_or_else(|e| {
        warn!("{}: {:#}", source_path, e);
        None
    });
    let rental_market_series = market::extract_rentals(&doc).unwrap_or_else(|e| {
        warn!("{}: {:#}", source_path, e);
        None
    });

    ListingRecord {
        building_name: location::building_name(&doc),
        info: info::extract(&doc),
        city: location::city(&doc),
        town: location::town(&doc),
        review_metrics: review::extract(&doc),
        sales_history: history::extract_sales(&doc),
        sales_market_series,
        rental_history: history::extract_rentals(&doc),
        rental_market_series,
        estimated_prices: appraisal::extract(&doc),
        source_path: source_path.to_string(),
    }
}

/// Read a page from disk and parse it.
pub fn parse_file(path: &Path) -> Result<ListingRecord> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_page(&html, &path.to_string_lossy()))
}
