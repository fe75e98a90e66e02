use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::records::{GeoPoint, ListingRecord};

const LOCATIONS_URL: &str = "https://dev.virtualearth.net/REST/v1/Locations";
const COUNTRY_REGION: &str = "JP";
const ADMIN_DISTRICT: &str = "東京都";
const CULTURE: &str = "ja";
const CONCURRENCY: usize = 3;
pub const API_KEY_ENV: &str = "BING_MAPS_KEY";

/// Geocode stats returned after completion.
pub struct GeocodeStats {
    pub total: usize,
    pub found: usize,
    pub missing: usize,
    pub errors: usize,
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    #[serde(default)]
    pub resource_sets: Vec<ResourceSet>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceSet {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    #[serde(default)]
    pub geocode_points: Vec<GeocodePoint>,
    pub address: Option<ResourceAddress>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodePoint {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceAddress {
    pub postal_code: Option<String>,
}

impl LocationResponse {
    /// First resource's first point and postal code. Anything missing along
    /// the way means "no geocode".
    pub fn first_point(&self) -> Option<GeoPoint> {
        let resource = self.resource_sets.first()?.resources.first()?;
        let coords = &resource.geocode_points.first()?.coordinates;
        let (lat, long) = (*coords.first()?, *coords.get(1)?);
        Some(GeoPoint {
            lat,
            long,
            postal_code: resource.address.as_ref().and_then(|a| a.postal_code.clone()),
        })
    }
}

pub struct Geocoder {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl Geocoder {
    pub fn new(api_key: String) -> Self {
        Geocoder {
            client: reqwest::Client::new(),
            api_key,
            endpoint: LOCATIONS_URL.to_string(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV)
            .map_err(|_| anyhow::anyhow!("{} environment variable must be set", API_KEY_ENV))?;
        Ok(Self::new(api_key))
    }

    /// Look up one address. `Ok(None)` when the API has no match.
    pub async fn lookup(&self, address: &str) -> Result<Option<GeoPoint>> {
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("countryRegion", COUNTRY_REGION),
                ("adminDistrict", ADMIN_DISTRICT),
                ("addressLine", address),
                ("culture", CULTURE),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
            .context("Failed to read geocode response")?;

        let parsed: LocationResponse =
            serde_json::from_str(&body).context("Unexpected geocode response")?;
        Ok(parsed.first_point())
    }
}

/// Geocode every listing that has an address, at most `CONCURRENCY` requests
/// in flight. Returns one slot per listing, in input order.
pub async fn geocode_listings(
    geocoder: Geocoder,
    listings: &[ListingRecord],
) -> Result<(Vec<Option<GeoPoint>>, GeocodeStats)> {
    let geocoder = Arc::new(geocoder);
    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let total = listings.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Workers send (index, outcome); the loop below fills the slots.
    let (tx, mut rx) =
        tokio::sync::mpsc::channel::<(usize, Result<Option<GeoPoint>>)>(CONCURRENCY * 2);

    let mut skipped = 0usize;
    for (idx, listing) in listings.iter().enumerate() {
        let Some(address) = listing.address() else {
            debug!("No address for {}, skipping", listing.source_path);
            skipped += 1;
            pb.inc(1);
            continue;
        };
        let address = address.to_string();
        let geocoder = Arc::clone(&geocoder);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let outcome = match sem.acquire().await {
                Ok(_permit) => geocoder.lookup(&address).await,
                Err(e) => Err(e.into()),
            };
            let _ = tx.send((idx, outcome)).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut points: Vec<Option<GeoPoint>> = vec![None; total];
    let mut found = 0usize;
    let mut missing = 0usize;
    let mut errors = 0usize;

    while let Some((idx, outcome)) = rx.recv().await {
        match outcome {
            Ok(Some(point)) => {
                found += 1;
                points[idx] = Some(point);
            }
            Ok(None) => {
                missing += 1;
                debug!("No geocode result for {}", listings[idx].source_path);
            }
            Err(e) => {
                errors += 1;
                warn!("Geocode failed for {}: {:#}", listings[idx].source_path, e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!(
        "Geocoded {} listings ({} found, {} no match, {} errors, {} without address)",
        total, found, missing, errors, skipped
    );

    Ok((
        points,
        GeocodeStats {
            total,
            found,
            missing,
            errors,
            skipped,
        },
    ))
}
