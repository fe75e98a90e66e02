use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Building info fields keyed by canonical name, in page order.
pub type Info = IndexMap<String, InfoValue>;

/// One extracted apartment building page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub building_name: String,
    pub info: Info,
    pub city: String,
    pub town: String,
    #[serde(rename = "mansionReview")]
    pub review_metrics: ReviewMetrics,
    pub sales_history: Vec<SaleEvent>,
    #[serde(rename = "salesMarketValueTimeseriesData")]
    pub sales_market_series: Option<Value>,
    pub rental_history: Vec<RentalEvent>,
    #[serde(rename = "rentalMarketValueTimeseriesData")]
    pub rental_market_series: Option<Value>,
    pub estimated_prices: EstimatedPrices,
    #[serde(rename = "pagePath")]
    pub source_path: String,
}

impl ListingRecord {
    pub fn address(&self) -> Option<&str> {
        match self.info.get("address") {
            Some(InfoValue::Text(addr)) if !addr.is_empty() => Some(addr.as_str()),
            _ => None,
        }
    }
}

/// Typed value of a building info field.
///
/// Untagged so the JSON output carries the bare value; variant order matters
/// when reading an extracted file back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    Stations(Vec<StationDistance>),
    TrainLines(Vec<StationLines>),
    Floors(BuildingFloors),
    Date(Option<ParsedDate>),
    Size(Option<ApartmentSizeRange>),
    Count(Option<u32>),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationDistance {
    pub station_name: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApartmentSizeRange {
    pub min_size: f64,
    pub max_size: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationLines {
    pub station_name: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedDate {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingFloors {
    pub above: u32,
    pub below: u32,
}

/// One row of the sales history table. Amounts are in yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleEvent {
    pub sales_date: Option<ParsedDate>,
    pub floor: Option<i32>,
    pub floor_plan: Option<String>,
    pub direction: Option<String>,
    pub size: Option<f64>,
    pub balcony_size: Option<f64>,
    pub selling_price: Option<u64>,
    pub price_per_tsubo: Option<u64>,
}

/// One row of the rental history table. Amounts are in yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalEvent {
    pub lease_date: Option<ParsedDate>,
    pub rent: Option<u64>,
    pub price_per_tsubo: Option<u64>,
    pub management_fee: Option<u64>,
    pub deposit: Option<u64>,
    pub key_money: Option<u64>,
    pub deposit2: Option<u64>,
    pub floor: Option<i32>,
    pub size: Option<f64>,
    pub floor_plan: Option<String>,
    pub direction: Option<String>,
}

/// Deviation score and area rankings. `None` means the page had no usable
/// number; zero is a real value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewMetrics {
    pub deviation: Option<f64>,
    pub city_ranking_val: Option<u32>,
    pub city_ranking_cap: Option<u32>,
    pub town_ranking_val: Option<u32>,
    pub town_ranking_cap: Option<u32>,
}

/// Appraisal block. Amounts are yen, per-tsubo prices are as displayed,
/// gross yield is a fraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatedPrices {
    pub sales_appraisal_from_amount: Option<u64>,
    pub sales_appraisal_from_amount_per_tsubo: Option<f64>,
    pub sales_appraisal_to_amount: Option<u64>,
    pub sales_appraisal_to_amount_per_tsubo: Option<f64>,
    pub rent_appraisal_from_amount: Option<u64>,
    pub rent_appraisal_from_amount_per_tsubo: Option<f64>,
    pub rent_appraisal_to_amount: Option<u64>,
    pub rent_appraisal_to_amount_per_tsubo: Option<f64>,
    pub gross_yield: Option<f64>,
}

impl EstimatedPrices {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Result of a successful geocode lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub lat: f64,
    pub long: f64,
    pub postal_code: Option<String>,
}

/// Line-delimited export row: a listing subset with geocode fields merged in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRow<'a> {
    pub building_name: &'a str,
    pub info: IndexMap<&'a str, &'a InfoValue>,
    pub city: &'a str,
    pub town: &'a str,
    #[serde(rename = "mansionReview")]
    pub review_metrics: &'a ReviewMetrics,
    #[serde(rename = "pagePath")]
    pub source_path: &'a str,
    pub estimated_prices: &'a EstimatedPrices,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub postal_code: Option<&'a str>,
    pub sales_history: &'a [SaleEvent],
}

impl<'a> ExportRow<'a> {
    pub fn new(listing: &'a ListingRecord, geo: Option<&'a GeoPoint>) -> Self {
        // Items with a blank label carry no field name; leave them out.
        let info = listing
            .info
            .iter()
            .filter(|(key, _)| !key.is_empty())
            .map(|(key, value)| (key.as_str(), value))
            .collect();

        ExportRow {
            building_name: &listing.building_name,
            info,
            city: &listing.city,
            town: &listing.town,
            review_metrics: &listing.review_metrics,
            source_path: &listing.source_path,
            estimated_prices: &listing.estimated_prices,
            lat: geo.map(|g| g.lat),
            long: geo.map(|g| g.long),
            postal_code: geo.and_then(|g| g.postal_code.as_deref()),
            sales_history: &listing.sales_history,
        }
    }
}
