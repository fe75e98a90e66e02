use std::sync::LazyLock;

use regex::Regex;

use crate::records::{ApartmentSizeRange, BuildingFloors, ParsedDate, StationDistance, StationLines};

static STATION_DISTANCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(.+駅)より徒歩で([0-9]+)分").unwrap());
static SIZE_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+(?:\.[0-9]+)?)㎡\s*～\s*([0-9]+(?:\.[0-9]+)?)㎡").unwrap()
});
static STATION_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"『(.+駅)』").unwrap());
static TRAIN_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S+線").unwrap());
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)年(?:([1-9]|1[0-2])月)?").unwrap());
static ABOVE_GROUND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"地上([0-9]+)").unwrap());
static BELOW_GROUND_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"地下([0-9]+)").unwrap());
static FLOOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(B|地下)?([0-9]+)階?$").unwrap());

const MAN_YEN: f64 = 10_000.0;

/// Walk times, one per line: "新宿駅より徒歩で5分". Lines that don't match are
/// notes and get skipped.
pub fn parse_station_distances(input: &str) -> Vec<StationDistance> {
    input
        .lines()
        .filter_map(|line| {
            let caps = STATION_DISTANCE_RE.captures(line)?;
            let minutes = caps[2].parse::<u32>().ok()?;
            Some(StationDistance {
                station_name: caps[1].trim().to_string(),
                minutes,
            })
        })
        .collect()
}

/// "70.5㎡～85.2㎡". A single size is not a range and yields `None`.
pub fn parse_apartment_size_range(input: &str) -> Option<ApartmentSizeRange> {
    let caps = SIZE_RANGE_RE.captures(input)?;
    Some(ApartmentSizeRange {
        min_size: caps[1].parse().ok()?,
        max_size: caps[2].parse().ok()?,
    })
}

/// Per line: "『新宿駅』" plus every "…線" token. Lines missing either part
/// are dropped.
pub fn parse_station_lines(input: &str) -> Vec<StationLines> {
    let mut result = Vec::new();

    for line in input.lines() {
        let Some(station) = STATION_NAME_RE.captures(line) else {
            continue;
        };

        let mut lines: Vec<String> = Vec::new();
        for m in TRAIN_LINE_RE.find_iter(line) {
            if !lines.iter().any(|l| l == m.as_str()) {
                lines.push(m.as_str().to_string());
            }
        }
        if lines.is_empty() {
            continue;
        }

        result.push(StationLines {
            station_name: station[1].to_string(),
            lines,
        });
    }

    result
}

/// "2012年5月" → 2012/5, "2012年" → 2012/1. Out-of-range months are ignored
/// the same way a missing month is.
pub fn parse_japanese_date(input: &str) -> Option<ParsedDate> {
    let caps = DATE_RE.captures(input)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps
        .get(2)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(1);
    Some(ParsedDate { year, month })
}

/// "地上10階地下2階建". Each side defaults to 0 on its own.
pub fn parse_building_floors(input: &str) -> BuildingFloors {
    BuildingFloors {
        above: floor_count(&ABOVE_GROUND_RE, input),
        below: floor_count(&BELOW_GROUND_RE, input),
    }
}

fn floor_count(re: &Regex, input: &str) -> u32 {
    re.captures(input)
        .and_then(|c| c[1].parse::<u32>().ok())
        .unwrap_or(0)
}

/// "120戸" → 120.
pub fn parse_unit_count(input: &str) -> Option<u32> {
    parse_number(input)
        .filter(|n| n.fract() == 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32)
}

/// "7階" → 7. Basement floors ("B1階", "地下1階") come back negative.
pub fn parse_floor_number(input: &str) -> Option<i32> {
    let caps = FLOOR_RE.captures(input.trim())?;
    let floor = caps[2].parse::<i32>().ok()?;
    if caps.get(1).is_some() {
        Some(-floor)
    } else {
        Some(floor)
    }
}

/// Keep digits and decimal points, then parse. Empty or garbled input is `None`.
pub fn parse_number(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse().ok()
}

/// Amount whose unit is man-yen by contract: "5,000万円" → 50,000,000.
pub fn parse_man_yen(input: &str) -> Option<u64> {
    parse_number(input).map(|n| to_yen(n * MAN_YEN))
}

/// Amount in yen, scaled only when the text says 万: "18.5万円" → 185,000,
/// "12,000円" → 12,000.
pub fn parse_yen(input: &str) -> Option<u64> {
    let n = parse_number(input)?;
    if input.contains('万') {
        Some(to_yen(n * MAN_YEN))
    } else {
        Some(to_yen(n))
    }
}

/// Non-empty trimmed text.
pub fn non_empty(input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn to_yen(n: f64) -> u64 {
    n.round() as u64
}
