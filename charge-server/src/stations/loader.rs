//! CSV snapshot loader.
//!
//! The static station data ships as a promotion CSV where each row is one
//! charger; rows sharing a `promo_statId` are grouped into one station.
//! Parsing is lenient the way the snapshot demands: numeric columns may be
//! blank (read as 0), boolean columns hold the literal string `TRUE`, and
//! rows without a usable station id are skipped rather than failing the
//! whole load.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{Charger, ChargerStation, StationId};

use super::error::StationDataError;

/// One CSV row, with the snapshot's exact (inconsistent) column headers.
#[derive(Debug, Deserialize)]
struct SnapshotRow {
    #[serde(default)]
    region: String,

    #[serde(default)]
    station_name: String,

    #[serde(rename = "Promotion Price", default)]
    promotion_price: String,

    #[serde(rename = "promo_statId", default)]
    promo_stat_id: String,

    #[serde(rename = "promo_chgerId", default)]
    promo_chger_id: String,

    #[serde(rename = "type", default)]
    charger_type: String,

    #[serde(rename = "speed(kwh)", default)]
    speed_kwh: String,

    #[serde(default)]
    address: String,

    #[serde(default)]
    location_detail: String,

    #[serde(default)]
    lati: String,

    #[serde(default)]
    longi: String,

    #[serde(rename = "First_floor", default)]
    first_floor: String,

    #[serde(default)]
    is_fast: String,

    #[serde(default)]
    parking_free: String,

    #[serde(default)]
    only_taxi: String,
}

/// Parse a numeric column, reading blanks and garbage as 0.
fn parse_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(0.0)
}

/// Parse a boolean column; only the literal `TRUE` is true.
fn parse_flag(s: &str) -> bool {
    s.trim() == "TRUE"
}

/// Load and group the station snapshot from a CSV file.
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<ChargerStation>, StationDataError> {
    let contents = std::fs::read_to_string(path)?;
    parse_stations(&contents)
}

/// Parse and group the station snapshot from CSV text.
///
/// Station order follows first appearance in the file. Quoted fields and
/// embedded commas are handled by the CSV reader.
pub fn parse_stations(csv_text: &str) -> Result<Vec<ChargerStation>, StationDataError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());

    let mut stations: Vec<ChargerStation> = Vec::new();
    let mut index: std::collections::HashMap<StationId, usize> = std::collections::HashMap::new();
    let mut skipped = 0usize;

    for row in reader.deserialize() {
        let row: SnapshotRow = row?;

        let Ok(id) = StationId::parse(row.promo_stat_id.trim()) else {
            skipped += 1;
            continue;
        };

        let price = parse_number(&row.promotion_price);

        let idx = match index.get(&id) {
            Some(&idx) => idx,
            None => {
                stations.push(ChargerStation {
                    id: id.clone(),
                    station_name: row.station_name.clone(),
                    region: row.region.clone(),
                    address: row.address.clone(),
                    location_detail: row.location_detail.clone(),
                    latitude: parse_number(&row.lati),
                    longitude: parse_number(&row.longi),
                    promotion_price: price,
                    min_price: price,
                    first_floor: parse_flag(&row.first_floor),
                    parking_free: parse_flag(&row.parking_free),
                    only_taxi: parse_flag(&row.only_taxi),
                    has_fast_charger: false,
                    chargers: Vec::new(),
                });
                index.insert(id, stations.len() - 1);
                stations.len() - 1
            }
        };

        let station = &mut stations[idx];
        let is_fast = parse_flag(&row.is_fast);

        station.chargers.push(Charger {
            charger_id: row.promo_chger_id.trim().to_string(),
            charger_type: row.charger_type,
            output_kw: parse_number(&row.speed_kwh),
            is_fast,
        });

        if is_fast {
            station.has_fast_charger = true;
        }

        // Track the lowest positive per-row price for the station.
        if price > 0.0 && (station.min_price == 0.0 || price < station.min_price) {
            station.min_price = price;
        }
    }

    if skipped > 0 {
        debug!(skipped, "skipped snapshot rows without a usable station id");
    }

    if stations.is_empty() {
        return Err(StationDataError::EmptySnapshot);
    }

    Ok(stations)
}
