//! Data transfer objects for web requests and responses.
//!
//! Field names follow the JSON contract the mobile frontend already
//! speaks, including the upstream's `statId`/`chgerId` spellings.

use serde::{Deserialize, Serialize};

use crate::domain::{Charger, ChargerStation, LiveChargerStatus, StationId};
use crate::status::StatusSummary;

/// A station in the `/api/stations` listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    /// Station id.
    pub id: StationId,

    /// Display name.
    pub station_name: String,

    /// Administrative region.
    pub region: String,

    /// Street address.
    pub address: String,

    /// Free-text location hint.
    pub location_detail: String,

    /// WGS84 latitude.
    pub latitude: f64,

    /// WGS84 longitude.
    pub longitude: f64,

    /// Promotion price in won per kWh.
    pub promotion_price: f64,

    /// Lowest positive per-charger price.
    pub min_price: f64,

    /// Whether the chargers are at ground level.
    pub first_floor: bool,

    /// Whether parking is free while charging.
    pub parking_free: bool,

    /// Whether the station is reserved for taxis.
    pub only_taxi: bool,

    /// Whether any charger is a fast charger.
    pub has_fast_charger: bool,

    /// Charger roster.
    pub chargers: Vec<ChargerResult>,
}

/// A charger in a station's roster.
#[derive(Debug, Serialize)]
pub struct ChargerResult {
    /// Charger id, in the upstream's spelling.
    #[serde(rename = "chgerId")]
    pub charger_id: String,

    /// Connector type label.
    #[serde(rename = "type")]
    pub charger_type: String,

    /// Rated output in kW.
    #[serde(rename = "speed")]
    pub output_kw: f64,

    /// Charger class.
    #[serde(rename = "isFast")]
    pub is_fast: bool,
}

/// Response for the station listing.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    /// All stations, in snapshot order.
    pub stations: Vec<StationResult>,
}

/// Request for live charger status.
#[derive(Debug, Deserialize)]
pub struct ChargerStatusRequest {
    /// Station id, in the upstream's spelling.
    #[serde(rename = "statId")]
    pub stat_id: String,
}

/// Response for a live charger status lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerStatusResponse {
    /// Station id the lookup was for.
    pub stat_id: StationId,

    /// Aggregated availability per charger class.
    pub status_summary: StatusSummary,

    /// The raw live records the summary was derived from.
    pub chargers: Vec<LiveChargerStatus>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationResult {
    /// Create from a domain station record.
    pub fn from_station(station: &ChargerStation) -> Self {
        Self {
            id: station.id.clone(),
            station_name: station.station_name.clone(),
            region: station.region.clone(),
            address: station.address.clone(),
            location_detail: station.location_detail.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            promotion_price: station.promotion_price,
            min_price: station.min_price,
            first_floor: station.first_floor,
            parking_free: station.parking_free,
            only_taxi: station.only_taxi,
            has_fast_charger: station.has_fast_charger,
            chargers: station.chargers.iter().map(ChargerResult::from_charger).collect(),
        }
    }
}

impl ChargerResult {
    /// Create from a domain charger.
    pub fn from_charger(charger: &Charger) -> Self {
        Self {
            charger_id: charger.charger_id.clone(),
            charger_type: charger.charger_type.clone(),
            output_kw: charger.output_kw,
            is_fast: charger.is_fast,
        }
    }
}
