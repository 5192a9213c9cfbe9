//! Station identifier and static station record types.

use std::fmt;

use serde::Serialize;

use super::charger::Charger;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id: {reason}")]
pub struct InvalidStationId {
    reason: &'static str,
}

/// A validated charging-station identifier.
///
/// Station ids come from the promotion CSV snapshot (`promo_statId`) and are
/// used verbatim as query parameters against the open-data API, so they are
/// restricted to non-empty ASCII alphanumeric strings. This type guarantees
/// that any `StationId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use charge_server::domain::StationId;
///
/// let id = StationId::parse("PW000123").unwrap();
/// assert_eq!(id.as_str(), "PW000123");
///
/// // Empty and non-alphanumeric ids are rejected
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("PW 123").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id from a string.
    ///
    /// The input must be non-empty ASCII alphanumeric.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStationId {
                reason: "must be ASCII letters and digits only",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Returns the station id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A charging station from the static CSV snapshot.
///
/// One station groups every CSV row that shares its `promo_statId`. The
/// record is immutable after load; live availability is fetched separately
/// and joined against `chargers` by charger id.
#[derive(Debug, Clone)]
pub struct ChargerStation {
    /// Station id (`promo_statId`), the cache/lookup key.
    pub id: StationId,

    /// Display name.
    pub station_name: String,

    /// Administrative region.
    pub region: String,

    /// Street address.
    pub address: String,

    /// Free-text location hint ("B1 parking lot" etc.), may be empty.
    pub location_detail: String,

    /// WGS84 latitude.
    pub latitude: f64,

    /// WGS84 longitude.
    pub longitude: f64,

    /// Promotion price in won per kWh (0 when unknown).
    pub promotion_price: f64,

    /// Lowest positive per-charger price seen for this station.
    pub min_price: f64,

    /// Whether the chargers are at ground level.
    pub first_floor: bool,

    /// Whether parking is free while charging.
    pub parking_free: bool,

    /// Whether the station is reserved for taxis.
    pub only_taxi: bool,

    /// Whether any charger in the roster is a fast charger.
    pub has_fast_charger: bool,

    /// Known charger inventory; order is irrelevant.
    pub chargers: Vec<Charger>,
}
