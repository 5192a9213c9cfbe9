//! Charger roster and live-status types.

use serde::Serialize;

/// A single charger in a station's static roster.
///
/// Comes from one CSV row. The charger id correlates with the `chgerId`
/// field of live status records fetched from the open-data API.
#[derive(Debug, Clone, PartialEq)]
pub struct Charger {
    /// Charger id within the station (`promo_chgerId`, e.g. "01").
    pub charger_id: String,

    /// Connector type label from the snapshot (e.g. "DC콤보").
    pub charger_type: String,

    /// Rated output in kW (0 when unknown).
    pub output_kw: f64,

    /// Charger class: fast vs. regular.
    pub is_fast: bool,
}

/// A live per-charger status record from one open-data lookup.
///
/// Transient: these are never persisted beyond the status cache entry they
/// arrived in. The status code is kept as the raw upstream string; `"2"`
/// means the charger is idle and available, every other value (including
/// absence of a record) means not available or unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveChargerStatus {
    /// Charger id, correlates with [`Charger::charger_id`].
    pub charger_id: String,

    /// Raw upstream status code.
    pub status_code: String,
}
