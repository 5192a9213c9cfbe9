//! Open-data charger API response DTOs.
//!
//! These types map directly to the `getChargerInfo` JSON envelope. `Option`
//! is used liberally: the upstream omits `items` entirely when a station has
//! no records, and individual item fields are not guaranteed present.

use serde::Deserialize;

use crate::domain::LiveChargerStatus;

/// Top-level envelope of a `getChargerInfo` response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerInfoResponse {
    /// Upstream result code; "00" means success.
    #[serde(default)]
    pub result_code: String,

    /// Human-readable result message.
    #[serde(default)]
    pub result_msg: String,

    /// Total record count reported upstream.
    #[serde(default)]
    pub total_count: Option<u32>,

    /// Record container; absent or null when there are no records.
    #[serde(default)]
    pub items: Option<ChargerInfoItems>,
}

impl ChargerInfoResponse {
    /// Flatten the envelope into the record list, treating a missing or
    /// null container as an empty list.
    pub fn into_items(self) -> Vec<ChargerInfoItem> {
        self.items.and_then(|i| i.item).unwrap_or_default()
    }
}

/// Inner `items` wrapper of the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChargerInfoItems {
    /// The actual record list; may be absent or null.
    #[serde(default)]
    pub item: Option<Vec<ChargerInfoItem>>,
}

/// One live charger record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerInfoItem {
    /// Station id the charger belongs to.
    #[serde(default)]
    pub stat_id: String,

    /// Charger id within the station (zero-padded, e.g. "01").
    #[serde(default)]
    pub chger_id: String,

    /// Station display name.
    #[serde(default)]
    pub stat_nm: String,

    /// Street address.
    #[serde(default)]
    pub addr: String,

    /// Free-text location hint.
    #[serde(default)]
    pub location: String,

    /// Charger status code ("2" = available).
    #[serde(default)]
    pub stat: String,

    /// Charger connector type code.
    #[serde(default)]
    pub chger_type: String,
}

impl ChargerInfoItem {
    /// Reduce the record to the fields the aggregation core consumes.
    pub fn into_status(self) -> LiveChargerStatus {
        LiveChargerStatus {
            charger_id: self.chger_id,
            status_code: self.stat,
        }
    }
}
