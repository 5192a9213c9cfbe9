//! Mock status source for running without a service key.
//!
//! Serves canned live-status records from an in-memory map, so the app and
//! its tests work without open-data credentials or network access.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::cache::StatusSource;
use crate::domain::{ChargerStation, LiveChargerStatus, StationId};

use super::error::StatusError;

/// Status source backed by a fixed in-memory map.
///
/// Unknown stations resolve to an empty record list, mirroring what the
/// real upstream returns for ids it has no data on.
#[derive(Clone)]
pub struct MockStatusSource {
    statuses: Arc<HashMap<StationId, Vec<LiveChargerStatus>>>,
}

impl MockStatusSource {
    /// Create a mock source from an explicit station → statuses map.
    pub fn new(statuses: HashMap<StationId, Vec<LiveChargerStatus>>) -> Self {
        Self {
            statuses: Arc::new(statuses),
        }
    }

    /// Derive a mock source from the static roster, reporting every
    /// charger as available.
    pub fn all_available(stations: &[ChargerStation]) -> Self {
        let statuses = stations
            .iter()
            .map(|station| {
                let records = station
                    .chargers
                    .iter()
                    .map(|c| LiveChargerStatus {
                        charger_id: c.charger_id.clone(),
                        status_code: "2".to_string(),
                    })
                    .collect();
                (station.id.clone(), records)
            })
            .collect();

        Self::new(statuses)
    }
}

impl StatusSource for MockStatusSource {
    fn fetch(
        &self,
        station: &StationId,
    ) -> BoxFuture<'static, Result<Vec<LiveChargerStatus>, StatusError>> {
        let records = self.statuses.get(station).cloned().unwrap_or_default();
        async move { Ok(records) }.boxed()
    }
}
