//! In-memory station directory.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{ChargerStation, StationId};

/// Immutable directory of the static station snapshot.
///
/// Built once at startup and read-only afterwards; an app session never
/// mutates the static data. Stations keep their snapshot order for listing
/// and get an id index for lookups.
pub struct StationDirectory {
    stations: Vec<Arc<ChargerStation>>,
    by_id: HashMap<StationId, Arc<ChargerStation>>,
}

impl StationDirectory {
    /// Build a directory from loaded stations.
    pub fn new(stations: Vec<ChargerStation>) -> Self {
        let stations: Vec<Arc<ChargerStation>> = stations.into_iter().map(Arc::new).collect();
        let by_id = stations
            .iter()
            .map(|s| (s.id.clone(), Arc::clone(s)))
            .collect();

        Self { stations, by_id }
    }

    /// Look up a station by id.
    pub fn get(&self, id: &StationId) -> Option<&Arc<ChargerStation>> {
        self.by_id.get(id)
    }

    /// All stations, in snapshot order.
    pub fn all(&self) -> &[Arc<ChargerStation>] {
        &self.stations
    }

    /// Number of stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}
