//! Application state for the web layer.

use std::sync::Arc;

use crate::cache::StatusCache;
use crate::stations::StationDirectory;

/// Shared application state.
///
/// The station directory is immutable after startup; the status cache and
/// its in-flight registry are mutated only through `StatusCache` methods.
/// Both live for one server process, matching one app session.
#[derive(Clone)]
pub struct AppState {
    /// Static station snapshot.
    pub stations: Arc<StationDirectory>,

    /// Live charger status cache.
    pub status: Arc<StatusCache>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stations: StationDirectory, status: StatusCache) -> Self {
        Self {
            stations: Arc::new(stations),
            status: Arc::new(status),
        }
    }
}
