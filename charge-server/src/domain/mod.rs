//! Domain types for the EV charge map.
//!
//! This module contains the core domain model: validated station
//! identifiers, the static station/charger records loaded from the CSV
//! snapshot, and the transient live-status records fetched from the
//! open-data API. Identifier invariants are enforced at construction time.

mod charger;
mod station;

pub use charger::{Charger, LiveChargerStatus};
pub use station::{ChargerStation, InvalidStationId, StationId};
