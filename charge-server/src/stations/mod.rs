//! Static station snapshot loading and lookup.
//!
//! Loads the promotion CSV once at startup, groups rows into stations,
//! and serves them from an immutable in-memory directory.

mod directory;
mod error;
mod loader;

pub use directory::StationDirectory;
pub use error::StationDataError;
pub use loader::{load_stations, parse_stations};
