//! EV charging station map server.
//!
//! Serves a mobile web map of promotion charging stations: a static
//! station snapshot loaded from CSV, plus near-real-time per-charger
//! availability fetched from the public open-data API, cached and
//! deduplicated per station.

pub mod cache;
pub mod domain;
pub mod opendata;
pub mod stations;
pub mod status;
pub mod web;
