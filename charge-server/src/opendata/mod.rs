//! Open-data EV charger API client.
//!
//! This module provides an HTTP client for the public charger information
//! service that reports near-real-time per-charger availability.
//!
//! Key characteristics of the upstream:
//! - Responses wrap records in an `items.item` envelope that is simply
//!   absent when a station has no data
//! - Errors can be reported inside a 200 response via `resultCode`
//! - Status code `"2"` is the only value meaning "available"

mod client;
mod error;
mod mock;
mod types;

pub use client::{ChargerInfoClient, ChargerInfoConfig};
pub use error::StatusError;
pub use mock::MockStatusSource;
pub use types::{ChargerInfoItem, ChargerInfoItems, ChargerInfoResponse};
