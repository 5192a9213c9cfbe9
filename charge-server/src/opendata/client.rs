//! Open-data charger API HTTP client.
//!
//! Queries the public EV charger information service through its
//! `getChargerInfo` endpoint, filtered to one station per request.

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tracing::debug;

use crate::cache::StatusSource;
use crate::domain::{LiveChargerStatus, StationId};

use super::error::StatusError;
use super::types::{ChargerInfoItem, ChargerInfoResponse};

/// Default base URL for the open-data EV charger service.
const DEFAULT_BASE_URL: &str = "http://apis.data.go.kr/B552584/EvCharger";

/// Upstream result code for a successful response.
const RESULT_OK: &str = "00";

/// Default request timeout in seconds.
///
/// The upstream is slow on bad days; anything past this bound is surfaced
/// to the user as a timeout rather than left hanging.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the charger info client.
#[derive(Debug, Clone)]
pub struct ChargerInfoConfig {
    /// Service key issued by the open-data portal.
    pub service_key: String,
    /// Base URL for the API (defaults to production).
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl ChargerInfoConfig {
    /// Create a new config with the given service key.
    pub fn new(service_key: impl Into<String>) -> Self {
        Self {
            service_key: service_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the open-data EV charger API.
#[derive(Debug, Clone)]
pub struct ChargerInfoClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl ChargerInfoClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ChargerInfoConfig) -> Result<Self, StatusError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            service_key: config.service_key,
        })
    }

    /// Fetch the live charger records for one station.
    ///
    /// Returns every charger the upstream reports for the station. An
    /// envelope with no records decodes as an empty list; a reported
    /// upstream error code or a non-success HTTP status is an error.
    pub async fn get_charger_status(
        &self,
        station: &StationId,
    ) -> Result<Vec<LiveChargerStatus>, StatusError> {
        let url = format!("{}/getChargerInfo", self.base_url);

        debug!(station = %station, "fetching charger status");

        let response = self
            .http
            .get(&url)
            .query(&[
                ("serviceKey", self.service_key.as_str()),
                ("statId", station.as_str()),
                ("pageNo", "1"),
                ("numOfRows", "9999"),
                ("dataType", "JSON"),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StatusError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let envelope: ChargerInfoResponse =
            serde_json::from_str(&body).map_err(|e| StatusError::Json {
                message: e.to_string(),
            })?;

        if !envelope.result_code.is_empty() && envelope.result_code != RESULT_OK {
            return Err(StatusError::Upstream {
                code: envelope.result_code,
                message: envelope.result_msg,
            });
        }

        Ok(envelope
            .into_items()
            .into_iter()
            .map(ChargerInfoItem::into_status)
            .collect())
    }
}

impl StatusSource for ChargerInfoClient {
    fn fetch(
        &self,
        station: &StationId,
    ) -> BoxFuture<'static, Result<Vec<LiveChargerStatus>, StatusError>> {
        let client = self.clone();
        let station = station.clone();
        async move { client.get_charger_status(&station).await }.boxed()
    }
}
