//! Auth + tariff query client
//!
//! Two-call protocol against the Norgesnett API: obtain an api key for the
//! configured credentials, then query the tariff document with that key. A
//! fresh key is requested on every cycle; nothing is cached between cycles.

use super::types::TariffSnapshot;
use crate::config::{ApiConfig, CredentialsConfig};
use crate::error::{NettleieError, Result};
use crate::http::HttpExecutor;
use crate::logging::{StructuredLogger, get_logger};
use chrono::{Local, NaiveDateTime};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::json;

/// Header carrying the per-cycle api key on the tariff query
const API_KEY_HEADER: &str = "X-API-Key";

/// Client for the two-step authenticate-then-query protocol
pub struct TariffClient {
    credentials: CredentialsConfig,
    auth_url: String,
    tariffs_url: String,
    executor: HttpExecutor,
    logger: StructuredLogger,
}

impl TariffClient {
    /// Create a new client for one configured credential set
    pub fn new(credentials: CredentialsConfig, api: &ApiConfig, executor: HttpExecutor) -> Self {
        Self {
            credentials,
            auth_url: api.auth_url.clone(),
            tariffs_url: api.tariffs_url.clone(),
            executor,
            logger: get_logger("tariff_client"),
        }
    }

    /// Fetch a fresh tariff snapshot.
    ///
    /// Authentication failure, tariff-query failure and a malformed response
    /// each surface with their own error class; the coordinator folds them
    /// into one refresh-failed status.
    pub async fn fetch_data(&self) -> Result<TariffSnapshot> {
        let api_key = self.authenticate().await?;

        // The query window is the same instant on both ends: the API is
        // always asked for "now".
        let stamp = query_timestamp(Local::now().naive_local());
        let body = json!({
            "range": "today",
            "startTime": stamp,
            "endTime": stamp,
            "meteringPointIds": [self.credentials.metering_point_id],
        });

        let mut headers = json_headers();
        headers.insert(
            API_KEY_HEADER,
            HeaderValue::from_str(&api_key)
                .map_err(|_| NettleieError::auth("api key is not a valid header value"))?,
        );

        let value = self
            .executor
            .call("post", &self.tariffs_url, Some(&body), headers)
            .await
            .map_err(|e| {
                self.logger
                    .error(&format!("Tariff query failed: {}", e));
                e
            })?;

        let snapshot: TariffSnapshot = serde_json::from_value(value)?;
        self.logger.debug(&format!(
            "Fetched tariff snapshot with {} collection(s)",
            snapshot.grid_tariff_collections.len()
        ));
        Ok(snapshot)
    }

    /// Request an api key for the configured credentials.
    ///
    /// The key is ephemeral and never persisted; a missing `apiKey` field in
    /// an otherwise successful response is a parse failure and is not retried
    /// here (the executor already applied its retry policy to the call).
    async fn authenticate(&self) -> Result<String> {
        let body = json!({
            "customerId": self.credentials.customer_id,
            "meteringPointId": self.credentials.metering_point_id,
        });

        let value = self
            .executor
            .call("post", &self.auth_url, Some(&body), json_headers())
            .await
            .map_err(|e| {
                self.logger
                    .error(&format!("Authentication request failed: {}", e));
                e
            })?;

        value
            .get("apiKey")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| NettleieError::parse("auth response missing apiKey"))
    }
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_static("application/json; charset=UTF-8"),
    );
    headers
}

/// Local wall-clock time truncated to whole seconds as an ISO-8601 string
pub fn query_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%dT%H:%M:%S").to_string()
}
