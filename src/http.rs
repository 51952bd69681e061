//! HTTP request executor
//!
//! Performs a single JSON-in/JSON-out HTTP call with a per-attempt timeout
//! and retries transport-level failures with exponential backoff. Decode
//! failures are a distinct class and never consume a retry attempt. The
//! executor is stateless across calls; every other component sits on top of
//! it.

use crate::config::HttpConfig;
use crate::error::{NettleieError, Result};
use crate::logging::{StructuredLogger, get_logger};
use reqwest::Method;
use reqwest::header::HeaderMap;
use tokio::time::{Duration, sleep};

/// JSON HTTP executor with retry and backoff
pub struct HttpExecutor {
    client: reqwest::Client,
    max_attempts: u32,
    backoff_base: Duration,
    logger: StructuredLogger,
}

impl HttpExecutor {
    /// Create a new executor from HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            logger: get_logger("http"),
        })
    }

    /// Execute a JSON request and return the decoded response body.
    ///
    /// Supported methods are GET, PUT, PATCH and POST; anything else is a
    /// programming-contract violation and fails loudly. Transport failures
    /// (timeout, connection error, non-2xx status) are retried up to the
    /// configured attempt cap with doubling delays; the last error is
    /// surfaced once attempts are exhausted.
    pub async fn call(
        &self,
        method: &str,
        url: &str,
        body: Option<&serde_json::Value>,
        headers: HeaderMap,
    ) -> Result<serde_json::Value> {
        let method = match parse_method(method) {
            Ok(m) => m,
            Err(e) => {
                self.logger.error(&format!("{} for {}", e, url));
                return Err(e);
            }
        };

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            self.logger.debug(&format!(
                "{} {} (attempt {}/{})",
                method, url, attempt, self.max_attempts
            ));

            match self.attempt(&method, url, body, headers.clone()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    self.logger.warn(&format!(
                        "{} {} failed on attempt {}/{}: {}; retrying in {}ms",
                        method,
                        url,
                        attempt,
                        self.max_attempts,
                        e,
                        delay.as_millis()
                    ));
                    sleep(delay).await;
                }
                Err(e) => {
                    self.logger.error(&format!(
                        "{} {} failed after {} attempt(s): {}",
                        method, url, attempt, e
                    ));
                    return Err(e);
                }
            }
        }
    }

    /// One request/response cycle; classification happens via `From<reqwest::Error>`
    async fn attempt(
        &self,
        method: &Method,
        url: &str,
        body: Option<&serde_json::Value>,
        headers: HeaderMap,
    ) -> Result<serde_json::Value> {
        let mut request = self.client.request(method.clone(), url).headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let response = response
            .error_for_status()
            .map_err(|e| NettleieError::network(e.to_string()))?;
        let value = response.json::<serde_json::Value>().await?;
        Ok(value)
    }

    /// Delay before the attempt following `attempt` (1-based)
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

/// Map a method name onto the reqwest method set the executor supports
fn parse_method(method: &str) -> Result<Method> {
    match method.to_lowercase().as_str() {
        "get" => Ok(Method::GET),
        "put" => Ok(Method::PUT),
        "patch" => Ok(Method::PATCH),
        "post" => Ok(Method::POST),
        other => Err(NettleieError::unsupported_method(other)),
    }
}
