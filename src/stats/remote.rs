use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::TableStats;
use crate::{
    config::RetryConfig,
    error::{AppError, AppResult, http_error, stats_error}
};

/// Failure of a single request, classified before it becomes an [`AppError`].
#[derive(Debug)]
enum RequestError {
    /// Timeouts, refused connections, 429 and 5xx responses
    Transient(AppError),
    /// Anything a retry cannot fix
    Permanent(AppError)
}

impl RequestError {
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Transient(http_error(err))
        } else {
            Self::Permanent(http_error(err))
        }
    }

    fn from_status(status: StatusCode, body: &str) -> Self {
        let error = stats_error(format!("Metadata service error {}: {}", status, body));
        if is_retryable_status(status) {
            Self::Transient(error)
        } else {
            Self::Permanent(error)
        }
    }
}

/// HTTP client for a table metadata service with retry support.
///
/// Each reference is requested as `GET {base_url}/tables/{reference}`. A 404
/// means the service knows nothing about the table. Transient failures are
/// retried with exponential backoff.
pub struct RemoteCatalog {
    base_url:     String,
    client:       reqwest::Client,
    retry_config: RetryConfig
}

impl RemoteCatalog {
    pub fn new(base_url: String, timeout: Duration, retry_config: RetryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url,
            client,
            retry_config
        }
    }

    pub fn table_url(&self, reference: &str) -> String {
        format!("{}/tables/{}", self.base_url.trim_end_matches('/'), reference)
    }

    /// Fetch statistics for one table with automatic retry
    pub async fn fetch(&self, reference: &str) -> AppResult<Option<TableStats>> {
        let mut last_error = None;
        let mut delay = self.retry_config.initial_delay_ms;
        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                warn!(
                    table = %reference,
                    attempt = attempt + 1,
                    max_attempts = self.retry_config.max_retries + 1,
                    delay_ms = delay,
                    "retrying table statistics request"
                );
                sleep(Duration::from_millis(delay)).await;
                delay = ((delay as f64 * self.retry_config.backoff_factor) as u64)
                    .min(self.retry_config.max_delay_ms);
            }
            match self.request(reference).await {
                Ok(result) => return Ok(result),
                Err(RequestError::Transient(e)) => {
                    debug!(table = %reference, error = %e.render_message(), "transient failure");
                    last_error = Some(e);
                }
                Err(RequestError::Permanent(e)) => return Err(e)
            }
        }
        Err(last_error.unwrap_or_else(|| stats_error("All retry attempts failed")))
    }

    async fn request(&self, reference: &str) -> Result<Option<TableStats>, RequestError> {
        let url = self.table_url(reference);
        debug!(%url, "requesting table statistics");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(RequestError::from_reqwest)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RequestError::from_status(status, &text));
        }
        let stats: TableStats = response
            .json()
            .await
            .map_err(|e| RequestError::Permanent(http_error(e)))?;
        Ok(Some(stats))
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
