//! HTTP client for the remote catalog endpoint.

use std::time::Duration;

use catalog_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::ClientError;
use crate::retry::retry_with_backoff;
use crate::types::{records_from_payload, RawProduct};

/// Connection settings for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_url: String,
    pub user_agent: String,
    /// Whole-request timeout. `None` disables both the request and the
    /// connect timeout.
    pub request_timeout_secs: Option<u64>,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_secs * 2^attempt`.
    pub backoff_base_secs: u64,
}

impl ClientSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            api_url: config.api_url.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout_secs: config.request_timeout_secs,
            max_retries: config.max_retries,
            backoff_base_secs: config.retry_backoff_base_secs,
        }
    }
}

/// Fetches the product catalog in a single GET.
///
/// Rate limiting (429) and transport failures are retried with exponential
/// backoff up to `max_retries` additional attempts; every other non-2xx
/// response is a typed error.
pub struct CatalogClient {
    client: Client,
    endpoint: Url,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl CatalogClient {
    /// Creates a `CatalogClient` for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if `api_url` is not an
    /// absolute http(s) URL, or [`ClientError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(settings: &ClientSettings) -> Result<Self, ClientError> {
        let endpoint = parse_endpoint(&settings.api_url)?;

        let mut builder = Client::builder().user_agent(&settings.user_agent);
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder
                .timeout(Duration::from_secs(secs))
                .connect_timeout(Duration::from_secs(secs.min(10)));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
            max_retries: settings.max_retries,
            backoff_base_secs: settings.backoff_base_secs,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetches the raw catalog records.
    ///
    /// A JSON body without a `products` array yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RateLimited`]: HTTP 429 after all retries exhausted.
    /// - [`ClientError::UnexpectedStatus`]: any other non-2xx status (not retried).
    /// - [`ClientError::Http`]: network or TLS failure after all retries exhausted.
    /// - [`ClientError::Deserialize`]: response body is not valid JSON (not retried).
    pub async fn fetch_catalog(&self) -> Result<Vec<RawProduct>, ClientError> {
        let payload = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.fetch_payload()
        })
        .await?;

        let records = records_from_payload(payload);
        tracing::debug!(
            endpoint = %self.endpoint,
            records = records.len(),
            "catalog payload received"
        );
        Ok(records)
    }

    async fn fetch_payload(&self) -> Result<serde_json::Value, ClientError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(60);
            return Err(ClientError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
            context: format!("catalog from {}", self.endpoint),
            source: e,
        })
    }
}

/// Parses and checks the configured endpoint.
///
/// # Errors
///
/// Returns [`ClientError::InvalidEndpoint`] for unparseable URLs and for
/// schemes other than `http`/`https`.
fn parse_endpoint(api_url: &str) -> Result<Url, ClientError> {
    let url = Url::parse(api_url.trim()).map_err(|e| ClientError::InvalidEndpoint {
        url: api_url.to_owned(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::InvalidEndpoint {
            url: api_url.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }

    Ok(url)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
