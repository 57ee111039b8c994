//! HTTP client for the Overpass interpreter.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::OverpassError;
use crate::query::{build_country_query, form_body};
use crate::retry::{max_total_backoff, retry_with_backoff};
use crate::types::{OverpassResponse, RawRecord};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

/// Client for a public Overpass interpreter endpoint.
///
/// Every fetch is one aggregated POST. Each attempt is bounded by
/// `timeout_secs`. Transient failures (network errors, timeouts, 429, 5xx)
/// are retried with exponential backoff, and the whole call is bounded by
/// the per-attempt timeout times the attempt count plus the worst-case
/// backoff between attempts.
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    timeout_secs: u64,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl OverpassClient {
    /// Creates a client for `endpoint` with the given time budget and retry
    /// policy.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::InvalidEndpoint`] if `endpoint` is not an http(s) URL.
    /// - [`OverpassError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, OverpassError> {
        let endpoint = parse_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint,
            timeout_secs,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a client from the `ECOMAP_*` fetch settings.
    ///
    /// # Errors
    ///
    /// See [`OverpassClient::new`].
    pub fn from_config(config: &ecomap_core::AppConfig) -> Result<Self, OverpassError> {
        Self::new(
            &config.overpass_url,
            config.fetch_timeout_secs,
            &config.user_agent,
            config.fetch_max_retries,
            config.fetch_retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// Fetches hospitals, recycling points and shelters inside the country
    /// identified by `country_code`.
    ///
    /// # Errors
    ///
    /// See [`OverpassClient::fetch_elements`].
    pub async fn fetch_country(&self, country_code: &str) -> Result<Vec<RawRecord>, OverpassError> {
        self.fetch_elements(&build_country_query(country_code)).await
    }

    /// Runs `query` and returns the `elements` of the response.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::Timeout`]: the time budget ran out.
    /// - [`OverpassError::RateLimited`]: HTTP 429 after all retries.
    /// - [`OverpassError::UnexpectedStatus`]: any other non-2xx status.
    /// - [`OverpassError::Http`]: network or TLS failure after all retries.
    /// - [`OverpassError::MalformedResponse`]: the body is not JSON (not retried).
    pub async fn fetch_elements(&self, query: &str) -> Result<Vec<RawRecord>, OverpassError> {
        let body = form_body(query);
        let budget = self.time_budget();

        let attempt = retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            self.post_form(body.clone())
        });

        let response = tokio::time::timeout(budget, attempt)
            .await
            .map_err(|_| OverpassError::Timeout {
                timeout_secs: budget.as_secs() + u64::from(budget.subsec_nanos() > 0),
            })??;

        if let Some(remark) = &response.remark {
            tracing::warn!(remark = %remark, elements = response.elements.len(), "Overpass returned a remark");
        }
        tracing::debug!(
            endpoint = %self.endpoint,
            elements = response.elements.len(),
            "Overpass query complete"
        );
        Ok(response.elements)
    }

    /// Upper bound for a whole fetch, retries and backoff included.
    #[must_use]
    pub fn time_budget(&self) -> Duration {
        let attempts = self.max_retries.saturating_add(1);
        Duration::from_secs(self.timeout_secs)
            .saturating_mul(attempts)
            .saturating_add(max_total_backoff(self.max_retries, self.backoff_base_secs))
    }

    async fn post_form(&self, body: String) -> Result<OverpassResponse, OverpassError> {
        let url = self.endpoint.to_string();
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, "application/json")
            .body(body)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(0);
            return Err(OverpassError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            return Err(OverpassError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let text = response.text().await?;
        serde_json::from_str::<OverpassResponse>(&text)
            .map_err(|source| OverpassError::MalformedResponse { url, source })
    }
}

fn parse_endpoint(endpoint: &str) -> Result<Url, OverpassError> {
    let url = Url::parse(endpoint).map_err(|e| OverpassError::InvalidEndpoint {
        url: endpoint.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(OverpassError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: format!("unsupported scheme \"{}\"", url.scheme()),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
