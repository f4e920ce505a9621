//! HTTP client for the Agoda affiliate long-tail search API.
//!
//! Wraps a single `reqwest` session carrying the static credential header.
//! Every call goes through [`retry_with_backoff`]; error bodies and non-200
//! statuses are mapped to typed [`AgodaError`] variants.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Url};

use crate::classify::status_error;
use crate::error::AgodaError;
use crate::request::{build_city_payload, build_hotel_payload, CitySearchCriteria, HotelSearchCriteria};
use crate::retry::{retry_with_backoff, RetryPolicy};
use crate::types::{ApiErrorBody, HotelRecord, SearchResult};

const DEFAULT_BASE_URL: &str = "http://affiliateapi7643.agoda.com/affiliateservice/lt_v1";

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the affiliate search endpoint.
///
/// Owns one authenticated session reused by every call. Use
/// [`AgodaClient::new`] for production or [`AgodaClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug)]
pub struct AgodaClient {
    client: Client,
    base_url: Url,
    retry: RetryPolicy,
}

impl AgodaClient {
    /// Creates a client pointed at the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`AgodaError::MissingCredentials`] if either credential is
    /// blank, before any network activity.
    pub fn new(site_id: &str, api_key: &str) -> Result<Self, AgodaError> {
        Self::with_base_url(site_id, api_key, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// - [`AgodaError::MissingCredentials`] if either credential is blank.
    /// - [`AgodaError::Precondition`] if `base_url` does not parse or the
    ///   credentials cannot be carried in a header.
    /// - [`AgodaError::Transport`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(site_id: &str, api_key: &str, base_url: &str) -> Result<Self, AgodaError> {
        let site_id = site_id.trim();
        let api_key = api_key.trim();
        if site_id.is_empty() {
            return Err(AgodaError::MissingCredentials("site id is empty"));
        }
        if api_key.is_empty() {
            return Err(AgodaError::MissingCredentials("API key is empty"));
        }

        let mut auth = HeaderValue::from_str(&format!("{site_id}:{api_key}")).map_err(|e| {
            AgodaError::Precondition(format!("credentials are not a valid header value: {e}"))
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip,deflate"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("staycheck/0.1 (availability-verification)")
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(base_url)
            .map_err(|e| AgodaError::Precondition(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            retry: RetryPolicy::default(),
        })
    }

    /// Replaces the retry policy (attempt budget and back-off delays).
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Searches hotels in a city.
    ///
    /// # Errors
    ///
    /// - [`AgodaError::Precondition`] if the criteria are invalid (no request sent).
    /// - [`AgodaError::Client`] / [`AgodaError::Api`] / [`AgodaError::Decode`] /
    ///   [`AgodaError::Protocol`] on the first non-retryable failure.
    /// - [`AgodaError::RetryExhausted`] when every attempt hit a transient failure.
    pub async fn search_by_city(
        &self,
        criteria: &CitySearchCriteria,
    ) -> Result<SearchResult, AgodaError> {
        let payload = build_city_payload(criteria)?;
        tracing::debug!(city_id = criteria.city_id, "city search");
        self.post_search(&payload).await
    }

    /// Searches specific hotels by id.
    ///
    /// # Errors
    ///
    /// Same as [`AgodaClient::search_by_city`].
    pub async fn search_by_hotel_ids(
        &self,
        criteria: &HotelSearchCriteria,
    ) -> Result<SearchResult, AgodaError> {
        let payload = build_hotel_payload(criteria)?;
        tracing::debug!(hotel_ids = ?criteria.hotel_ids, "hotel search");
        self.post_search(&payload).await
    }

    async fn post_search(&self, payload: &serde_json::Value) -> Result<SearchResult, AgodaError> {
        let result =
            retry_with_backoff(&self.retry, |attempt| self.send_once(payload, attempt)).await;
        match &result {
            Ok(found) => tracing::info!(results = found.hotels.len(), "API request successful"),
            Err(e) => tracing::error!(code = e.code(), error = %e, "API request failed"),
        }
        result
    }

    /// One POST, no retry.
    async fn send_once(
        &self,
        payload: &serde_json::Value,
        attempt: u32,
    ) -> Result<SearchResult, AgodaError> {
        tracing::debug!(
            attempt,
            max_attempts = self.retry.max_attempts,
            %payload,
            "API request"
        );
        let response = self
            .client
            .post(self.base_url.clone())
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!(status, "API response status");
        if status != 200 {
            return Err(status_error(status));
        }

        let body = response.text().await?;
        parse_search_body(&body)
    }
}

/// Parses a 200 response body into hotel records.
///
/// # Errors
///
/// - [`AgodaError::Decode`] if the body is not JSON.
/// - [`AgodaError::Api`] if the body carries an `error` object.
/// - [`AgodaError::Protocol`] if the JSON is not an object or `results` is
///   not a list of hotel records.
pub(crate) fn parse_search_body(body: &str) -> Result<SearchResult, AgodaError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| AgodaError::Decode {
            context: "search response".to_owned(),
            source: e,
        })?;

    let Some(envelope) = value.as_object() else {
        return Err(AgodaError::Protocol(format!(
            "expected a JSON object, got {}",
            json_kind(&value)
        )));
    };

    if let Some(error) = envelope.get("error") {
        let (id, message) = match serde_json::from_value::<ApiErrorBody>(error.clone()) {
            Ok(body) => (body.id, body.message.unwrap_or_else(|| "Unknown error".to_owned())),
            Err(_) => (0, "Unknown error".to_owned()),
        };
        tracing::error!(id, message = %message, "API returned an error object");
        return Err(AgodaError::Api { id, message });
    }

    let hotels = match envelope.get("results") {
        None | Some(serde_json::Value::Null) => Vec::new(),
        Some(results) => serde_json::from_value::<Vec<HotelRecord>>(results.clone())
            .map_err(|e| AgodaError::Protocol(format!("malformed results: {e}")))?,
    };
    Ok(SearchResult { hotels })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
