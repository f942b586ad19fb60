// crates/convert-ssr-client/src/http.rs
// ============================================================================
// Module: HTTP Conversion Client
// Description: reqwest-backed conversion client with strict limits.
// Purpose: Retrieve conversion data for a `types`/`value` pair.
// Dependencies: convert-ssr-core, reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! The client resolves its endpoint once at construction time and appends
//! `types` and `value` as query parameters on every fetch. Non-success
//! statuses, oversized bodies, and undecodable JSON map onto distinct
//! [`FetchError`] variants so callers can label failures.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use convert_ssr_core::ConversionClient;
use convert_ssr_core::ConversionData;
use convert_ssr_core::FetchError;
use reqwest::Client;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Configuration for [`HttpConversionClient`].
///
/// # Invariants
/// - `request_timeout` bounds the whole request, including the body read.
/// - `max_response_bytes` is a hard upper bound on response bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Base URL of the conversion service.
    pub base_url: String,
    /// Path appended to the base URL.
    pub path: String,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Full request timeout.
    pub request_timeout: Duration,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// Allow cleartext HTTP (disabled by default).
    pub allow_http: bool,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost".to_string(),
            path: "/conversions".to_string(),
            connect_timeout: Duration::from_millis(500),
            request_timeout: Duration::from_millis(5_000),
            max_response_bytes: 1024 * 1024,
            allow_http: false,
            user_agent: "convert-ssr/0.1".to_string(),
        }
    }
}

/// Errors raised while constructing the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Endpoint configuration is invalid.
    #[error("invalid conversion endpoint: {0}")]
    InvalidEndpoint(String),
    /// HTTP client could not be built.
    #[error("conversion client build failed: {0}")]
    Build(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Conversion client backed by an HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpConversionClient {
    /// Resolved endpoint without query parameters.
    endpoint: Url,
    /// Maximum response size allowed, in bytes.
    max_response_bytes: usize,
    /// HTTP client configured with timeouts.
    client: Client,
}

impl HttpConversionClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the endpoint is invalid or the HTTP client
    /// cannot be created.
    pub fn new(config: &HttpClientConfig) -> Result<Self, ClientError> {
        let endpoint = resolve_endpoint(config)?;
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            endpoint,
            max_response_bytes: config.max_response_bytes,
            client,
        })
    }

    /// Returns the resolved endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Builds the request URL for one fetch.
    fn request_url(&self, types: &str, value: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("types", types).append_pair("value", value);
        url
    }
}

#[async_trait]
impl ConversionClient for HttpConversionClient {
    async fn fetch(&self, types: &str, value: &str) -> Result<ConversionData, FetchError> {
        let url = self.request_url(types, value);
        let mut response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        if let Some(length) = response.content_length()
            && !usize::try_from(length).is_ok_and(|length| length <= self.max_response_bytes)
        {
            return Err(FetchError::Rejected("conversion response exceeds size limit".to_string()));
        }
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport_error)? {
            if body.len() + chunk.len() > self.max_response_bytes {
                return Err(FetchError::Rejected(
                    "conversion response exceeds size limit".to_string(),
                ));
            }
            body.extend_from_slice(&chunk);
        }
        let value: Value =
            serde_json::from_slice(&body).map_err(|err| FetchError::Decode(err.to_string()))?;
        Ok(ConversionData(value))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves and validates the endpoint URL.
fn resolve_endpoint(config: &HttpClientConfig) -> Result<Url, ClientError> {
    let base = config.base_url.trim().trim_end_matches('/');
    let path = config.path.trim();
    let joined = if path.is_empty() || path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };
    let url = Url::parse(&joined).map_err(|err| ClientError::InvalidEndpoint(err.to_string()))?;
    match url.scheme() {
        "https" => {}
        "http" if config.allow_http => {}
        "http" => {
            return Err(ClientError::InvalidEndpoint(
                "http endpoints require allow_http".to_string(),
            ));
        }
        other => {
            return Err(ClientError::InvalidEndpoint(format!("unsupported scheme {other}")));
        }
    }
    if !url.username().is_empty() || url.password().is_some() {
        return Err(ClientError::InvalidEndpoint(
            "endpoint must not embed credentials".to_string(),
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(ClientError::InvalidEndpoint(
            "endpoint must not carry a query or fragment".to_string(),
        ));
    }
    Ok(url)
}

/// Maps a reqwest error onto a transport fetch error.
fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Transport("conversion request timed out".to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for endpoint resolution.
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions use unwrap/expect for clarity."
    )]

    use super::HttpClientConfig;
    use super::resolve_endpoint;

    /// Builds client settings for endpoint resolution tests.
    fn config(base_url: &str, path: &str, allow_http: bool) -> HttpClientConfig {
        HttpClientConfig {
            base_url: base_url.to_string(),
            path: path.to_string(),
            allow_http,
            ..HttpClientConfig::default()
        }
    }

    /// Verifies endpoint joins base and path.
    #[test]
    fn endpoint_joins_base_and_path() {
        let url = resolve_endpoint(&config("https://rates.example/api/", "v1/conversions", false))
            .unwrap();
        assert_eq!(url.as_str(), "https://rates.example/api/v1/conversions");
    }

    /// Verifies cleartext requires opt in.
    #[test]
    fn cleartext_requires_opt_in() {
        assert!(resolve_endpoint(&config("http://127.0.0.1:9000", "/c", false)).is_err());
        assert!(resolve_endpoint(&config("http://127.0.0.1:9000", "/c", true)).is_ok());
    }

    /// Verifies credentials and query rejected.
    #[test]
    fn credentials_and_query_rejected() {
        let err = resolve_endpoint(&config("https://user:pw@rates.example", "/c", false))
            .expect_err("credentials");
        assert!(err.to_string().contains("credentials"));
        assert!(resolve_endpoint(&config("https://rates.example", "/c?x=1", false)).is_err());
        assert!(resolve_endpoint(&config("ftp://rates.example", "/c", false)).is_err());
    }
}
