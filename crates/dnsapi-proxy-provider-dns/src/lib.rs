// # DNS Record API Client
//
// This crate implements `LegacyDnsApi` against the flat DNS record API
// (Hetzner DNS Console API v1).
//
// ## Behaviour
//
// - One HTTP request per trait call, no retries (failures surface to the
//   orchestrator and from there to the caller as a 500)
// - Request timeout taken from the proxy configuration
// - Non-2xx statuses are mapped to `Error::Provider` with the status code
//
// ## Security Requirements
//
// - API token NEVER appears in logs or `Debug` output
// - Construction fails fast if the token is empty
//
// ## API Reference
//
// - List zones: GET `/zones`
// - List records: GET `/records?zone_id=...`
// - Create record: POST `/records`
// - Update record: PUT `/records/:record_id`
//
// All calls carry the token in the `Auth-API-Token` header.

mod types;

use async_trait::async_trait;
use dnsapi_proxy_core::traits::{LegacyDnsApi, Record, Zone};
use dnsapi_proxy_core::{Error, Result};
use reqwest::{Method, RequestBuilder, Response};
use std::time::Duration;
use types::{RecordsResponse, ZonesResponse};

/// Provider name used in errors and logs
pub const PROVIDER_NAME: &str = "dns";

/// Header carrying the API token
const AUTH_HEADER: &str = "Auth-API-Token";

/// Client of the flat DNS record API
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct DnsApiClient {
    /// Base URL without trailing slash, e.g. `https://dns.hetzner.com/api/v1`
    base_url: String,

    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for DnsApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnsApiClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl DnsApiClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, e.g. `https://dns.hetzner.com/api/v1`
    /// - `api_token`: token sent in the `Auth-API-Token` header
    /// - `timeout`: per-request timeout
    ///
    /// # Errors
    ///
    /// Fails if the token is empty or the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("DNS API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            client,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(AUTH_HEADER, &self.api_token)
    }

    /// Send a request and fail on transport errors or non-2xx statuses
    async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("{what} request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        Err(match status.as_u16() {
            401 | 403 => Error::provider(
                PROVIDER_NAME,
                format!("{what}: authentication failed, check the API token. Status: {status}"),
            ),
            429 => Error::provider(
                PROVIDER_NAME,
                format!("{what}: rate limit exceeded. Status: {status}"),
            ),
            _ => Error::provider(
                PROVIDER_NAME,
                format!("{what} request failed with status code {}: {}", status.as_u16(), body.trim()),
            ),
        })
    }

    async fn write_record(&self, method: Method, path: &str, record: &Record) -> Result<()> {
        let what = format!("{method} {path}");
        self.send(&what, self.request(method, path).json(record))
            .await
            .map(drop)
    }
}

#[async_trait]
impl LegacyDnsApi for DnsApiClient {
    async fn zones(&self) -> Result<Vec<Zone>> {
        tracing::debug!("Listing zones");

        let response = self.send("GET /zones", self.request(Method::GET, "/zones")).await?;
        let zones: ZonesResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse zones: {e}")))?;

        Ok(zones.zones)
    }

    async fn records(&self, zone_id: &str) -> Result<Vec<Record>> {
        tracing::debug!("Listing records of zone {}", zone_id);

        let request = self
            .request(Method::GET, "/records")
            .query(&[("zone_id", zone_id)]);
        let response = self.send("GET /records", request).await?;
        let records: RecordsResponse = response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse records: {e}")))?;

        Ok(records.records)
    }

    async fn create_record(&self, record: &Record) -> Result<()> {
        tracing::debug!("Creating {} record {}", record.record_type, record.name);
        self.write_record(Method::POST, "/records", record).await
    }

    async fn update_record(&self, record: &Record) -> Result<()> {
        let Some(id) = record.id.as_deref() else {
            return Err(Error::provider(PROVIDER_NAME, "cannot update a record without id"));
        };

        tracing::debug!("Updating {} record {} ({})", record.record_type, record.name, id);
        self.write_record(Method::PUT, &format!("/records/{id}"), record)
            .await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
