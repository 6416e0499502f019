// # Cloud DNS API Client
//
// This crate implements `CloudDnsApi` against the zone/record-set Cloud API
// (Hetzner Cloud API v1, DNS section).
//
// ## Behaviour
//
// - One HTTP request per trait call, no retries
// - Request timeout taken from the proxy configuration
// - A 404 on record-set lookup means "absent"; every other non-2xx status
//   is an `Error::Provider` carrying the API's error code when present
// - Mutating calls hand back the upstream action; waiting for it is the
//   orchestrator's job
//
// ## API Reference
//
// - Get zone: GET `/zones/:name`
// - Get record set: GET `/zones/:zone_id/rrsets/:name/:type`
// - Create record set: POST `/zones/:zone_id/rrsets`
// - Record set actions: POST `/zones/:zone_id/rrsets/:name/:type/actions/{change_ttl,set_records,remove_records}`
// - Get action: GET `/actions/:id`
//
// All calls carry `Authorization: Bearer <token>`.

mod types;

use async_trait::async_trait;
use dnsapi_proxy_core::traits::{Action, CloudDnsApi, CloudZone, RRSet, RRSetCreate, RRSetRecord};
use dnsapi_proxy_core::{Error, RecordType, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::time::Duration;
use types::{
    ActionResponse, ChangeTtlRequest, CreateRRSetResponse, ErrorResponse, RRSetResponse,
    RecordsRequest, ZoneResponse,
};

/// Provider name used in errors and logs
pub const PROVIDER_NAME: &str = "cloud";

/// Client of the zone/record-set Cloud API
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudApiClient {
    /// Base URL without trailing slash, e.g. `https://api.hetzner.cloud/v1`
    base_url: String,

    /// API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudApiClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"<REDACTED>")
            .finish()
    }
}

impl CloudApiClient {
    /// Create a new client
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root, e.g. `https://api.hetzner.cloud/v1`
    /// - `api_token`: bearer token
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
            return Err(Error::config("Cloud API token cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("dnsapi-proxy/", env!("CARGO_PKG_VERSION")))
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
            .bearer_auth(&self.api_token)
    }

    async fn send(&self, what: &str, request: RequestBuilder) -> Result<Response> {
        request
            .send()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("{what} request failed: {e}")))
    }

    /// Turn a non-2xx response into an error, preferring the API's own
    /// error code and message
    async fn status_error(what: &str, response: Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let detail = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(parsed) => format!("{} ({})", parsed.error.message, parsed.error.code),
            Err(_) => body.trim().to_string(),
        };

        Error::provider(
            PROVIDER_NAME,
            format!("{what} failed with status code {}: {detail}", status.as_u16()),
        )
    }

    async fn decode<T: DeserializeOwned>(what: &str, response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(what, response).await);
        }

        response
            .json()
            .await
            .map_err(|e| Error::provider(PROVIDER_NAME, format!("Failed to parse {what} response: {e}")))
    }

    fn rrset_path(zone: &CloudZone, rrset: &RRSet) -> Result<String> {
        Ok(format!(
            "/zones/{}/rrsets/{}/{}",
            zone.id,
            path_segment(&rrset.name)?,
            path_segment(&rrset.record_type)?
        ))
    }

    async fn rrset_action<B: serde::Serialize + Sync>(
        &self,
        zone: &CloudZone,
        rrset: &RRSet,
        action: &str,
        body: &B,
    ) -> Result<Action> {
        let path = format!("{}/actions/{action}", Self::rrset_path(zone, rrset)?);
        tracing::debug!("POST {}", path);

        let response = self
            .send(action, self.request(Method::POST, &path).json(body))
            .await?;
        let parsed: ActionResponse = Self::decode(action, response).await?;
        Ok(parsed.action)
    }
}

/// Percent-encode one caller-supplied path segment
///
/// Dot segments are refused since URL normalization would resolve them
/// even when escaped.
fn path_segment(value: &str) -> Result<Cow<'_, str>> {
    if matches!(value, "" | "." | "..") {
        return Err(Error::bad_request(format!("invalid name: {value:?}")));
    }
    Ok(urlencoding::encode(value))
}

#[async_trait]
impl CloudDnsApi for CloudApiClient {
    async fn get_zone(&self, name: &str) -> Result<CloudZone> {
        tracing::debug!("Looking up zone {}", name);

        let path = format!("/zones/{}", path_segment(name)?);
        let response = self.send("get zone", self.request(Method::GET, &path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::not_found(format!("Zone not found: {name}")));
        }

        let parsed: ZoneResponse = Self::decode("get zone", response).await?;
        Ok(parsed.zone)
    }

    async fn get_rrset(
        &self,
        zone: &CloudZone,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<RRSet>> {
        let path = format!("/zones/{}/rrsets/{}/{record_type}", zone.id, path_segment(name)?);
        tracing::debug!("Looking up record set {}", path);

        let response = self.send("get rrset", self.request(Method::GET, &path)).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let parsed: RRSetResponse = Self::decode("get rrset", response).await?;
        Ok(Some(parsed.rrset))
    }

    async fn create_rrset(&self, zone: &CloudZone, rrset: &RRSetCreate) -> Result<Option<Action>> {
        let path = format!("/zones/{}/rrsets", zone.id);
        tracing::debug!("Creating {} record set {} in zone {}", rrset.record_type, rrset.name, zone.id);

        let response = self
            .send("create rrset", self.request(Method::POST, &path).json(rrset))
            .await?;
        let parsed: CreateRRSetResponse = Self::decode("create rrset", response).await?;
        Ok(parsed.action)
    }

    async fn change_rrset_ttl(&self, zone: &CloudZone, rrset: &RRSet, ttl: u32) -> Result<Action> {
        self.rrset_action(zone, rrset, "change_ttl", &ChangeTtlRequest { ttl })
            .await
    }

    async fn set_rrset_records(
        &self,
        zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action> {
        self.rrset_action(zone, rrset, "set_records", &RecordsRequest { records })
            .await
    }

    async fn remove_rrset_records(
        &self,
        zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action> {
        self.rrset_action(zone, rrset, "remove_records", &RecordsRequest { records })
            .await
    }

    async fn get_action(&self, id: i64) -> Result<Action> {
        let response = self
            .send("get action", self.request(Method::GET, &format!("/actions/{id}")))
            .await?;
        let parsed: ActionResponse = Self::decode("get action", response).await?;
        Ok(parsed.action)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
