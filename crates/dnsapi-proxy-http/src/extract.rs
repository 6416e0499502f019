//! Per-request caller identity
//!
//! Resolves the effective client address (honouring trusted proxies) and
//! the credentials the caller presented.

use crate::AppState;
use crate::error::ApiError;
use async_trait::async_trait;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use dnsapi_proxy_core::{ClientIpResolver, Credentials, ForwardingHeaders, Result};
use std::net::SocketAddr;

const X_REAL_IP: &str = "x-real-ip";
const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_API_USER: &str = "x-api-user";
const X_API_KEY: &str = "x-api-key";

/// Who is calling
#[derive(Debug, Clone)]
pub struct Caller {
    /// Effective client address
    pub ip: String,
    /// HTTP basic credentials, if any
    pub basic: Option<Credentials>,
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let ip = resolve_ip(&state.client_ip, parts)?;

        Ok(Self {
            ip,
            basic: basic_credentials(&parts.headers),
        })
    }
}

fn resolve_ip(resolver: &ClientIpResolver, parts: &Parts) -> Result<String> {
    let remote_addr = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    let headers = ForwardingHeaders {
        real_ip: header_str(&parts.headers, X_REAL_IP),
        forwarded_for: header_str(&parts.headers, X_FORWARDED_FOR),
    };

    resolver.resolve(&remote_addr, headers)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Credentials from an `Authorization: Basic` header
///
/// Malformed headers count as no credentials.
pub(crate) fn basic_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let value = header_str(headers, header::AUTHORIZATION.as_str())?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some(Credentials::new(username, password))
}

/// Credentials from the ACME-DNS `X-Api-User` / `X-Api-Key` pair
///
/// Both headers must be present and non-empty.
pub(crate) fn api_key_credentials(headers: &HeaderMap) -> Option<Credentials> {
    let user = header_str(headers, X_API_USER).filter(|v| !v.is_empty())?;
    let key = header_str(headers, X_API_KEY).filter(|v| !v.is_empty())?;

    Some(Credentials::new(user, key))
}
