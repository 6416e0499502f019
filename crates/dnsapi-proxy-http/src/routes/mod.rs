//! Route handlers, one module per client protocol

pub(crate) mod acmedns;
pub(crate) mod directadmin;
pub(crate) mod httpreq;
pub(crate) mod plain;

use axum::extract::rejection::QueryRejection;
use axum::extract::Query;
use axum::http::{HeaderMap, header};
use dnsapi_proxy_core::{Error, Result};
use serde::de::DeserializeOwned;

const APPLICATION_JSON: &str = "application/json";

/// Reject bodies not declared as exactly `application/json`
pub(crate) fn require_json(headers: &HeaderMap) -> Result<()> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    if content_type != Some(APPLICATION_JSON) {
        return Err(Error::bad_request("Content-Type must be application/json"));
    }
    Ok(())
}

/// Decode a JSON body, reporting failures as client errors
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body)
        .map_err(|e| Error::bad_request(format!("failed to parse request body: {e}")))
}

/// Unwrap a query extraction, reporting failures as client errors
pub(crate) fn query<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| Error::bad_request(rejection.body_text()))
}
