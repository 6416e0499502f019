use crate::error::ApiError;
use crate::extract::Caller;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use dnsapi_proxy_core::adapters::httpreq::{self, HttpReqPayload};

/// `POST /httpreq/present` with `{"fqdn": .., "value": ..}`
pub(crate) async fn present(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    super::require_json(&headers)?;
    let payload: HttpReqPayload = super::parse_json(&body)?;
    let request = httpreq::parse_present(&payload, caller.basic)?;

    state.update(&caller.ip, &request).await?;
    Ok(StatusCode::OK)
}

/// `POST /httpreq/cleanup` with `{"fqdn": .., "value": ..}`
pub(crate) async fn cleanup(
    State(state): State<AppState>,
    caller: Caller,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let payload: HttpReqPayload = super::parse_json(&body)?;
    let request = httpreq::parse_cleanup(&payload, caller.basic)?;

    state.clean(&caller.ip, &request).await?;
    Ok(StatusCode::OK)
}
