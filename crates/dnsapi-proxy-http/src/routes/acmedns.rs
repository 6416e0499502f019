use crate::error::ApiError;
use crate::extract::{Caller, api_key_credentials};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use dnsapi_proxy_core::adapters::acmedns::{self, AcmeDnsResponse, AcmeDnsUpdate};

/// `POST /acmedns/update` with `{"subdomain": .., "txt": ..}`
///
/// `X-Api-User` / `X-Api-Key` take precedence over basic credentials.
pub(crate) async fn update(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AcmeDnsResponse>, ApiError> {
    super::require_json(&headers)?;
    let payload: AcmeDnsUpdate = super::parse_json(&body)?;

    let credentials = api_key_credentials(&headers).or(caller.basic);
    let request = acmedns::parse(&payload, credentials)?;

    state.update(&caller.ip, &request).await?;
    Ok(Json(AcmeDnsResponse {
        txt: request.value().to_string(),
    }))
}
