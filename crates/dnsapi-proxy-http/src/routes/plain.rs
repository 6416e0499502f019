use crate::error::ApiError;
use crate::extract::Caller;
use crate::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use dnsapi_proxy_core::adapters::plain::{self, PlainParams};

/// `GET /plain/update?hostname=<fqdn>&ip=<addr>`
pub(crate) async fn update(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<PlainParams>, QueryRejection>,
) -> Result<StatusCode, ApiError> {
    let params = super::query(params)?;
    let request = plain::parse(&params, caller.basic)?;

    state.update(&caller.ip, &request).await?;
    Ok(StatusCode::OK)
}
