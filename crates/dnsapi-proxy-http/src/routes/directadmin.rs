use crate::error::ApiError;
use crate::extract::Caller;
use crate::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use dnsapi_proxy_core::adapters::directadmin::{self, DnsControl, DnsControlParams};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const DNS_CONTROL_OK: &str = "error=0&text=OK";

/// `GET /directadmin/CMD_API_SHOW_DOMAINS`
///
/// Lists the caller's granted domains as `list=<domain>` pairs, sorted.
pub(crate) async fn show_domains(State(state): State<AppState>, caller: Caller) -> impl IntoResponse {
    let domains = state.authorizer().domains(&caller.ip, caller.basic.as_ref());
    let body = domains
        .iter()
        .map(|domain| format!("list={}", urlencoding::encode(domain)))
        .collect::<Vec<_>>()
        .join("&");

    (StatusCode::OK, [(header::CONTENT_TYPE, FORM_URLENCODED)], body)
}

/// `GET /directadmin/CMD_API_DOMAIN_POINTER`
pub(crate) async fn domain_pointer() -> StatusCode {
    StatusCode::OK
}

/// `GET /directadmin/CMD_API_DNS_CONTROL?domain=..&action=..&type=..&name=..&value=..`
pub(crate) async fn dns_control(
    State(state): State<AppState>,
    caller: Caller,
    params: Result<Query<DnsControlParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = super::query(params)?;

    match directadmin::parse(&params, caller.basic)? {
        DnsControl::Add(request) => state.update(&caller.ip, &request).await?,
        DnsControl::Ignored { action } => {
            tracing::debug!("Acknowledging DirectAdmin action {} without changes", action);
        }
    }

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, FORM_URLENCODED)], DNS_CONTROL_OK))
}
