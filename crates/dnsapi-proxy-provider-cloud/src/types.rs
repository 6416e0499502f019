//! Request and response envelopes of the Cloud API

use dnsapi_proxy_core::traits::{Action, CloudZone, RRSet, RRSetRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct ZoneResponse {
    pub zone: CloudZone,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RRSetResponse {
    pub rrset: RRSet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateRRSetResponse {
    #[serde(default)]
    pub action: Option<Action>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionResponse {
    pub action: Action,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChangeTtlRequest {
    pub ttl: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecordsRequest<'a> {
    pub records: &'a [RRSetRecord],
}
