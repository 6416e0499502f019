//! Response envelopes of the DNS record API

use dnsapi_proxy_core::traits::{Record, Zone};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ZonesResponse {
    #[serde(default)]
    pub zones: Vec<Zone>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<Record>,
}
