//! DirectAdmin compatible API (`/directadmin/CMD_API_*`)
//!
//! Only `CMD_API_DNS_CONTROL` with `action=add` changes records. Every
//! other action is acknowledged without touching upstream so that clients
//! which also try to delete records keep working.

use super::present;
use crate::record::RecordType;
use crate::request::{Credentials, UpdateRequest};
use crate::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;

/// Query parameters of `CMD_API_DNS_CONTROL`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DnsControlParams {
    pub domain: Option<String>,
    pub action: Option<String>,
    #[serde(rename = "type")]
    pub record_type: Option<String>,
    pub name: Option<String>,
    pub value: Option<String>,
}

/// What a DNS control call asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DnsControl {
    /// Set a record
    Add(UpdateRequest),
    /// Acknowledge without upstream calls
    Ignored { action: String },
}

/// Interpret a DNS control call
pub fn parse(params: &DnsControlParams, credentials: Option<Credentials>) -> Result<DnsControl> {
    let (Some(domain), Some(action)) = (present(&params.domain), present(&params.action)) else {
        return Err(Error::bad_request("domain or action is missing"));
    };

    if action != "add" {
        return Ok(DnsControl::Ignored {
            action: action.to_string(),
        });
    }

    let record_type = present(&params.record_type)
        .and_then(|record_type| record_type.parse::<RecordType>().ok())
        .ok_or_else(|| Error::bad_request("type can only be A, AAAA or TXT"))?;

    let Some(value) = present(&params.value) else {
        return Err(Error::bad_request("value is missing"));
    };
    check_value(record_type, value)?;

    let request = match present(&params.name) {
        Some(name) => UpdateRequest::from_parts(name, domain, value, record_type),
        None => UpdateRequest::from_fqdn(domain, value, record_type)?,
    };

    Ok(DnsControl::Add(request.with_credentials(credentials)))
}

fn check_value(record_type: RecordType, value: &str) -> Result<()> {
    let family = match record_type {
        RecordType::Txt => return Ok(()),
        RecordType::A | RecordType::Aaaa => value
            .parse::<IpAddr>()
            .map_err(|_| Error::bad_request("invalid ip address"))?,
    };

    match (record_type, family) {
        (RecordType::A, IpAddr::V6(_)) => Err(Error::bad_request("invalid ipv4 address")),
        (RecordType::Aaaa, IpAddr::V4(_)) => Err(Error::bad_request("invalid ipv6 address")),
        _ => Ok(()),
    }
}
