//! Plain query-string updater (`GET /plain/update?hostname=..&ip=..`)

use super::present;
use crate::record::RecordType;
use crate::request::{Credentials, UpdateRequest};
use crate::{Error, Result};
use serde::Deserialize;
use std::net::IpAddr;

/// Query parameters of a plain update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlainParams {
    pub hostname: Option<String>,
    pub ip: Option<String>,
}

/// Build an A or AAAA update from the query, picking the type from the
/// address family
pub fn parse(params: &PlainParams, credentials: Option<Credentials>) -> Result<UpdateRequest> {
    let (Some(hostname), Some(ip)) = (present(&params.hostname), present(&params.ip)) else {
        return Err(Error::bad_request("hostname or ip is missing"));
    };

    let addr: IpAddr = ip
        .parse()
        .map_err(|_| Error::bad_request("invalid ip address"))?;

    Ok(UpdateRequest::from_fqdn(hostname, ip, RecordType::for_ip(addr))?
        .with_credentials(credentials))
}
