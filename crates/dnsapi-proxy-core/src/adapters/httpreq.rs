//! Lego `httpreq` provider (`POST /httpreq/present`, `POST /httpreq/cleanup`)

use super::present;
use crate::record::RecordType;
use crate::request::{Credentials, UpdateRequest};
use crate::{Error, Result};
use serde::Deserialize;

/// JSON body of a present or cleanup call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpReqPayload {
    pub fqdn: Option<String>,
    pub value: Option<String>,
}

/// Build the TXT update for a present call
pub fn parse_present(
    payload: &HttpReqPayload,
    credentials: Option<Credentials>,
) -> Result<UpdateRequest> {
    let (Some(fqdn), Some(value)) = (present(&payload.fqdn), present(&payload.value)) else {
        return Err(Error::bad_request("fqdn or value is missing"));
    };

    Ok(UpdateRequest::from_fqdn(fqdn, value, RecordType::Txt)?.with_credentials(credentials))
}

/// Build the TXT request for a cleanup call; the value is optional
pub fn parse_cleanup(
    payload: &HttpReqPayload,
    credentials: Option<Credentials>,
) -> Result<UpdateRequest> {
    let Some(fqdn) = present(&payload.fqdn) else {
        return Err(Error::bad_request("fqdn is missing"));
    };
    let value = present(&payload.value).unwrap_or_default();

    Ok(UpdateRequest::from_fqdn(fqdn, value, RecordType::Txt)?.with_credentials(credentials))
}
