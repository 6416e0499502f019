//! ACME-DNS compatible updates (`POST /acmedns/update`)
//!
//! Clients send the domain being validated; the challenge lives at the
//! `_acme-challenge` label below it.

use super::present;
use crate::fqdn::split_fqdn;
use crate::record::RecordType;
use crate::request::{Credentials, UpdateRequest};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Label prepended to the subdomain when missing
pub const ACME_CHALLENGE_LABEL: &str = "_acme-challenge";

/// JSON body of an ACME-DNS update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcmeDnsUpdate {
    pub subdomain: Option<String>,
    pub txt: Option<String>,
}

/// JSON reply of a successful update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcmeDnsResponse {
    pub txt: String,
}

/// Build a TXT update for the challenge record of `subdomain`
pub fn parse(update: &AcmeDnsUpdate, credentials: Option<Credentials>) -> Result<UpdateRequest> {
    let (Some(subdomain), Some(txt)) = (present(&update.subdomain), present(&update.txt)) else {
        return Err(Error::bad_request("subdomain or txt is missing"));
    };

    let (name, zone) = split_fqdn(subdomain)?;
    let name = if is_challenge_name(&name) {
        name
    } else if name.is_empty() {
        ACME_CHALLENGE_LABEL.to_string()
    } else {
        format!("{ACME_CHALLENGE_LABEL}.{name}")
    };

    Ok(UpdateRequest::from_parts(name, zone, txt, RecordType::Txt).with_credentials(credentials))
}

fn is_challenge_name(name: &str) -> bool {
    name.strip_prefix(ACME_CHALLENGE_LABEL)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(subdomain: Option<&str>, txt: Option<&str>) -> AcmeDnsUpdate {
        AcmeDnsUpdate {
            subdomain: subdomain.map(str::to_string),
            txt: txt.map(str::to_string),
        }
    }

    #[test]
    fn prefixes_challenge_label() {
        let req = parse(&update(Some("txtsub.test.tld"), Some("v")), None).unwrap();
        assert_eq!(req.full_name(), "_acme-challenge.txtsub.test.tld");
        assert_eq!(req.name(), "_acme-challenge.txtsub");
        assert_eq!(req.record_type(), RecordType::Txt);
    }

    #[test]
    fn keeps_existing_challenge_label() {
        let req = parse(&update(Some("_acme-challenge.txtsub.test.tld"), Some("v")), None).unwrap();
        assert_eq!(req.name(), "_acme-challenge.txtsub");
    }

    #[test]
    fn requires_both_fields() {
        for u in [update(None, Some("v")), update(Some("a.test.tld"), None), update(Some("a.b"), Some(""))] {
            assert_eq!(parse(&u, None).unwrap_err().to_string(), "subdomain or txt is missing");
        }
    }

    #[test]
    fn prefixes_zone_apex() {
        let req = parse(&update(Some("test.tld."), Some("v")), None).unwrap();
        assert_eq!(req.full_name(), "_acme-challenge.test.tld");
        assert_eq!(req.name(), "_acme-challenge");
    }

    #[test]
    fn validates_the_name_before_prefixing() {
        let err = parse(&update(Some("tld"), Some("v")), None).unwrap_err();
        assert_eq!(err.to_string(), "invalid fqdn: tld");
    }
}
