//! Canonical update request produced by every protocol adapter

use crate::Result;
use crate::fqdn::split_fqdn;
use crate::record::RecordType;
use std::fmt;

/// Username and password supplied by the caller
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Username
    pub username: String,
    /// Password
    /// ⚠️ NEVER log this value
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Custom Debug implementation that hides the password
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .finish()
    }
}

/// A normalized request to set (or clean) one record
///
/// Built once per HTTP exchange and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    full_name: String,
    name: String,
    zone: String,
    value: String,
    record_type: RecordType,
    credentials: Option<Credentials>,
}

impl UpdateRequest {
    /// Build a request from a fully qualified name, splitting it into
    /// subname and zone
    pub fn from_fqdn(
        full_name: &str,
        value: impl Into<String>,
        record_type: RecordType,
    ) -> Result<Self> {
        let full_name = full_name.strip_suffix('.').unwrap_or(full_name);
        let (name, zone) = split_fqdn(full_name)?;

        Ok(Self {
            full_name: full_name.to_string(),
            name,
            zone,
            value: value.into(),
            record_type,
            credentials: None,
        })
    }

    /// Build a request from an explicit subname and zone
    pub fn from_parts(
        name: impl Into<String>,
        zone: impl Into<String>,
        value: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        let name = name.into();
        let zone = zone.into();
        let full_name = if name.is_empty() {
            zone.clone()
        } else {
            format!("{name}.{zone}")
        };

        Self {
            full_name,
            name,
            zone,
            value: value.into(),
            record_type,
            credentials: None,
        }
    }

    /// Attach the caller's credentials
    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Subname relative to the zone, empty for the apex
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record name as the upstream APIs expect it (`@` for the apex)
    pub fn record_name(&self) -> &str {
        if self.name.is_empty() { "@" } else { &self.name }
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }
}
