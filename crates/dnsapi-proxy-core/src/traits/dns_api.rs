//! Transport seam of the legacy flat DNS record API
//!
//! Zones are looked up by name and records are addressed by id. Each
//! record holds exactly one value.

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A zone of the legacy API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A single-value record of the legacy API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record id, absent for records not yet created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub ttl: u32,
    /// Record type as sent by the API (may be any DNS type)
    #[serde(rename = "type")]
    pub record_type: String,
    pub value: String,
    #[serde(default)]
    pub zone_id: String,
}

/// Calls of the legacy DNS record API
///
/// Implementations perform exactly one HTTP request per call and never
/// retry. Non-2xx responses and transport failures are errors.
#[async_trait]
pub trait LegacyDnsApi: Send + Sync {
    /// All zones visible to the token
    async fn zones(&self) -> Result<Vec<Zone>>;

    /// All records of a zone
    async fn records(&self, zone_id: &str) -> Result<Vec<Record>>;

    /// Create a record (`record.id` is `None`)
    async fn create_record(&self, record: &Record) -> Result<()>;

    /// Replace an existing record (`record.id` is set)
    async fn update_record(&self, record: &Record) -> Result<()>;

    /// Provider name used in errors and logs
    fn provider_name(&self) -> &'static str;
}
