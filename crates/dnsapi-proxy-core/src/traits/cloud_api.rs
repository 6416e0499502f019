//! Transport seam of the zone/record-set Cloud API
//!
//! Records live in record sets addressed by `(zone, name, type)`. Mutating
//! calls return an [`Action`] that may still be running when the response
//! arrives; the orchestrator polls it through [`CloudDnsApi::get_action`].

use crate::Result;
use crate::record::RecordType;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A zone of the Cloud API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudZone {
    pub id: i64,
    pub name: String,
}

/// One value of a record set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSetRecord {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl RRSetRecord {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: None,
        }
    }
}

/// A record set as stored upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RRSet {
    /// `name/type`
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    /// `None` means the zone default TTL applies
    #[serde(default)]
    pub ttl: Option<u32>,
    #[serde(default)]
    pub records: Vec<RRSetRecord>,
    #[serde(default)]
    pub zone: i64,
}

/// Body of a record-set creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RRSetCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub ttl: u32,
    pub records: Vec<RRSetRecord>,
}

/// Progress of an asynchronous upstream operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Running,
    Success,
    Error,
}

/// Failure details of an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionError {
    pub code: String,
    pub message: String,
}

/// Completion token of a mutating Cloud API call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub id: i64,
    pub status: ActionStatus,
    #[serde(default)]
    pub error: Option<ActionError>,
}

/// Calls of the zone/record-set Cloud API
///
/// Implementations perform exactly one HTTP request per call and never
/// retry. Non-2xx responses and transport failures are errors, except a
/// 404 from [`get_rrset`](CloudDnsApi::get_rrset), which means "absent".
#[async_trait]
pub trait CloudDnsApi: Send + Sync {
    /// Zone by name
    async fn get_zone(&self, name: &str) -> Result<CloudZone>;

    /// Record set by name and type, `None` if it does not exist
    async fn get_rrset(
        &self,
        zone: &CloudZone,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<RRSet>>;

    /// Create a record set; the returned action may be absent
    async fn create_rrset(&self, zone: &CloudZone, rrset: &RRSetCreate) -> Result<Option<Action>>;

    /// Change the TTL of a record set
    async fn change_rrset_ttl(&self, zone: &CloudZone, rrset: &RRSet, ttl: u32) -> Result<Action>;

    /// Replace all values of a record set
    async fn set_rrset_records(
        &self,
        zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action>;

    /// Remove the given values from a record set
    async fn remove_rrset_records(
        &self,
        zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action>;

    /// Current state of an action
    async fn get_action(&self, id: i64) -> Result<Action>;

    /// Provider name used in errors and logs
    fn provider_name(&self) -> &'static str;
}
