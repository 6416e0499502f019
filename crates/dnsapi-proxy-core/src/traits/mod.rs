//! Core traits for the DNS API proxy
//!
//! - [`DnsBackend`]: update/clean capability selected once at startup
//! - [`LegacyDnsApi`]: transport seam of the flat record API
//! - [`CloudDnsApi`]: transport seam of the zone/record-set API

pub mod backend;
pub mod cloud_api;
pub mod dns_api;

pub use backend::DnsBackend;
pub use cloud_api::{
    Action, ActionError, ActionStatus, CloudDnsApi, CloudZone, RRSet, RRSetCreate, RRSetRecord,
};
pub use dns_api::{LegacyDnsApi, Record, Zone};
