// # DNS Backend Trait
//
// The capability every upstream model offers to the HTTP layer: set a
// record to a value, or clean it again.
//
// ## Implementations
//
// - `LegacyBackend`: flat record API (`crate::backend::legacy`)
// - `CloudBackend`: zone/record-set API with actions (`crate::backend::cloud`)
//
// ## Usage
//
// ```rust,ignore
// use dnsapi_proxy_core::{DnsBackend, RecordType, UpdateRequest};
//
// async fn set(backend: &dyn DnsBackend) -> dnsapi_proxy_core::Result<()> {
//     let request = UpdateRequest::from_fqdn("home.example.com", "192.0.2.7", RecordType::A)?;
//     backend.update(&request).await
// }
// ```

use crate::Result;
use crate::request::UpdateRequest;
use async_trait::async_trait;

/// Reconciles records against one upstream provider
///
/// # Thread Safety
///
/// One instance serves every request task. Implementations serialize their
/// own update and clean sequences; callers do not lock.
///
/// # Failure
///
/// The first failing provider call aborts the sequence and its error is
/// returned unchanged. Nothing is retried and nothing is rolled back.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    /// Make the record named by `request` hold exactly `request.value()`
    async fn update(&self, request: &UpdateRequest) -> Result<()>;

    /// Remove the values of the record named by `request`
    async fn clean(&self, request: &UpdateRequest) -> Result<()>;

    /// Backend name used in logs
    fn backend_name(&self) -> &'static str;
}
