//! Orchestrator for the legacy flat DNS record API
//!
//! Update sequence (under the backend lock):
//!
//! 1. list zones, pick the one named like the request zone
//! 2. list the zone's records, find one with the same name and type
//! 3. replace it by id, or create a new one
//!
//! The legacy API keeps challenge records until they are overwritten, so
//! clean is accepted without touching upstream.

use crate::request::UpdateRequest;
use crate::traits::{DnsBackend, LegacyDnsApi, Record};
use crate::{Error, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Update/clean orchestrator over a [`LegacyDnsApi`]
pub struct LegacyBackend<A> {
    api: A,
    record_ttl: u32,
    lock: Mutex<()>,
}

impl<A: LegacyDnsApi> LegacyBackend<A> {
    pub fn new(api: A, record_ttl: u32) -> Self {
        Self {
            api,
            record_ttl,
            lock: Mutex::new(()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    async fn zone_id(&self, request: &UpdateRequest) -> Result<String> {
        self.api
            .zones()
            .await?
            .into_iter()
            .find(|zone| zone.name == request.zone())
            .map(|zone| zone.id)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "could not find zone id for record {}",
                    request.full_name()
                ))
            })
    }
}

#[async_trait]
impl<A: LegacyDnsApi> DnsBackend for LegacyBackend<A> {
    async fn update(&self, request: &UpdateRequest) -> Result<()> {
        let _guard = self.lock.lock().await;

        let zone_id = self.zone_id(request).await?;
        let record_type = request.record_type().as_str();

        let existing = self
            .api
            .records(&zone_id)
            .await?
            .into_iter()
            .find(|record| record.record_type == record_type && record.name == request.record_name());

        let mut record = Record {
            id: None,
            name: request.record_name().to_string(),
            ttl: self.record_ttl,
            record_type: record_type.to_string(),
            value: request.value().to_string(),
            zone_id,
        };

        match existing.and_then(|existing| existing.id) {
            Some(id) => {
                tracing::info!(
                    "Updating {} record {} in zone {}",
                    record_type,
                    request.full_name(),
                    record.zone_id
                );
                record.id = Some(id);
                self.api.update_record(&record).await
            }
            None => {
                tracing::info!(
                    "Creating {} record {} in zone {}",
                    record_type,
                    request.full_name(),
                    record.zone_id
                );
                self.api.create_record(&record).await
            }
        }
    }

    async fn clean(&self, request: &UpdateRequest) -> Result<()> {
        tracing::debug!(
            "Clean of {} accepted, legacy API records are left in place",
            request.full_name()
        );
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        self.api.provider_name()
    }
}
