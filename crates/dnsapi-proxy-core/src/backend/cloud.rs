//! Orchestrator for the zone/record-set Cloud API
//!
//! Update sequence (under the backend lock):
//!
//! 1. resolve the zone by name
//! 2. look up the record set by name and type
//! 3. absent: create it with the configured TTL and the single value
//! 4. present: change its TTL if it differs, then replace its values
//!
//! Clean resolves the record set the same way and removes all of its
//! current values. Every returned action is awaited before the next step.

use crate::record::{RecordType, quote_txt};
use crate::request::UpdateRequest;
use crate::traits::{
    Action, ActionStatus, CloudDnsApi, CloudZone, DnsBackend, RRSet, RRSetCreate, RRSetRecord,
};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::Mutex;

/// Update/clean orchestrator over a [`CloudDnsApi`]
pub struct CloudBackend<A> {
    api: A,
    record_ttl: u32,
    poll_interval: Duration,
    lock: Mutex<()>,
}

impl<A: CloudDnsApi> CloudBackend<A> {
    pub fn new(api: A, record_ttl: u32, poll_interval: Duration) -> Self {
        Self {
            api,
            record_ttl,
            poll_interval,
            lock: Mutex::new(()),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    async fn lookup(&self, request: &UpdateRequest) -> Result<(CloudZone, Option<RRSet>)> {
        let zone = self.api.get_zone(request.zone()).await?;
        let rrset = self
            .api
            .get_rrset(&zone, request.record_name(), request.record_type())
            .await?;
        Ok((zone, rrset))
    }

    async fn create(&self, zone: &CloudZone, request: &UpdateRequest) -> Result<()> {
        tracing::info!(
            "Creating {} record set {} in zone {}",
            request.record_type(),
            request.full_name(),
            zone.name
        );

        let body = RRSetCreate {
            name: request.record_name().to_string(),
            record_type: request.record_type(),
            ttl: self.record_ttl,
            records: vec![upstream_value(request)],
        };

        match self.api.create_rrset(zone, &body).await? {
            Some(action) => self.wait(action).await,
            None => Ok(()),
        }
    }

    async fn replace(&self, zone: &CloudZone, rrset: &RRSet, request: &UpdateRequest) -> Result<()> {
        if rrset.ttl != Some(self.record_ttl) {
            tracing::debug!(
                "Changing TTL of {} from {:?} to {}",
                rrset.id,
                rrset.ttl,
                self.record_ttl
            );
            let action = self.api.change_rrset_ttl(zone, rrset, self.record_ttl).await?;
            self.wait(action).await?;
        }

        tracing::info!(
            "Setting {} record set {} in zone {}",
            request.record_type(),
            request.full_name(),
            zone.name
        );
        let action = self
            .api
            .set_rrset_records(zone, rrset, &[upstream_value(request)])
            .await?;
        self.wait(action).await
    }

    /// Poll an action until it leaves the running state
    async fn wait(&self, mut action: Action) -> Result<()> {
        loop {
            match action.status {
                ActionStatus::Success => return Ok(()),
                ActionStatus::Error => {
                    let detail = action
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| "unknown error".to_string());
                    return Err(Error::provider(
                        self.api.provider_name(),
                        format!("action {} failed: {}", action.id, detail),
                    ));
                }
                ActionStatus::Running => {
                    tracing::trace!("Action {} still running", action.id);
                    tokio::time::sleep(self.poll_interval).await;
                    action = self.api.get_action(action.id).await?;
                }
            }
        }
    }
}

/// The value as the Cloud API stores it
fn upstream_value(request: &UpdateRequest) -> RRSetRecord {
    match request.record_type() {
        RecordType::Txt => RRSetRecord::new(quote_txt(request.value())),
        RecordType::A | RecordType::Aaaa => RRSetRecord::new(request.value()),
    }
}

#[async_trait]
impl<A: CloudDnsApi> DnsBackend for CloudBackend<A> {
    async fn update(&self, request: &UpdateRequest) -> Result<()> {
        let _guard = self.lock.lock().await;

        match self.lookup(request).await? {
            (zone, Some(rrset)) => self.replace(&zone, &rrset, request).await,
            (zone, None) => self.create(&zone, request).await,
        }
    }

    async fn clean(&self, request: &UpdateRequest) -> Result<()> {
        let _guard = self.lock.lock().await;

        let (zone, rrset) = self.lookup(request).await?;
        let Some(rrset) = rrset.filter(|rrset| !rrset.records.is_empty()) else {
            tracing::debug!("Nothing to clean for {}", request.full_name());
            return Ok(());
        };

        tracing::info!(
            "Removing {} value(s) from {} record set {}",
            rrset.records.len(),
            request.record_type(),
            request.full_name()
        );
        let action = self
            .api
            .remove_rrset_records(&zone, &rrset, &rrset.records)
            .await?;
        self.wait(action).await
    }

    fn backend_name(&self) -> &'static str {
        self.api.provider_name()
    }
}
