//! Test doubles and common utilities for orchestrator contract tests
//!
//! Both fake APIs record every call as a short string so tests can assert
//! the exact upstream sequence, and can be told to fail or stall a call.

#![allow(dead_code)]

use async_trait::async_trait;
use dnsapi_proxy_core::error::{Error, Result};
use dnsapi_proxy_core::traits::{
    Action, ActionError, ActionStatus, CloudDnsApi, CloudZone, LegacyDnsApi, RRSet, RRSetCreate,
    RRSetRecord, Record, Zone,
};
use dnsapi_proxy_core::{RecordType, UpdateRequest};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ZONE_NAME: &str = "test.tld";
pub const ZONE_ID: &str = "1";
pub const DEFAULT_TTL: u32 = 60;
pub const EXISTING_TTL: u32 = 300;

/// Tracks how many calls run at the same time
#[derive(Clone, Default)]
pub struct Concurrency {
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of simultaneously running calls seen
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Behaviour shared by both fakes
#[derive(Clone, Default)]
struct Knobs {
    calls: Arc<Mutex<Vec<String>>>,
    fail_on: Arc<Mutex<Option<&'static str>>>,
    delay: Arc<Mutex<Duration>>,
    concurrency: Concurrency,
}

impl Knobs {
    async fn call(&self, op: &'static str, entry: String) -> Result<()> {
        self.concurrency.enter();
        self.calls.lock().unwrap().push(entry);

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.concurrency.leave();

        if *self.fail_on.lock().unwrap() == Some(op) {
            return Err(Error::provider("fake", format!("{op} failed")));
        }
        Ok(())
    }
}

/// Call-recording fake of the legacy DNS record API
#[derive(Clone)]
pub struct FakeDnsApi {
    zones: Vec<Zone>,
    records: Arc<Mutex<Vec<Record>>>,
    knobs: Knobs,
}

impl FakeDnsApi {
    /// A fake serving `test.tld` (id `1`) with no records
    pub fn new() -> Self {
        Self {
            zones: vec![
                Zone {
                    id: "9".to_string(),
                    name: "other.tld".to_string(),
                },
                Zone {
                    id: ZONE_ID.to_string(),
                    name: ZONE_NAME.to_string(),
                },
            ],
            records: Arc::new(Mutex::new(Vec::new())),
            knobs: Knobs::default(),
        }
    }

    /// Seed an existing record
    pub fn with_record(self, id: &str, name: &str, record_type: &str, value: &str) -> Self {
        self.records.lock().unwrap().push(Record {
            id: Some(id.to_string()),
            name: name.to_string(),
            ttl: EXISTING_TTL,
            record_type: record_type.to_string(),
            value: value.to_string(),
            zone_id: ZONE_ID.to_string(),
        });
        self
    }

    pub fn failing_on(self, op: &'static str) -> Self {
        *self.knobs.fail_on.lock().unwrap() = Some(op);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.knobs.delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.knobs.calls.lock().unwrap().clone()
    }

    pub fn records(&self) -> Vec<Record> {
        self.records.lock().unwrap().clone()
    }

    pub fn concurrency(&self) -> Concurrency {
        self.knobs.concurrency.clone()
    }
}

#[async_trait]
impl LegacyDnsApi for FakeDnsApi {
    async fn zones(&self) -> Result<Vec<Zone>> {
        self.knobs.call("zones", "GET zones".to_string()).await?;
        Ok(self.zones.clone())
    }

    async fn records(&self, zone_id: &str) -> Result<Vec<Record>> {
        self.knobs
            .call("records", format!("GET records zone_id={zone_id}"))
            .await?;
        Ok(self.records())
    }

    async fn create_record(&self, record: &Record) -> Result<()> {
        self.knobs
            .call(
                "create_record",
                format!(
                    "POST record {} {} {} ttl={}",
                    record.name, record.record_type, record.value, record.ttl
                ),
            )
            .await?;
        let mut stored = record.clone();
        stored.id = Some(format!("new-{}", record.name));
        self.records.lock().unwrap().push(stored);
        Ok(())
    }

    async fn update_record(&self, record: &Record) -> Result<()> {
        let id = record.id.clone().unwrap_or_default();
        self.knobs
            .call(
                "update_record",
                format!(
                    "PUT record {id} {} {} {} ttl={}",
                    record.name, record.record_type, record.value, record.ttl
                ),
            )
            .await?;
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| r.id.as_deref() == Some(&id)) {
            *existing = record.clone();
        }
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "fake-dns"
    }
}

/// Call-recording fake of the Cloud API
#[derive(Clone)]
pub struct FakeCloudApi {
    zone: CloudZone,
    rrset: Arc<Mutex<Option<RRSet>>>,
    /// Status of actions returned by mutating calls
    initial_status: Arc<Mutex<ActionStatus>>,
    /// Statuses returned by successive `get_action` polls
    polls: Arc<Mutex<VecDeque<ActionStatus>>>,
    create_returns_action: bool,
    next_action: Arc<AtomicI64>,
    knobs: Knobs,
}

impl FakeCloudApi {
    /// A fake serving zone `test.tld` (id 1) with no record sets
    pub fn new() -> Self {
        Self {
            zone: CloudZone {
                id: 1,
                name: ZONE_NAME.to_string(),
            },
            rrset: Arc::new(Mutex::new(None)),
            initial_status: Arc::new(Mutex::new(ActionStatus::Success)),
            polls: Arc::new(Mutex::new(VecDeque::new())),
            create_returns_action: true,
            next_action: Arc::new(AtomicI64::new(1)),
            knobs: Knobs::default(),
        }
    }

    /// Seed an existing record set
    pub fn with_rrset(self, name: &str, record_type: RecordType, ttl: Option<u32>, values: &[&str]) -> Self {
        *self.rrset.lock().unwrap() = Some(RRSet {
            id: format!("{name}/{record_type}"),
            name: name.to_string(),
            record_type: record_type.to_string(),
            ttl,
            records: values.iter().map(|v| RRSetRecord::new(*v)).collect(),
            zone: 1,
        });
        self
    }

    /// Mutating calls return running actions that resolve via `polls`
    pub fn with_running_actions(self, polls: &[ActionStatus]) -> Self {
        *self.initial_status.lock().unwrap() = ActionStatus::Running;
        self.polls.lock().unwrap().extend(polls.iter().copied());
        self
    }

    pub fn with_failed_actions(self) -> Self {
        *self.initial_status.lock().unwrap() = ActionStatus::Error;
        self
    }

    pub fn without_create_action(mut self) -> Self {
        self.create_returns_action = false;
        self
    }

    pub fn failing_on(self, op: &'static str) -> Self {
        *self.knobs.fail_on.lock().unwrap() = Some(op);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.knobs.delay.lock().unwrap() = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.knobs.calls.lock().unwrap().clone()
    }

    pub fn rrset(&self) -> Option<RRSet> {
        self.rrset.lock().unwrap().clone()
    }

    pub fn concurrency(&self) -> Concurrency {
        self.knobs.concurrency.clone()
    }

    fn action(&self) -> Action {
        let status = *self.initial_status.lock().unwrap();
        Action {
            id: self.next_action.fetch_add(1, Ordering::SeqCst),
            status,
            error: (status == ActionStatus::Error).then(|| ActionError {
                code: "invalid_input".to_string(),
                message: "rejected".to_string(),
            }),
        }
    }
}

#[async_trait]
impl CloudDnsApi for FakeCloudApi {
    async fn get_zone(&self, name: &str) -> Result<CloudZone> {
        self.knobs.call("get_zone", format!("GET zone {name}")).await?;
        if name != self.zone.name {
            return Err(Error::not_found(format!("zone {name}")));
        }
        Ok(self.zone.clone())
    }

    async fn get_rrset(
        &self,
        zone: &CloudZone,
        name: &str,
        record_type: RecordType,
    ) -> Result<Option<RRSet>> {
        self.knobs
            .call("get_rrset", format!("GET rrset {}/{name}/{record_type}", zone.id))
            .await?;
        Ok(self
            .rrset()
            .filter(|rrset| rrset.name == name && rrset.record_type == record_type.as_str()))
    }

    async fn create_rrset(&self, zone: &CloudZone, rrset: &RRSetCreate) -> Result<Option<Action>> {
        let values: Vec<&str> = rrset.records.iter().map(|r| r.value.as_str()).collect();
        self.knobs
            .call(
                "create_rrset",
                format!(
                    "POST rrset {}/{}/{} ttl={} {:?}",
                    zone.id, rrset.name, rrset.record_type, rrset.ttl, values
                ),
            )
            .await?;
        *self.rrset.lock().unwrap() = Some(RRSet {
            id: format!("{}/{}", rrset.name, rrset.record_type),
            name: rrset.name.clone(),
            record_type: rrset.record_type.to_string(),
            ttl: Some(rrset.ttl),
            records: rrset.records.clone(),
            zone: zone.id,
        });
        Ok(self.create_returns_action.then(|| self.action()))
    }

    async fn change_rrset_ttl(&self, _zone: &CloudZone, rrset: &RRSet, ttl: u32) -> Result<Action> {
        self.knobs
            .call("change_ttl", format!("POST change_ttl {} ttl={ttl}", rrset.id))
            .await?;
        if let Some(stored) = self.rrset.lock().unwrap().as_mut() {
            stored.ttl = Some(ttl);
        }
        Ok(self.action())
    }

    async fn set_rrset_records(
        &self,
        _zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action> {
        let values: Vec<&str> = records.iter().map(|r| r.value.as_str()).collect();
        self.knobs
            .call("set_records", format!("POST set_records {} {:?}", rrset.id, values))
            .await?;
        if let Some(stored) = self.rrset.lock().unwrap().as_mut() {
            stored.records = records.to_vec();
        }
        Ok(self.action())
    }

    async fn remove_rrset_records(
        &self,
        _zone: &CloudZone,
        rrset: &RRSet,
        records: &[RRSetRecord],
    ) -> Result<Action> {
        let values: Vec<&str> = records.iter().map(|r| r.value.as_str()).collect();
        self.knobs
            .call("remove_records", format!("POST remove_records {} {:?}", rrset.id, values))
            .await?;
        if let Some(stored) = self.rrset.lock().unwrap().as_mut() {
            stored.records.retain(|r| !records.contains(r));
        }
        Ok(self.action())
    }

    async fn get_action(&self, id: i64) -> Result<Action> {
        self.knobs.call("get_action", format!("GET action {id}")).await?;
        let status = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ActionStatus::Success);
        Ok(Action {
            id,
            status,
            error: None,
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake-cloud"
    }
}

pub fn a_request() -> UpdateRequest {
    UpdateRequest::from_parts("asub", ZONE_NAME, "1.2.3.4", RecordType::A)
}

pub fn aaaa_request() -> UpdateRequest {
    UpdateRequest::from_parts("aaaasub", ZONE_NAME, "2001:db8::1", RecordType::Aaaa)
}

pub fn txt_request() -> UpdateRequest {
    UpdateRequest::from_parts(
        "_acme-challenge.txtsub",
        ZONE_NAME,
        "changedrandomvalue",
        RecordType::Txt,
    )
}
