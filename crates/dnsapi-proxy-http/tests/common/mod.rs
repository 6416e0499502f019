//! Shared harness for HTTP contract tests
//!
//! Spawns the proxy on an ephemeral port, backed by the real provider
//! clients talking to a wiremock upstream.

#![allow(dead_code)]

use dnsapi_proxy_core::auth::AllowedDomains;
use dnsapi_proxy_core::{
    AuthMethod, Authorizer, Cidr, ClientIpResolver, CloudBackend, DnsBackend, LegacyBackend, User,
};
use dnsapi_proxy_http::AppState;
use dnsapi_proxy_provider_cloud::CloudApiClient;
use dnsapi_proxy_provider_dns::DnsApiClient;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "this-is-my-token";
pub const USERNAME: &str = "proxyuser";
pub const PASSWORD: &str = "proxypass";

pub const ZONE_NAME: &str = "test.tld";
pub const ZONE_ID: &str = "1";
pub const DEFAULT_TTL: u32 = 60;

pub const A_NAME: &str = "asub";
pub const A_FULL: &str = "asub.test.tld";
pub const A_EXISTING: &str = "127.0.0.1";
pub const A_UPDATED: &str = "1.2.3.4";
pub const AAAA_NAME: &str = "aaaasub";
pub const AAAA_FULL: &str = "aaaasub.test.tld";
pub const AAAA_EXISTING: &str = "::1";
pub const AAAA_UPDATED: &str = "2001:db8::1";
pub const TXT_NO_PREFIX: &str = "txtsub.test.tld";
pub const TXT_NAME: &str = "_acme-challenge.txtsub";
pub const TXT_FULL: &str = "_acme-challenge.txtsub.test.tld";
pub const TXT_EXISTING: &str = "randomvalue";
pub const TXT_UPDATED: &str = "changedrandomvalue";

/// Which upstream model backs the proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Dns,
    Cloud,
}

pub const UPSTREAMS: [Upstream; 2] = [Upstream::Dns, Upstream::Cloud];

/// A running proxy plus its mocked upstream
pub struct Harness {
    pub upstream: Upstream,
    pub api: MockServer,
    pub url: String,
    pub client: reqwest::Client,
}

impl Harness {
    /// Proxy granting `*` to 127.0.0.1 and to the test user, policy `both`
    pub async fn start(upstream: Upstream) -> Self {
        let mut allowed = AllowedDomains::new();
        allowed.insert("*".to_string(), vec!["127.0.0.1/32".parse::<Cidr>().unwrap()]);
        let users = vec![User {
            username: USERNAME.to_string(),
            password: PASSWORD.to_string(),
            domains: vec!["*".to_string()],
        }];

        Self::with_authorizer(upstream, Authorizer::new(AuthMethod::Both, allowed, users)).await
    }

    /// Proxy that grants nothing to anybody
    pub async fn without_grants(upstream: Upstream) -> Self {
        Self::with_authorizer(upstream, Authorizer::default()).await
    }

    pub async fn with_authorizer(upstream: Upstream, authorizer: Authorizer) -> Self {
        Self::build(upstream, authorizer, ClientIpResolver::default()).await
    }

    /// Proxy that trusts forwarding headers sent from 127.0.0.1
    pub async fn behind_proxy(upstream: Upstream, authorizer: Authorizer) -> Self {
        let resolver = ClientIpResolver::new(vec!["127.0.0.1".to_string()]);
        Self::build(upstream, authorizer, resolver).await
    }

    async fn build(upstream: Upstream, authorizer: Authorizer, client_ip: ClientIpResolver) -> Self {
        let api = MockServer::start().await;
        let base_url = format!("{}/v1", api.uri());

        let backend: Arc<dyn DnsBackend> = match upstream {
            Upstream::Dns => Arc::new(LegacyBackend::new(
                DnsApiClient::new(base_url, TOKEN, Duration::from_secs(5)).unwrap(),
                DEFAULT_TTL,
            )),
            Upstream::Cloud => Arc::new(CloudBackend::new(
                CloudApiClient::new(base_url, TOKEN, Duration::from_secs(5)).unwrap(),
                DEFAULT_TTL,
                Duration::from_millis(10),
            )),
        };

        let state = AppState::new(backend, authorizer, client_ip, Duration::from_secs(5));
        let url = spawn(state).await;

        Self {
            upstream,
            api,
            url,
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.url, route)
    }

    /// Number of requests the upstream received
    pub async fn upstream_calls(&self) -> usize {
        self.api
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    /// Mount the upstream exchange that creates a record
    pub async fn expect_create(&self, name: &str, record_type: &str, value: &str) {
        match self.upstream {
            Upstream::Dns => {
                mount_zones(&self.api).await;
                mount_records(&self.api, json!([])).await;
                Mock::given(method("POST"))
                    .and(path("/v1/records"))
                    .and(wiremock::matchers::body_json(json!({
                        "name": name,
                        "ttl": DEFAULT_TTL,
                        "type": record_type,
                        "value": value,
                        "zone_id": ZONE_ID
                    })))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "record": {} })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
            }
            Upstream::Cloud => {
                mount_cloud_zone(&self.api).await;
                Mock::given(method("GET"))
                    .and(path(format!("/v1/zones/{ZONE_ID}/rrsets/{name}/{record_type}")))
                    .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                        "error": { "code": "not_found", "message": "rrset not found" }
                    })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
                Mock::given(method("POST"))
                    .and(path(format!("/v1/zones/{ZONE_ID}/rrsets")))
                    .and(wiremock::matchers::body_json(json!({
                        "name": name,
                        "type": record_type,
                        "ttl": DEFAULT_TTL,
                        "records": [{ "value": cloud_value(record_type, value) }]
                    })))
                    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                        "rrset": rrset(name, record_type, Some(DEFAULT_TTL), value),
                        "action": success_action()
                    })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
            }
        }
    }

    /// Mount the upstream exchange that updates an existing record
    ///
    /// The existing cloud record set carries a TTL of 300, so the update
    /// also changes the TTL.
    pub async fn expect_update(&self, name: &str, record_type: &str, existing: &str, value: &str) {
        match self.upstream {
            Upstream::Dns => {
                let id = record_id(record_type);
                mount_zones(&self.api).await;
                mount_records(&self.api, json!([
                    {
                        "id": id,
                        "name": name,
                        "ttl": 300,
                        "type": record_type,
                        "value": existing,
                        "zone_id": ZONE_ID
                    }
                ]))
                .await;
                Mock::given(method("PUT"))
                    .and(path(format!("/v1/records/{id}")))
                    .and(wiremock::matchers::body_json(json!({
                        "id": id,
                        "name": name,
                        "ttl": DEFAULT_TTL,
                        "type": record_type,
                        "value": value,
                        "zone_id": ZONE_ID
                    })))
                    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "record": {} })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
            }
            Upstream::Cloud => {
                mount_cloud_zone(&self.api).await;
                mount_cloud_rrset(&self.api, name, record_type, existing).await;
                let base = format!("/v1/zones/{ZONE_ID}/rrsets/{name}/{record_type}/actions");
                Mock::given(method("POST"))
                    .and(path(format!("{base}/change_ttl")))
                    .and(wiremock::matchers::body_json(json!({ "ttl": DEFAULT_TTL })))
                    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                        "action": success_action()
                    })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
                Mock::given(method("POST"))
                    .and(path(format!("{base}/set_records")))
                    .and(wiremock::matchers::body_json(json!({
                        "records": [{ "value": cloud_value(record_type, value) }]
                    })))
                    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                        "action": success_action()
                    })))
                    .expect(1)
                    .mount(&self.api)
                    .await;
            }
        }
    }

    /// Mount the cloud exchange that removes an existing TXT record set
    pub async fn expect_cloud_clean(&self, name: &str, existing: &str) {
        mount_cloud_zone(&self.api).await;
        mount_cloud_rrset(&self.api, name, "TXT", existing).await;
        Mock::given(method("POST"))
            .and(path(format!(
                "/v1/zones/{ZONE_ID}/rrsets/{name}/TXT/actions/remove_records"
            )))
            .and(wiremock::matchers::body_json(json!({
                "records": [{ "value": cloud_value("TXT", existing) }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "action": success_action()
            })))
            .expect(1)
            .mount(&self.api)
            .await;
    }

    /// Upstream calls of a create: zone, lookup, write
    pub fn create_calls(&self) -> usize {
        3
    }

    /// Upstream calls of an update with TTL change
    pub fn update_calls(&self) -> usize {
        match self.upstream {
            Upstream::Dns => 3,
            Upstream::Cloud => 4,
        }
    }
}

/// Serve `state` on an ephemeral localhost port, returning the base URL
pub async fn spawn(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        dnsapi_proxy_http::serve(listener, state, std::future::pending())
            .await
            .unwrap();
    });

    format!("http://{addr}")
}

fn record_id(record_type: &str) -> &'static str {
    match record_type {
        "A" => "1",
        "AAAA" => "2",
        _ => "3",
    }
}

fn cloud_value(record_type: &str, value: &str) -> String {
    if record_type == "TXT" {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

fn rrset(name: &str, record_type: &str, ttl: Option<u32>, value: &str) -> Value {
    json!({
        "id": format!("{name}/{record_type}"),
        "name": name,
        "type": record_type,
        "ttl": ttl,
        "records": [{ "value": cloud_value(record_type, value) }],
        "zone": 1
    })
}

fn success_action() -> Value {
    json!({ "id": 1, "status": "success", "command": "set_records", "error": null })
}

async fn mount_zones(api: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zones": [
                { "id": "9", "name": "other.tld" },
                { "id": ZONE_ID, "name": ZONE_NAME }
            ]
        })))
        .expect(1)
        .mount(api)
        .await;
}

async fn mount_records(api: &MockServer, records: Value) {
    Mock::given(method("GET"))
        .and(path("/v1/records"))
        .and(query_param("zone_id", ZONE_ID))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "records": records })))
        .expect(1)
        .mount(api)
        .await;
}

async fn mount_cloud_zone(api: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/zones/{ZONE_NAME}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "zone": { "id": 1, "name": ZONE_NAME }
        })))
        .expect(1)
        .mount(api)
        .await;
}

async fn mount_cloud_rrset(api: &MockServer, name: &str, record_type: &str, existing: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v1/zones/{ZONE_ID}/rrsets/{name}/{record_type}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rrset": rrset(name, record_type, Some(300), existing)
        })))
        .expect(1)
        .mount(api)
        .await;
}
