// # dnsapi-proxy-core
//
// Core library of the DNS API proxy.
//
// ## Architecture Overview
//
// A request flows through four stages:
//
// - **adapters**: turn one client wire format (plain, ACME-DNS, httpreq,
//   DirectAdmin) into a canonical `UpdateRequest`
// - **fqdn**: split full names into subname and registrable zone
// - **auth**: resolve the caller's granted domains and gate the request
// - **backend**: reconcile the record against the upstream provider,
//   one serialized sequence at a time
//
// The upstream HTTP clients live in provider crates and plug in through
// `LegacyDnsApi` / `CloudDnsApi`. The HTTP layer only sees `DnsBackend`.

pub mod adapters;
pub mod auth;
pub mod backend;
pub mod client_ip;
pub mod config;
pub mod error;
pub mod fqdn;
pub mod record;
pub mod request;
pub mod traits;

// Re-export core types for convenience
pub use auth::{AuthMethod, Authorizer, Cidr, User};
pub use backend::{CloudBackend, LegacyBackend, run_with_deadline};
pub use client_ip::{ClientIpResolver, ForwardingHeaders};
pub use config::{AuthConfig, ProviderConfig, ProxyConfig};
pub use error::{Error, ErrorKind, Result};
pub use record::RecordType;
pub use request::{Credentials, UpdateRequest};
pub use traits::{CloudDnsApi, DnsBackend, LegacyDnsApi};
