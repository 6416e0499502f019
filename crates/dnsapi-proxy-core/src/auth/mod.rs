// # Authorization
//
// Decides which domains a caller may modify. Two grant tables feed the
// decision:
//
// - **allowed domains**: domain → list of networks; a caller whose address
//   falls inside any network of a domain is granted that domain
// - **users**: username/password → list of domains
//
// The configured [`AuthMethod`] merges both grant sets into the effective
// set, which is then tested against the requested full name.
//
// Grant tables are loaded once at startup and only read afterwards, so an
// `Authorizer` is shared between request tasks without locking.

mod cidr;

pub use cidr::Cidr;

use crate::fqdn::is_subdomain;
use crate::request::{Credentials, UpdateRequest};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

/// Domain → networks allowed to update it
pub type AllowedDomains = BTreeMap<String, Vec<Cidr>>;

/// How address grants and credential grants are combined
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Address grants only
    #[default]
    AllowedDomains,
    /// Credential grants only
    Users,
    /// Both must agree (see [`Authorizer::domains`])
    Both,
    /// Either grant is sufficient
    Any,
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allowed_domains" | "allowed-domains" | "allowed" => Ok(Self::AllowedDomains),
            "users" => Ok(Self::Users),
            "both" => Ok(Self::Both),
            "any" => Ok(Self::Any),
            other => Err(Error::config(format!(
                "auth method '{other}' is not valid. Valid methods: allowed_domains, users, both, any"
            ))),
        }
    }
}

/// One credential-keyed grant
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub domains: Vec<String>,
}

// Custom Debug implementation that hides the password
impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("domains", &self.domains)
            .finish()
    }
}

/// Resolves and checks the domains a caller is granted
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    method: AuthMethod,
    allowed_domains: AllowedDomains,
    users: Vec<User>,
}

impl Authorizer {
    pub fn new(method: AuthMethod, allowed_domains: AllowedDomains, users: Vec<User>) -> Self {
        Self {
            method,
            allowed_domains,
            users,
        }
    }

    pub fn method(&self) -> AuthMethod {
        self.method
    }

    /// Effective set of domains granted to the caller
    ///
    /// Never fails: an unparsable address or missing credentials simply
    /// contribute no grants. Leading `*.` wildcards are stripped from the
    /// result; a bare `*` is kept and covers every name.
    pub fn domains(&self, client_ip: &str, credentials: Option<&Credentials>) -> BTreeSet<String> {
        let ip_domains = self.ip_domains(client_ip);
        let user_domains = self.user_domains(credentials);

        let merged: BTreeSet<&str> = match self.method {
            AuthMethod::AllowedDomains => ip_domains,
            AuthMethod::Users => user_domains,
            AuthMethod::Any => ip_domains.union(&user_domains).copied().collect(),
            AuthMethod::Both => {
                let mut merged = BTreeSet::new();
                for ip_domain in &ip_domains {
                    if user_domains.contains(ip_domain) {
                        merged.insert(*ip_domain);
                        continue;
                    }
                    merged.extend(
                        user_domains
                            .iter()
                            .filter(|user_domain| is_subdomain(user_domain, ip_domain)),
                    );
                }
                merged
            }
        };

        merged.into_iter().map(strip_wildcard).collect()
    }

    /// Whether the granted set covers `full_name`
    pub fn permits(domains: &BTreeSet<String>, full_name: &str) -> bool {
        domains
            .iter()
            .any(|domain| domain == "*" || domain == full_name || is_subdomain(full_name, domain))
    }

    /// Gate an update request
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unauthorized`] when no granted domain covers the
    /// request's full name.
    pub fn authorize(&self, client_ip: &str, request: &UpdateRequest) -> Result<()> {
        let domains = self.domains(client_ip, request.credentials());

        if Self::permits(&domains, request.full_name()) {
            tracing::debug!(
                "Granted {} for {} via {:?}",
                request.full_name(),
                client_ip,
                self.method
            );
            return Ok(());
        }

        tracing::warn!(
            client_ip = %client_ip,
            user = request.credentials().map(|c| c.username.as_str()).unwrap_or(""),
            "Rejected update of {}: not in granted domains",
            request.full_name()
        );
        Err(Error::Unauthorized)
    }

    fn ip_domains(&self, client_ip: &str) -> BTreeSet<&str> {
        let Ok(ip) = client_ip.parse::<IpAddr>() else {
            return BTreeSet::new();
        };

        self.allowed_domains
            .iter()
            .filter(|(_, networks)| networks.iter().any(|net| net.contains(ip)))
            .map(|(domain, _)| domain.as_str())
            .collect()
    }

    fn user_domains(&self, credentials: Option<&Credentials>) -> BTreeSet<&str> {
        let Some(credentials) = credentials else {
            return BTreeSet::new();
        };

        self.users
            .iter()
            .find(|user| {
                user.username == credentials.username && user.password == credentials.password
            })
            .map(|user| user.domains.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

fn strip_wildcard(domain: &str) -> String {
    domain.strip_prefix("*.").unwrap_or(domain).to_string()
}
