//! Configuration types for the DNS API proxy
//!
//! The daemon fills a [`ProxyConfig`] either from environment variables or
//! from a TOML file; both paths end in [`ProxyConfig::validate`].

use crate::auth::{AllowedDomains, AuthMethod, Cidr, User};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default TTL for records written upstream
pub const DEFAULT_RECORD_TTL: u32 = 60;

/// Default deadline for one provider exchange, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Default listen address
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8081";

/// Default interval between polls of a running cloud action
pub const DEFAULT_ACTION_POLL_INTERVAL_MS: u64 = 500;

/// Default base URL of the legacy DNS record API
pub const DEFAULT_DNS_API_BASE: &str = "https://dns.hetzner.com/api/v1";

/// Default base URL of the Cloud API
pub const DEFAULT_CLOUD_API_BASE: &str = "https://api.hetzner.cloud/v1";

/// Main proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Upstream provider
    pub provider: ProviderConfig,

    /// TTL written to created or updated records
    #[serde(default = "default_record_ttl")]
    pub record_ttl: u32,

    /// Deadline for one provider exchange, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Address the HTTP listener binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Peers whose forwarding headers are trusted
    #[serde(default)]
    pub trusted_proxies: Vec<String>,

    /// Grant tables and combination policy
    #[serde(default)]
    pub auth: AuthConfig,

    /// Poll interval for running cloud actions, in milliseconds
    #[serde(default = "default_action_poll_interval_ms")]
    pub action_poll_interval_ms: u64,

    /// Log request headers of every exchange
    #[serde(default)]
    pub debug: bool,
}

impl ProxyConfig {
    /// Create a configuration with defaults for the given provider
    pub fn new(provider: ProviderConfig) -> Self {
        Self {
            provider,
            record_ttl: DEFAULT_RECORD_TTL,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            trusted_proxies: Vec::new(),
            auth: AuthConfig::default(),
            action_poll_interval_ms: DEFAULT_ACTION_POLL_INTERVAL_MS,
            debug: false,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.provider.validate()?;

        if self.record_ttl == 0 {
            return Err(Error::config("record TTL must be greater than 0"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("API timeout must be greater than 0"));
        }
        if self.action_poll_interval_ms == 0 {
            return Err(Error::config("action poll interval must be greater than 0"));
        }
        if self.listen_addr.trim().is_empty() {
            return Err(Error::config("listen address cannot be empty"));
        }

        for user in &self.auth.users {
            if user.username.is_empty() {
                return Err(Error::config("user entries need a username"));
            }
        }

        Ok(())
    }

    /// Deadline for one provider exchange
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn action_poll_interval(&self) -> Duration {
        Duration::from_millis(self.action_poll_interval_ms)
    }
}

fn default_record_ttl() -> u32 {
    DEFAULT_RECORD_TTL
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

fn default_action_poll_interval_ms() -> u64 {
    DEFAULT_ACTION_POLL_INTERVAL_MS
}

/// Upstream provider configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// Legacy flat DNS record API
    Dns {
        /// API token
        api_token: String,
        /// Base URL override
        #[serde(default)]
        base_url: Option<String>,
    },

    /// Zone/record-set Cloud API
    Cloud {
        /// API token
        api_token: String,
        /// Base URL override
        #[serde(default)]
        base_url: Option<String>,
    },
}

impl ProviderConfig {
    /// Validate the provider configuration
    pub fn validate(&self) -> Result<()> {
        let (Self::Dns { api_token, base_url } | Self::Cloud { api_token, base_url }) = self;

        if api_token.trim().is_empty() {
            return Err(Error::config(format!("{} API token is required", self.name())));
        }

        if let Some(url) = base_url
            && !url.starts_with("https://")
            && !url.starts_with("http://")
        {
            return Err(Error::config(format!(
                "API base URL must use HTTP or HTTPS scheme. Got: {url}"
            )));
        }

        Ok(())
    }

    /// Provider name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dns { .. } => "dns",
            Self::Cloud { .. } => "cloud",
        }
    }

    /// Base URL, falling back to the provider's public endpoint
    pub fn base_url(&self) -> &str {
        match self {
            Self::Dns { base_url, .. } => base_url.as_deref().unwrap_or(DEFAULT_DNS_API_BASE),
            Self::Cloud { base_url, .. } => base_url.as_deref().unwrap_or(DEFAULT_CLOUD_API_BASE),
        }
    }

    pub fn api_token(&self) -> &str {
        match self {
            Self::Dns { api_token, .. } | Self::Cloud { api_token, .. } => api_token,
        }
    }
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("type", &self.name())
            .field("api_token", &"<REDACTED>")
            .field("base_url", &self.base_url())
            .finish()
    }
}

/// Grant tables and combination policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub method: AuthMethod,

    /// Domain → networks allowed to update it
    #[serde(default)]
    pub allowed_domains: AllowedDomains,

    /// Credential grants, matched in order
    #[serde(default)]
    pub users: Vec<User>,
}

/// Parse an address grant table
///
/// Format: `domain,cidr[,cidr...]` entries separated by `;`, e.g.
/// `example.com,127.0.0.1/32,::1;other.org,10.0.0.0/8`. Repeated domains
/// accumulate their networks.
pub fn parse_allowed_domains(input: &str) -> Result<AllowedDomains> {
    let mut allowed = AllowedDomains::new();

    for entry in input.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.split(',').map(str::trim);
        let domain = parts.next().unwrap_or_default();
        if domain.is_empty() {
            return Err(Error::config(format!("allowed domain entry without domain: '{entry}'")));
        }

        let networks = parts
            .filter(|p| !p.is_empty())
            .map(str::parse::<Cidr>)
            .collect::<Result<Vec<_>>>()?;
        if networks.is_empty() {
            return Err(Error::config(format!(
                "allowed domain '{domain}' needs at least one network"
            )));
        }

        allowed.entry(domain.to_string()).or_default().extend(networks);
    }

    Ok(allowed)
}

/// Parse a credential grant table
///
/// Format: `username:password:domain[,domain...]` entries separated by
/// `;`, e.g. `alice:secret:example.com,*.example.org`.
pub fn parse_users(input: &str) -> Result<Vec<User>> {
    input
        .split(';')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|entry| {
            let mut parts = entry.splitn(3, ':');
            let (Some(username), Some(password), Some(domains)) =
                (parts.next(), parts.next(), parts.next())
            else {
                let username = entry.split(':').next().unwrap_or_default();
                return Err(Error::config(format!(
                    "user entry for '{username}' must look like username:password:domains"
                )));
            };

            Ok(User {
                username: username.to_string(),
                password: password.to_string(),
                domains: domains
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(str::to_string)
                    .collect(),
            })
        })
        .collect()
}
