//! Daemon settings from `CONFIG_FILE` or environment variables

use anyhow::{Context, Result};
use dnsapi_proxy_core::config::{parse_allowed_domains, parse_users};
use dnsapi_proxy_core::{AuthMethod, ProviderConfig, ProxyConfig};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::Level;

/// Everything the daemon needs before it starts serving
#[derive(Debug)]
pub(crate) struct Settings {
    pub proxy: ProxyConfig,
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through `lookup`
    ///
    /// `CONFIG_FILE`, when set, names a TOML file that replaces every
    /// other variable except `LOG_LEVEL`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let proxy = match lookup("CONFIG_FILE").filter(|path| !path.is_empty()) {
            Some(path) => load_file(&path)?,
            None => from_vars(&lookup)?,
        };

        let default_level = if proxy.debug { "debug" } else { "info" };
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| default_level.to_string());

        Ok(Self { proxy, log_level })
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        self.proxy.validate()?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => anyhow::bail!(
                "LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }

    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn load_file(path: &str) -> Result<ProxyConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read CONFIG_FILE {path}"))?;

    toml::from_str(&contents).with_context(|| format!("Failed to parse CONFIG_FILE {path}"))
}

fn from_vars(lookup: &impl Fn(&str) -> Option<String>) -> Result<ProxyConfig> {
    let api_token = lookup("API_TOKEN").filter(|token| !token.is_empty()).context(
        "API_TOKEN is required. \
        Set it via: export API_TOKEN=your_token",
    )?;
    let base_url = lookup("API_BASE_URL").filter(|url| !url.is_empty());

    let provider = if parse_var::<Flag>(lookup, "CLOUD_API")?.is_some_and(|Flag(on)| on) {
        ProviderConfig::Cloud { api_token, base_url }
    } else {
        ProviderConfig::Dns { api_token, base_url }
    };

    let mut config = ProxyConfig::new(provider);

    if let Some(timeout) = parse_var(lookup, "API_TIMEOUT")? {
        config.timeout_secs = timeout;
    }
    if let Some(ttl) = parse_var(lookup, "RECORD_TTL")? {
        config.record_ttl = ttl;
    }
    if let Some(interval) = parse_var(lookup, "ACTION_POLL_INTERVAL_MS")? {
        config.action_poll_interval_ms = interval;
    }
    if let Some(addr) = lookup("LISTEN_ADDR").filter(|addr| !addr.is_empty()) {
        config.listen_addr = addr;
    }
    if let Some(Flag(debug)) = parse_var(lookup, "DEBUG")? {
        config.debug = debug;
    }

    config.trusted_proxies = lookup("TRUSTED_PROXIES")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(method) = parse_var::<AuthMethod>(lookup, "AUTH_METHOD")? {
        config.auth.method = method;
    }
    if let Some(allowed) = lookup("ALLOWED_DOMAINS") {
        config.auth.allowed_domains =
            parse_allowed_domains(&allowed).context("ALLOWED_DOMAINS is not valid")?;
    }
    if let Some(users) = lookup("USERS") {
        config.auth.users = parse_users(&users).context("USERS is not valid")?;
    }

    Ok(config)
}

/// Parse an optional variable; empty counts as unset
fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    let Some(raw) = lookup(key).filter(|value| !value.trim().is_empty()) else {
        return Ok(None);
    };

    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| anyhow::anyhow!("{key} '{raw}' is not valid: {e}"))
}

/// Boolean switch accepting the usual spellings
struct Flag(bool);

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Self(true)),
            "0" | "false" | "no" | "off" => Ok(Self(false)),
            _ => Err("expected true or false".to_string()),
        }
    }
}
