//! Client address resolution behind optional reverse proxies
//!
//! The connection's peer address is authoritative unless the peer is a
//! configured trusted proxy, in which case the forwarding headers win.
//! Header values are passed through unvalidated.

use crate::{Error, Result};

/// Forwarding header values of one request
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardingHeaders<'a> {
    /// `X-Real-Ip`
    pub real_ip: Option<&'a str>,
    /// `X-Forwarded-For`
    pub forwarded_for: Option<&'a str>,
}

/// Resolves the effective client address of a request
#[derive(Debug, Clone, Default)]
pub struct ClientIpResolver {
    trusted_proxies: Vec<String>,
}

impl ClientIpResolver {
    /// Create a resolver trusting forwarding headers from the given peers
    pub fn new(trusted_proxies: Vec<String>) -> Self {
        Self { trusted_proxies }
    }

    /// Resolve the client address
    ///
    /// # Parameters
    ///
    /// - `remote_addr`: the peer address as `host:port` (`[v6]:port` for IPv6)
    /// - `headers`: forwarding headers sent with the request
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRemoteAddr`] when `remote_addr` is not a
    /// well-formed `host:port` pair.
    pub fn resolve(&self, remote_addr: &str, headers: ForwardingHeaders<'_>) -> Result<String> {
        let host = split_host(remote_addr)?;

        if !self.trusted_proxies.iter().any(|proxy| proxy == host) {
            return Ok(host.to_string());
        }

        if let Some(real_ip) = headers.real_ip.map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(real_ip.to_string());
        }

        let forwarded = headers
            .forwarded_for
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        Ok(forwarded.unwrap_or(host).to_string())
    }
}

/// Host part of a `host:port` pair
fn split_host(remote_addr: &str) -> Result<&str> {
    let invalid = || Error::InvalidRemoteAddr(remote_addr.to_string());

    let (host, port) = if let Some(rest) = remote_addr.strip_prefix('[') {
        let (host, after) = rest.split_once(']').ok_or_else(invalid)?;
        let port = after.strip_prefix(':').ok_or_else(invalid)?;
        (host, port)
    } else {
        let (host, port) = remote_addr.split_once(':').ok_or_else(invalid)?;
        if port.contains(':') {
            return Err(invalid());
        }
        (host, port)
    };

    if host.is_empty() || port.is_empty() || host.contains(['[', ']']) {
        return Err(invalid());
    }

    Ok(host)
}
