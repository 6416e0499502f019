// # dnsapi-proxyd - DNS API Proxy Daemon
//
// This daemon is a THIN integration layer:
// 1. Reading configuration from `CONFIG_FILE` or environment variables
// 2. Initializing logging and the runtime
// 3. Building the upstream backend
// 4. Serving the HTTP routes until SIGTERM/SIGINT
//
// Protocol parsing, authorization and upstream sequencing live in
// dnsapi-proxy-core and dnsapi-proxy-http.
//
// ## Configuration
//
// ### Upstream
// - `API_TOKEN`: upstream API token (required)
// - `CLOUD_API`: `true` selects the zone/record-set Cloud API
// - `API_BASE_URL`: override of the upstream base URL
// - `API_TIMEOUT`: deadline of one upstream sequence in seconds (default 15)
// - `RECORD_TTL`: TTL of written records (default 60)
// - `ACTION_POLL_INTERVAL_MS`: poll interval of running cloud actions
//
// ### Authorization
// - `AUTH_METHOD`: `allowed_domains`, `users`, `both` or `any`
// - `ALLOWED_DOMAINS`: `domain,cidr[,cidr];...`
// - `USERS`: `username:password:domain[,domain];...`
// - `TRUSTED_PROXIES`: comma-separated peers whose forwarding headers count
//
// ### Server
// - `LISTEN_ADDR`: listen address (default `0.0.0.0:8081`)
// - `DEBUG`: log request headers
// - `LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export API_TOKEN=your_token
// export ALLOWED_DOMAINS='example.com,192.168.0.0/24'
//
// dnsapi-proxyd
// ```

mod config;

use anyhow::{Context, Result};
use config::Settings;
use dnsapi_proxy_core::{DnsBackend, ProxyConfig};
use dnsapi_proxy_http::AppState;
use std::future::Future;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum ProxyExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<ProxyExitCode> for ExitCode {
    fn from(code: ProxyExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ProxyExitCode::ConfigError.into();
        }
    };

    if let Err(e) = settings.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ProxyExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(settings.level())
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ProxyExitCode::ConfigError.into();
    }

    info!("Starting dnsapi-proxyd {}", env!("CARGO_PKG_VERSION"));
    info!(
        provider = settings.proxy.provider.name(),
        auth_method = ?settings.proxy.auth.method,
        "Configuration loaded: {} allowed domain(s), {} user(s)",
        settings.proxy.auth.allowed_domains.len(),
        settings.proxy.auth.users.len()
    );

    let backend = match build_backend(&settings.proxy) {
        Ok(backend) => backend,
        Err(e) => {
            error!("Failed to create backend: {:#}", e);
            return ProxyExitCode::ConfigError.into();
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ProxyExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(settings.proxy, backend).await {
            error!("Daemon error: {:#}", e);
            ProxyExitCode::RuntimeError
        } else {
            ProxyExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Build the orchestrator for the configured upstream
fn build_backend(config: &ProxyConfig) -> Result<Arc<dyn DnsBackend>> {
    let provider = &config.provider;

    match provider {
        #[cfg(feature = "dns")]
        dnsapi_proxy_core::ProviderConfig::Dns { .. } => {
            let client = dnsapi_proxy_provider_dns::DnsApiClient::new(
                provider.base_url(),
                provider.api_token(),
                config.timeout(),
            )?;
            Ok(Arc::new(dnsapi_proxy_core::LegacyBackend::new(
                client,
                config.record_ttl,
            )))
        }

        #[cfg(feature = "cloud")]
        dnsapi_proxy_core::ProviderConfig::Cloud { .. } => {
            let client = dnsapi_proxy_provider_cloud::CloudApiClient::new(
                provider.base_url(),
                provider.api_token(),
                config.timeout(),
            )?;
            Ok(Arc::new(dnsapi_proxy_core::CloudBackend::new(
                client,
                config.record_ttl,
                config.action_poll_interval(),
            )))
        }

        #[allow(unreachable_patterns)]
        other => anyhow::bail!(
            "provider '{}' is not compiled in. Rebuild with --features {}",
            other.name(),
            other.name()
        ),
    }
}

/// Serve until a shutdown signal arrives
async fn run_daemon(config: ProxyConfig, backend: Arc<dyn DnsBackend>) -> Result<()> {
    let shutdown = shutdown_signal()?;

    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    let local_addr = listener.local_addr().context("Failed to read listen address")?;

    info!(
        listener = %local_addr,
        backend = backend.backend_name(),
        "Listening for update requests"
    );

    let state = AppState::from_config(backend, &config);
    dnsapi_proxy_http::serve(listener, state, shutdown)
        .await
        .context("HTTP server failed")?;

    info!("Shutting down daemon");
    Ok(())
}

/// Future resolving on SIGTERM or SIGINT
///
/// Handlers are installed eagerly so that setup failures surface before
/// the listener starts.
#[cfg(unix)]
fn shutdown_signal() -> Result<impl Future<Output = ()> + Send + 'static> {
    let mut sigterm = signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(async move {
        let name = tokio::select! {
            _ = sigterm.recv() => "SIGTERM",
            _ = sigint.recv() => "SIGINT",
        };
        info!("Received shutdown signal: {}", name);
    })
}

/// Future resolving on CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
fn shutdown_signal() -> Result<impl Future<Output = ()> + Send + 'static> {
    Ok(async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received shutdown signal: SIGINT"),
            Err(e) => error!("Failed to wait for CTRL-C: {}", e),
        }
    })
}
