// # dnsapi-proxy-http
//
// HTTP surface of the DNS API proxy.
//
// ## Routes
//
// | Method | Path                                   | Operation |
// |--------|----------------------------------------|-----------|
// | GET    | `/plain/update`                        | update    |
// | POST   | `/acmedns/update`                      | update    |
// | POST   | `/httpreq/present`                     | update    |
// | POST   | `/httpreq/cleanup`                     | clean     |
// | GET    | `/directadmin/CMD_API_SHOW_DOMAINS`    | list      |
// | GET    | `/directadmin/CMD_API_DOMAIN_POINTER`  | no-op     |
// | GET    | `/directadmin/CMD_API_DNS_CONTROL`     | update    |
//
// ## Request Pipeline
//
// 1. Request logging (`log` middleware)
// 2. Client address resolution and credential extraction (`Caller`)
// 3. Protocol adapter turns the wire shape into an `UpdateRequest`
// 4. `Authorizer` gates the request
// 5. `DnsBackend` runs the upstream sequence under the configured deadline
//
// Errors short-circuit the pipeline and are rendered by `ApiError`.

mod error;
mod extract;
mod log;
mod routes;

pub use error::ApiError;
pub use extract::Caller;

use axum::Router;
use axum::routing::{get, post};
use dnsapi_proxy_core::{
    Authorizer, ClientIpResolver, DnsBackend, ProxyConfig, Result, UpdateRequest,
    run_with_deadline,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Shared state of all handlers
#[derive(Clone)]
pub struct AppState {
    backend: Arc<dyn DnsBackend>,
    authorizer: Arc<Authorizer>,
    client_ip: Arc<ClientIpResolver>,
    timeout: Duration,
    debug: bool,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("backend", &self.backend.backend_name())
            .field("auth_method", &self.authorizer.method())
            .field("timeout", &self.timeout)
            .field("debug", &self.debug)
            .finish()
    }
}

impl AppState {
    /// Build handler state
    ///
    /// # Parameters
    ///
    /// - `backend`: upstream orchestrator shared by all requests
    /// - `authorizer`: grant tables and combination policy
    /// - `client_ip`: resolver aware of trusted proxies
    /// - `timeout`: deadline of one whole provider sequence
    pub fn new(
        backend: Arc<dyn DnsBackend>,
        authorizer: Authorizer,
        client_ip: ClientIpResolver,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            authorizer: Arc::new(authorizer),
            client_ip: Arc::new(client_ip),
            timeout,
            debug: false,
        }
    }

    /// Build handler state from the proxy configuration
    pub fn from_config(backend: Arc<dyn DnsBackend>, config: &ProxyConfig) -> Self {
        let authorizer = Authorizer::new(
            config.auth.method,
            config.auth.allowed_domains.clone(),
            config.auth.users.clone(),
        );
        let client_ip = ClientIpResolver::new(config.trusted_proxies.clone());

        Self::new(backend, authorizer, client_ip, config.timeout()).with_debug(config.debug)
    }

    /// Log request headers of every exchange
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub(crate) fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Authorize `request` for `client_ip`, then set the record upstream
    pub(crate) async fn update(&self, client_ip: &str, request: &UpdateRequest) -> Result<()> {
        self.authorizer.authorize(client_ip, request)?;

        tracing::info!(
            backend = self.backend.backend_name(),
            "Updating {} record {} -> {}",
            request.record_type(),
            request.full_name(),
            request.value()
        );
        run_with_deadline(self.timeout, self.backend.update(request)).await
    }

    /// Authorize `request` for `client_ip`, then clear the record upstream
    pub(crate) async fn clean(&self, client_ip: &str, request: &UpdateRequest) -> Result<()> {
        self.authorizer.authorize(client_ip, request)?;

        tracing::info!(
            backend = self.backend.backend_name(),
            "Cleaning {} record {}",
            request.record_type(),
            request.full_name()
        );
        run_with_deadline(self.timeout, self.backend.clean(request)).await
    }
}

/// Build the router with all proxy routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/plain/update", get(routes::plain::update))
        .route("/acmedns/update", post(routes::acmedns::update))
        .route("/httpreq/present", post(routes::httpreq::present))
        .route("/httpreq/cleanup", post(routes::httpreq::cleanup))
        .route(
            "/directadmin/CMD_API_SHOW_DOMAINS",
            get(routes::directadmin::show_domains),
        )
        .route(
            "/directadmin/CMD_API_DOMAIN_POINTER",
            get(routes::directadmin::domain_pointer),
        )
        .route(
            "/directadmin/CMD_API_DNS_CONTROL",
            get(routes::directadmin::dns_control),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            log::log_request,
        ))
        .with_state(state)
}

/// Serve the proxy on `listener` until `shutdown` resolves
///
/// In-flight requests are allowed to finish after `shutdown` fires.
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> std::io::Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let app = router(state);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
