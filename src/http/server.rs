//! HTTP front end.
//!
//! # Responsibilities
//! - Host a [`Router`] behind Axum
//! - Convert each request into one dispatch and the result back to HTTP
//! - Wire up middleware (tracing, timeout, request ID)
//! - Swap in a rebuilt route table when the config changes
//!
//! # Design Decisions
//! - Every path goes to a single fallback service; the pattern router
//!   owns all matching
//! - Dispatch runs on the blocking pool since handlers are synchronous
//! - A reload that fails to build keeps the current table

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{build_router, AppConfig, ConfigError};
use crate::http::request::UuidRequestId;
use crate::routing::{self, HandlerRegistry, Router};

/// Router plus the base path it is mounted under.
#[derive(Debug)]
pub struct RouteTable {
    pub router: Router,
    pub base_path: String,
}

/// Application state injected into the fallback service.
#[derive(Clone)]
pub struct AppState {
    table: Arc<ArcSwap<RouteTable>>,
}

/// HTTP server hosting the pattern router.
pub struct HttpServer {
    config: AppConfig,
    table: Arc<ArcSwap<RouteTable>>,
    registry: Option<HandlerRegistry>,
}

impl HttpServer {
    /// Build the route table from `config`; reloads rebuild it against the
    /// same `registry`.
    pub fn new(config: AppConfig, registry: HandlerRegistry) -> Result<Self, ConfigError> {
        let router = build_router(&config, registry.clone())?;
        let table = RouteTable {
            router,
            base_path: config.router.base_path.clone(),
        };
        Ok(Self {
            config,
            table: Arc::new(ArcSwap::from_pointee(table)),
            registry: Some(registry),
        })
    }

    /// Serve a router assembled in code. Config updates are ignored since
    /// there is no registry to rebuild from.
    pub fn with_router(config: AppConfig, router: Router) -> Self {
        let table = RouteTable {
            router,
            base_path: config.router.base_path.clone(),
        };
        Self {
            config,
            table: Arc::new(ArcSwap::from_pointee(table)),
            registry: None,
        }
    }

    /// Build the Axum app with all middleware layers.
    #[allow(deprecated)]
    fn build_app(&self) -> axum::Router {
        let state = AppState {
            table: self.table.clone(),
        };
        axum::Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.listener.request_timeout_secs,
            )))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until `shutdown` resolves.
    ///
    /// Configs received on `config_updates` rebuild the route table; the
    /// listener settings of a reloaded config are not applied.
    pub async fn run<F>(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<AppConfig>,
        shutdown: F,
    ) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.table.load().router.len(),
            "HTTP server starting"
        );

        let app = self.build_app();
        let table = self.table.clone();
        let registry = self.registry;

        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                let Some(registry) = registry.clone() else {
                    tracing::warn!("Ignoring config update for a router assembled in code");
                    continue;
                };
                match build_router(&config, registry) {
                    Ok(router) => {
                        let routes = router.len();
                        table.store(Arc::new(RouteTable {
                            router,
                            base_path: config.router.base_path.clone(),
                        }));
                        tracing::info!(routes, "Route table reloaded");
                    }
                    Err(e) => {
                        tracing::error!(
                            error = %e,
                            "Reloaded config rejected; keeping current route table"
                        );
                    }
                }
            }
        });

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback service: one dispatch per request.
async fn dispatch_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let table = state.table.load_full();
    let path = uri.path().to_string();

    let result = tokio::task::spawn_blocking(move || {
        table
            .router
            .dispatch_under(method.as_str(), &path, &table.base_path)
    })
    .await;

    match result {
        Ok(Ok(dispatched)) => {
            tracing::debug!(
                outcome = dispatched.outcome.label(),
                status = %dispatched.response.status(),
                "Request dispatched"
            );
            into_http(dispatched.response)
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Route handler could not be resolved");
            (StatusCode::INTERNAL_SERVER_ERROR, "Handler unavailable").into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Route handler panicked");
            (StatusCode::INTERNAL_SERVER_ERROR, "Handler failed").into_response()
        }
    }
}

fn into_http(response: routing::Response) -> Response {
    let mut out = (response.status(), response.body().to_string()).into_response();
    for (name, value) in response.headers() {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                out.headers_mut().insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Dropping invalid response header"),
        }
    }
    out
}
