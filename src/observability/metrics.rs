//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Count dispatch outcomes
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `router_dispatch_total` (counter): dispatches by outcome, method
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - Label values come from fixed sets; unknown method tokens share `other`

use std::net::SocketAddr;

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::{Method, Outcome};

/// Outcome label for dispatches that failed to resolve a handler.
const ERROR_OUTCOME: &str = "error";

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one completed dispatch.
pub fn record_dispatch(outcome: &Outcome, method: &Method) {
    increment(outcome.label(), method);
}

/// Record a dispatch that stopped on a handler resolution error.
pub fn record_dispatch_error(method: &Method) {
    increment(ERROR_OUTCOME, method);
}

fn increment(outcome: &'static str, method: &Method) {
    counter!(
        "router_dispatch_total",
        "outcome" => outcome,
        "method" => method_label(method)
    )
    .increment(1);
}

fn method_label(method: &Method) -> &'static str {
    match method {
        Method::Get => "get",
        Method::Post => "post",
        Method::Put => "put",
        Method::Delete => "delete",
        Method::Patch => "patch",
        Method::Head => "head",
        Method::Options => "options",
        Method::Other(_) => "other",
    }
}
