//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router / HTTP front end produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (dispatch outcome counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;
