//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check each route entry has exactly one shape
//! - Check patterns compile under the configured base path
//! - Check method tokens and resource action counts
//! - Check listener and metrics addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Handler names are resolved later, against the registry the router
//!   is built with
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{AppConfig, RouteKind};
use crate::routing::matcher::{self, BasePath};
use crate::routing::Method;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Route entry is neither `method`+`handler` nor `controller`+`actions`.
    AmbiguousRoute { index: usize },
    /// Pattern does not compile.
    InvalidPattern { index: usize, message: String },
    /// Method token is not a known verb.
    UnknownMethod { index: usize, method: String },
    /// Resource with no actions or more than four.
    ActionCount { index: usize, count: usize },
    /// Address does not parse as `ip:port`.
    InvalidAddress { field: &'static str, value: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::AmbiguousRoute { index } => write!(
                f,
                "routes[{}]: expected either method+handler or controller+actions",
                index
            ),
            ValidationError::InvalidPattern { index, message } => {
                write!(f, "routes[{}]: {}", index, message)
            }
            ValidationError::UnknownMethod { index, method } => {
                write!(f, "routes[{}]: unknown method `{}`", index, method)
            }
            ValidationError::ActionCount { index, count } => write!(
                f,
                "routes[{}]: resource needs 1 to 4 actions, got {}",
                index, count
            ),
            ValidationError::InvalidAddress { field, value } => {
                write!(f, "{}: invalid address `{}`", field, value)
            }
        }
    }
}

/// Validate `config`, collecting every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let base = BasePath::new(&config.router.base_path);

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    for (index, route) in config.routes.iter().enumerate() {
        if let Err(e) = matcher::compile(&base.effective_pattern(&route.pattern)) {
            errors.push(ValidationError::InvalidPattern {
                index,
                message: e.to_string(),
            });
        }

        match route.kind() {
            None => errors.push(ValidationError::AmbiguousRoute { index }),
            Some(RouteKind::Single { method, .. }) => {
                if !Method::from(method).is_standard() {
                    errors.push(ValidationError::UnknownMethod {
                        index,
                        method: method.to_string(),
                    });
                }
            }
            Some(RouteKind::Resource { actions, .. }) => {
                if actions.is_empty() || actions.len() > Method::RESOURCE_ORDER.len() {
                    errors.push(ValidationError::ActionCount {
                        index,
                        count: actions.len(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
