//! Configuration schema definitions.
//!
//! This module defines the configuration file structure for the router
//! service. All types derive Serde traits for deserialization from TOML.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP front end settings.
    pub listener: ListenerConfig,

    /// Mount point and fallbacks.
    pub router: RouterSettings,

    /// Route table, in priority order.
    pub routes: Vec<RouteConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Router-wide settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Prefix every route pattern is mounted under. `"/"` means none.
    pub base_path: String,

    /// Handler reference for unmatched paths (e.g. "Status::not_found").
    pub not_found: Option<String>,

    /// Handler reference for matched paths with no matching method.
    pub method_not_allowed: Option<String>,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
            not_found: None,
            method_not_allowed: None,
        }
    }
}

/// One `[[routes]]` entry.
///
/// Either a single route (`method` + `handler`) or a resource
/// (`controller` + `actions`, paired with GET, POST, PUT, DELETE).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Regex fragment matched against the path.
    pub pattern: String,

    /// HTTP method for a single route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Handler reference for a single route ("Controller::action" or "name").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    /// Controller name for a resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,

    /// Resource actions in GET, POST, PUT, DELETE order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<String>,

    /// Middleware reference applied to this entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middleware: Option<String>,
}

/// Shape of a route entry once validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind<'a> {
    Single { method: &'a str, handler: &'a str },
    Resource { controller: &'a str, actions: &'a [String] },
}

impl RouteConfig {
    /// Classify the entry; `None` when it is neither or both shapes.
    pub fn kind(&self) -> Option<RouteKind<'_>> {
        let single = match (&self.method, &self.handler) {
            (Some(method), Some(handler)) => Some(RouteKind::Single { method, handler }),
            _ => None,
        };
        let resource = self.controller.as_deref().map(|controller| RouteKind::Resource {
            controller,
            actions: &self.actions,
        });

        match (single, resource) {
            (Some(kind), None) | (None, Some(kind)) => Some(kind),
            _ => None,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.router.base_path, "/");
        assert_eq!(config.listener.request_timeout_secs, 30);
        assert!(!config.observability.metrics_enabled);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_parse_routes() {
        let config: AppConfig = toml::from_str(
            r#"
            [router]
            base_path = "/api"
            not_found = "Status::not_found"

            [observability]
            log_format = "json"

            [[routes]]
            pattern = '/hello/(\w+)'
            method = "get"
            handler = "Greeter::hi"

            [[routes]]
            pattern = "/posts"
            controller = "Posts"
            actions = ["index", "create"]
            middleware = "Audit::log"
            "#,
        )
        .unwrap();

        assert_eq!(config.router.base_path, "/api");
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.routes.len(), 2);
        assert_eq!(
            config.routes[0].kind(),
            Some(RouteKind::Single { method: "get", handler: "Greeter::hi" })
        );
        assert!(matches!(
            config.routes[1].kind(),
            Some(RouteKind::Resource { controller: "Posts", actions }) if actions.len() == 2
        ));
    }

    #[test]
    fn test_ambiguous_route_has_no_kind() {
        let route = RouteConfig {
            pattern: "/x".into(),
            method: Some("get".into()),
            handler: Some("h".into()),
            controller: Some("C".into()),
            ..RouteConfig::default()
        };
        assert_eq!(route.kind(), None);

        let route = RouteConfig {
            pattern: "/x".into(),
            method: Some("get".into()),
            ..RouteConfig::default()
        };
        assert_eq!(route.kind(), None);
    }
}
