//! Router assembly from configuration.

use crate::config::loader::ConfigError;
use crate::config::schema::{AppConfig, RouteConfig, RouteKind};
use crate::routing::{HandlerRegistry, Router};

/// Build a router from `config`, resolving handler names against
/// `registry`. Entries register in file order; an entry with `middleware`
/// is registered inside its own middleware window.
///
/// The finished router is checked eagerly, so unknown handler names fail
/// here instead of at dispatch.
pub fn build_router(config: &AppConfig, registry: HandlerRegistry) -> Result<Router, ConfigError> {
    let mut router = Router::with_registry(registry);

    for route in &config.routes {
        match &route.middleware {
            Some(middleware) => {
                router.with_middleware(middleware.as_str(), |r| register_entry(r, route));
            }
            None => register_entry(&mut router, route),
        }
    }

    if let Some(handler) = &config.router.not_found {
        router.not_found(handler.as_str());
    }
    if let Some(handler) = &config.router.method_not_allowed {
        router.method_not_allowed(handler.as_str());
    }

    router.check(&config.router.base_path).map_err(ConfigError::Routes)?;

    tracing::info!(
        routes = router.len(),
        base_path = %config.router.base_path,
        "Router built from configuration"
    );
    Ok(router)
}

fn register_entry(router: &mut Router, route: &RouteConfig) {
    match route.kind() {
        Some(RouteKind::Single { method, handler }) => {
            router.register_route(route.pattern.as_str(), method, handler);
        }
        Some(RouteKind::Resource { controller, actions }) => {
            router.mix(&route.pattern, controller, actions);
        }
        None => {
            tracing::warn!(pattern = %route.pattern, "Skipping route entry with no usable shape")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use crate::error::RouterError;
    use crate::handlers::builtin_registry;
    use crate::routing::{Method, Outcome};

    const CONFIG: &str = r#"
        [router]
        base_path = "/api"
        not_found = "Status::not_found"
        method_not_allowed = "Status::method_not_allowed"

        [[routes]]
        pattern = '/echo/(\w+)'
        method = "get"
        handler = "Echo::args"

        [[routes]]
        pattern = '/items(?:/(\d+))?'
        controller = "Echo"
        actions = ["args", "first", "args"]
        middleware = "Audit::log"

        [[routes]]
        pattern = "/health"
        method = "get"
        handler = "health"
    "#;

    #[test]
    fn test_build_in_file_order() {
        let config = parse_config(CONFIG).unwrap();
        let router = build_router(&config, builtin_registry()).unwrap();

        let methods: Vec<&Method> = router.routes().iter().map(|r| r.method()).collect();
        assert_eq!(
            methods,
            vec![&Method::Get, &Method::Get, &Method::Post, &Method::Put, &Method::Get]
        );
        assert!(router.routes()[0].middleware().is_none());
        assert!(router.routes()[1..4].iter().all(|r| r.middleware().is_some()));
        assert!(router.routes()[4].middleware().is_none());
    }

    #[test]
    fn test_built_router_dispatches_under_base_path() {
        let config = parse_config(CONFIG).unwrap();
        let router = build_router(&config, builtin_registry()).unwrap();

        let dispatched = router.dispatch_under("GET", "/api/echo/hi", "/api").unwrap();
        assert_eq!(dispatched.outcome, Outcome::Matched { route: 0 });
        assert_eq!(dispatched.response.body(), r#"["hi"]"#);

        let dispatched = router.dispatch_under("DELETE", "/api/items/3", "/api").unwrap();
        assert_eq!(
            dispatched.outcome,
            Outcome::MethodNotAllowed { method: Method::Delete }
        );
    }

    #[test]
    fn test_unknown_handler_rejected() {
        let config = parse_config(
            r#"
            [[routes]]
            pattern = "/x"
            method = "get"
            handler = "Nope::nothing"
            "#,
        )
        .unwrap();

        let err = build_router(&config, builtin_registry()).unwrap_err();
        match err {
            ConfigError::Routes(errors) => {
                assert!(matches!(errors[0], RouterError::UnknownHandler(_)));
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
