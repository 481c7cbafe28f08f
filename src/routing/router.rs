//! Route registration and dispatch.
//!
//! # Responsibilities
//! - Store routes in registration order
//! - Hold the not-found / method-not-allowed fallbacks
//! - Scope middleware to a registration window
//! - Resolve one request to one handler call or one fallback call
//!
//! # Design Decisions
//! - Registration needs `&mut Router`, dispatch only `&Router`
//! - Registration never fails; `check` validates eagerly on demand
//! - O(n) scan over routes (acceptable for typical route counts)
//! - Only the last path-matching method reaches the 405 fallback

use axum::http::StatusCode;

use crate::error::{RouterError, RouterResult};
use crate::observability::metrics;
use crate::routing::matcher::{self, BasePath, PatternCache};
use crate::routing::scope::MiddlewareScope;
use crate::routing::{
    Controller, Dispatched, Handler, HandlerRef, HandlerRegistry, Method, Outcome, Response,
};

/// A registered route.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    method: Method,
    handler: Handler,
    middleware: Option<Handler>,
}

impl Route {
    /// Regex fragment as registered (unanchored).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn middleware(&self) -> Option<&Handler> {
        self.middleware.as_ref()
    }
}

/// Ordered pattern router.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
    not_found: Option<Handler>,
    method_not_allowed: Option<Handler>,
    active_middleware: Option<Handler>,
    registry: HandlerRegistry,
    patterns: PatternCache,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router that resolves named handlers against `registry`.
    pub fn with_registry(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    pub fn register_controller(
        &mut self,
        name: impl Into<String>,
        controller: Controller,
    ) -> &mut Self {
        self.registry.insert_controller(name, controller);
        self
    }

    pub fn register_function<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[String], &mut Response) + Send + Sync + 'static,
    {
        self.registry.insert_function(name, f);
        self
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn not_found_handler(&self) -> Option<&Handler> {
        self.not_found.as_ref()
    }

    pub fn method_not_allowed_handler(&self) -> Option<&Handler> {
        self.method_not_allowed.as_ref()
    }

    pub(super) fn set_active_middleware(&mut self, middleware: Option<Handler>) {
        self.active_middleware = middleware;
    }

    // --- Registration ---

    /// Append a route. The method token is stored lower-cased and not
    /// validated; the pattern is not compiled until dispatch or `check`.
    pub fn register_route(
        &mut self,
        pattern: impl Into<String>,
        method: impl Into<Method>,
        handler: impl Into<Handler>,
    ) -> &mut Self {
        let route = Route {
            pattern: pattern.into(),
            method: method.into(),
            handler: handler.into(),
            middleware: self.active_middleware.clone(),
        };
        tracing::debug!(
            pattern = %route.pattern,
            method = %route.method,
            handler = ?route.handler,
            middleware = route.middleware.is_some(),
            "Route registered"
        );
        self.routes.push(route);
        self
    }

    pub fn get(&mut self, pattern: impl Into<String>, handler: impl Into<Handler>) -> &mut Self {
        self.register_route(pattern, Method::Get, handler)
    }

    pub fn post(&mut self, pattern: impl Into<String>, handler: impl Into<Handler>) -> &mut Self {
        self.register_route(pattern, Method::Post, handler)
    }

    pub fn put(&mut self, pattern: impl Into<String>, handler: impl Into<Handler>) -> &mut Self {
        self.register_route(pattern, Method::Put, handler)
    }

    pub fn delete(&mut self, pattern: impl Into<String>, handler: impl Into<Handler>) -> &mut Self {
        self.register_route(pattern, Method::Delete, handler)
    }

    /// Register `controller`'s actions against one pattern, paired in order
    /// with GET, POST, PUT and DELETE. Fewer actions register fewer verbs.
    pub fn mix<I>(&mut self, pattern: &str, controller: &str, actions: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut actions = actions.into_iter();
        for method in Method::RESOURCE_ORDER {
            let Some(action) = actions.next() else {
                break;
            };
            self.register_route(pattern, method, HandlerRef::new(controller, action.as_ref()));
        }

        let ignored = actions.count();
        if ignored > 0 {
            tracing::warn!(
                pattern = %pattern,
                controller = %controller,
                ignored,
                "Resource takes at most four actions; extra actions ignored"
            );
        }
        self
    }

    /// Set the fallback for requests no pattern matches.
    pub fn not_found(&mut self, handler: impl Into<Handler>) -> &mut Self {
        self.not_found = Some(handler.into());
        self
    }

    /// Set the fallback for requests whose path matched without a method
    /// match.
    pub fn method_not_allowed(&mut self, handler: impl Into<Handler>) -> &mut Self {
        self.method_not_allowed = Some(handler.into());
        self
    }

    /// Run `register` with `middleware` active. Every route it registers
    /// captures the middleware. The slot is cleared afterwards, also when
    /// `register` panics; a nested call clears it rather than restoring the
    /// outer middleware.
    pub fn with_middleware<F>(&mut self, middleware: impl Into<Handler>, register: F) -> &mut Self
    where
        F: FnOnce(&mut Router),
    {
        {
            let mut scope = MiddlewareScope::enter(self, middleware.into());
            register(&mut *scope);
        }
        self
    }

    // --- Dispatch ---

    /// Dispatch with no base path.
    pub fn dispatch(&self, method: &str, path: &str) -> RouterResult<Dispatched> {
        self.dispatch_under(method, path, "/")
    }

    /// Dispatch `method path` with routes mounted under `base_path`.
    ///
    /// Calls the middleware then the handler of the first route matching
    /// both path and method, passing the captured groups (without the
    /// base-path group). Otherwise sets 404 or 405 and calls the matching
    /// fallback, if any.
    ///
    /// Both callables of a matched route are resolved before either runs,
    /// so a resolution error leaves no middleware side effects behind.
    pub fn dispatch_under(
        &self,
        method: &str,
        path: &str,
        base_path: &str,
    ) -> RouterResult<Dispatched> {
        let method = Method::from(method);
        match self.scan(&method, path, BasePath::new(base_path)) {
            Ok(dispatched) => {
                metrics::record_dispatch(&dispatched.outcome, &method);
                Ok(dispatched)
            }
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "Dispatch failed");
                metrics::record_dispatch_error(&method);
                Err(e)
            }
        }
    }

    fn scan(&self, method: &Method, path: &str, base: BasePath<'_>) -> RouterResult<Dispatched> {
        let mut response = Response::new();
        let mut path_matched = false;

        for (index, route) in self.routes.iter().enumerate() {
            let Some(mut args) = self.patterns.captures(&route.pattern, base, path) else {
                continue;
            };
            path_matched = true;

            if route.method != *method {
                tracing::trace!(
                    route = index,
                    expected = %route.method,
                    method = %method,
                    "Path matched, method did not"
                );
                continue;
            }

            if base.is_prefixed() && !args.is_empty() {
                args.remove(0);
            }

            tracing::debug!(
                method = %method,
                path = %path,
                route = index,
                pattern = %route.pattern,
                args = ?args,
                "Route matched"
            );

            let middleware = route
                .middleware
                .as_ref()
                .map(|m| self.registry.callable(m))
                .transpose()?;
            let handler = self.registry.callable(&route.handler)?;
            if let Some(middleware) = middleware {
                middleware(args.as_slice(), &mut response);
            }
            handler(args.as_slice(), &mut response);

            return Ok(Dispatched {
                outcome: Outcome::Matched { route: index },
                response,
            });
        }

        let outcome = if path_matched {
            tracing::debug!(method = %method, path = %path, "Method not allowed");
            response.set_status(StatusCode::METHOD_NOT_ALLOWED);
            if let Some(handler) = &self.method_not_allowed {
                let args = [path.to_string(), method.to_string()];
                self.registry.invoke(handler, &args, &mut response)?;
            }
            Outcome::MethodNotAllowed {
                method: method.clone(),
            }
        } else {
            tracing::debug!(method = %method, path = %path, "No route matched");
            response.set_status(StatusCode::NOT_FOUND);
            if let Some(handler) = &self.not_found {
                self.registry.invoke(handler, &[path.to_string()], &mut response)?;
            }
            Outcome::NotFound
        };

        Ok(Dispatched { outcome, response })
    }

    // --- Validation ---

    /// Compile every effective pattern under `base_path` and resolve every
    /// named handler, middleware and fallback.
    ///
    /// Returns all errors, not just the first.
    pub fn check(&self, base_path: &str) -> Result<(), Vec<RouterError>> {
        let base = BasePath::new(base_path);
        let mut errors = Vec::new();

        for route in &self.routes {
            if let Err(e) = matcher::compile(&base.effective_pattern(&route.pattern)) {
                errors.push(e);
            }
            if let Err(e) = self.registry.check(&route.handler) {
                errors.push(e);
            }
            if let Some(Err(e)) = route.middleware.as_ref().map(|m| self.registry.check(m)) {
                errors.push(e);
            }
        }

        for fallback in [&self.not_found, &self.method_not_allowed].into_iter().flatten() {
            if let Err(e) = self.registry.check(fallback) {
                errors.push(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
