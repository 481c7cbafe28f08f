//! Handler abstraction and named handler registry.
//!
//! # Responsibilities
//! - Represent route targets as closures or named references
//! - Resolve `Controller::action` references at call time
//! - Invoke targets with positional captured arguments
//!
//! # Design Decisions
//! - Named references stay unresolved until dispatch, so routes may be
//!   registered before their controllers
//! - Resolution failures are typed errors, never panics

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{RouterError, RouterResult};
use crate::routing::Response;

/// Callable invoked with captured arguments.
pub type HandlerFn = Arc<dyn Fn(&[String], &mut Response) + Send + Sync>;

/// Reference to a registered target: `Controller::action` or a bare function
/// name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerRef {
    target: String,
    action: Option<String>,
}

impl HandlerRef {
    /// Join a controller and an action. An empty action leaves a bare
    /// reference to `controller`.
    pub fn new(controller: impl Into<String>, action: impl Into<String>) -> Self {
        let action = action.into();
        Self {
            target: controller.into(),
            action: (!action.is_empty()).then_some(action),
        }
    }

    /// Reference to a function registered by name.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            target: name.into(),
            action: None,
        }
    }

    /// Parse `"Controller::action"` or `"name"`.
    pub fn parse(s: &str) -> Self {
        match s.split_once("::") {
            Some((controller, action)) => Self::new(controller, action),
            None => Self::function(s),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.action {
            Some(action) => write!(f, "{}::{}", self.target, action),
            None => f.write_str(&self.target),
        }
    }
}

/// A route target.
#[derive(Clone)]
pub enum Handler {
    /// Closure called directly.
    Func(HandlerFn),
    /// Name resolved against the router's registry when invoked.
    Named(HandlerRef),
}

impl Handler {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&[String], &mut Response) + Send + Sync + 'static,
    {
        Handler::Func(Arc::new(f))
    }

    /// Named reference, if this handler is one.
    pub fn reference(&self) -> Option<&HandlerRef> {
        match self {
            Handler::Named(r) => Some(r),
            Handler::Func(_) => None,
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Func(_) => f.write_str("Handler::Func(..)"),
            Handler::Named(r) => write!(f, "Handler::Named({})", r),
        }
    }
}

impl From<HandlerRef> for Handler {
    fn from(r: HandlerRef) -> Self {
        Handler::Named(r)
    }
}

impl From<HandlerFn> for Handler {
    fn from(f: HandlerFn) -> Self {
        Handler::Func(f)
    }
}

impl From<&str> for Handler {
    fn from(s: &str) -> Self {
        Handler::Named(HandlerRef::parse(s))
    }
}

impl From<String> for Handler {
    fn from(s: String) -> Self {
        Handler::from(s.as_str())
    }
}

impl From<(&str, &str)> for Handler {
    fn from((controller, action): (&str, &str)) -> Self {
        Handler::Named(HandlerRef::new(controller, action))
    }
}

/// Named set of actions.
#[derive(Clone, Default)]
pub struct Controller {
    actions: HashMap<String, HandlerFn>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action, replacing any earlier one with the same name.
    pub fn action<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[String], &mut Response) + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(f));
        self
    }

    fn get(&self, name: &str) -> Option<&HandlerFn> {
        self.actions.get(name)
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.actions.keys().collect();
        names.sort();
        f.debug_struct("Controller").field("actions", &names).finish()
    }
}

/// Controllers and functions addressable by [`HandlerRef`].
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    controllers: HashMap<String, Controller>,
    functions: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_controller(&mut self, name: impl Into<String>, controller: Controller) {
        self.controllers.insert(name.into(), controller);
    }

    pub fn insert_function<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[String], &mut Response) + Send + Sync + 'static,
    {
        self.functions.insert(name.into(), Arc::new(f));
    }

    /// Look up the callable behind a reference.
    pub fn resolve(&self, r: &HandlerRef) -> RouterResult<&HandlerFn> {
        match r.action() {
            Some(action) => {
                let controller = self
                    .controllers
                    .get(r.target())
                    .ok_or_else(|| RouterError::UnknownHandler(r.to_string()))?;
                controller.get(action).ok_or_else(|| RouterError::UnknownAction {
                    controller: r.target().to_string(),
                    action: action.to_string(),
                })
            }
            None => self
                .functions
                .get(r.target())
                .ok_or_else(|| RouterError::UnknownHandler(r.to_string())),
        }
    }

    /// The callable behind `handler`, resolving named references.
    pub fn callable<'a>(&'a self, handler: &'a Handler) -> RouterResult<&'a HandlerFn> {
        match handler {
            Handler::Func(f) => Ok(f),
            Handler::Named(r) => self.resolve(r),
        }
    }

    /// Fails if `handler` is a reference that does not resolve.
    pub fn check(&self, handler: &Handler) -> RouterResult<()> {
        self.callable(handler).map(|_| ())
    }

    /// Call `handler` with `args`.
    pub fn invoke(
        &self,
        handler: &Handler,
        args: &[String],
        response: &mut Response,
    ) -> RouterResult<()> {
        let f = self.callable(handler)?;
        f(args, response);
        Ok(())
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut controllers: Vec<&String> = self.controllers.keys().collect();
        controllers.sort();
        let mut functions: Vec<&String> = self.functions.keys().collect();
        functions.sort();
        f.debug_struct("HandlerRegistry")
            .field("controllers", &controllers)
            .field("functions", &functions)
            .finish()
    }
}
