//! Middleware registration window.

use std::ops::{Deref, DerefMut};

use crate::routing::{Handler, Router};

/// A RAII guard that holds the router's active middleware slot.
///
/// Routes registered through the guard capture the middleware; dropping the
/// guard clears the slot, including when the registration callback panics.
pub(super) struct MiddlewareScope<'a> {
    router: &'a mut Router,
}

impl<'a> MiddlewareScope<'a> {
    pub(super) fn enter(router: &'a mut Router, middleware: Handler) -> Self {
        router.set_active_middleware(Some(middleware));
        Self { router }
    }
}

impl Deref for MiddlewareScope<'_> {
    type Target = Router;
    fn deref(&self) -> &Self::Target {
        self.router
    }
}

impl DerefMut for MiddlewareScope<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.router
    }
}

impl Drop for MiddlewareScope<'_> {
    fn drop(&mut self) {
        self.router.set_active_middleware(None);
    }
}
