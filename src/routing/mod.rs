//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (at startup):
//!     get / post / mix / register_route
//!     → router.rs (append Route, capture active middleware)
//!     → scope.rs (with_middleware window, cleared on every exit path)
//!
//! Incoming Request (method, path, base path)
//!     → router.rs (linear scan in insertion order)
//!     → matcher.rs (anchored regex match, captured arguments)
//!     → handler.rs (resolve function or named Controller::action)
//!     → Return: Dispatched { outcome, response }
//! ```
//!
//! # Design Decisions
//! - Insertion order is priority: first full match wins
//! - A path match with the wrong method keeps scanning
//! - 404 and 405 are outcomes, not errors
//! - Patterns compile lazily and are cached per base path

pub mod handler;
pub mod matcher;
pub mod method;
pub mod response;
pub mod router;
mod scope;

pub use handler::{Controller, Handler, HandlerFn, HandlerRef, HandlerRegistry};
pub use method::Method;
pub use response::{Dispatched, Outcome, Response};
pub use router::{Route, Router};
