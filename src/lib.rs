//! Ordered regex-pattern HTTP request router.
//!
//! Routes are tried in registration order; the first one whose pattern
//! matches the whole path and whose method matches the request runs, after
//! its optional middleware. Requests nobody claims fall back to a not-found
//! or method-not-allowed handler.
//!
//! ```
//! use pattern_router::routing::{Controller, Outcome, Router};
//!
//! let mut router = Router::new();
//! router.register_controller(
//!     "Greeter",
//!     Controller::new().action("hi", |args, res| res.write(&format!("hello {}", args[0]))),
//! );
//! router.get(r"/hello/(\w+)", "Greeter::hi");
//!
//! let dispatched = router.dispatch("GET", "/hello/world").unwrap();
//! assert_eq!(dispatched.outcome, Outcome::Matched { route: 0 });
//! assert_eq!(dispatched.response.body(), "hello world");
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use error::{RouterError, RouterResult};
pub use http::HttpServer;
pub use routing::{Dispatched, Handler, Method, Outcome, Router};
