//! HTTP front end subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware layers)
//!     → request.rs (request ID)
//!     → routing::Router::dispatch_under (method, path, base path)
//!     → server.rs (Response → HTTP response)
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{HttpServer, RouteTable};
