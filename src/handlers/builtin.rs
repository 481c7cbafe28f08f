//! Built-in controllers and functions for config-driven routing.

use axum::http::StatusCode;
use serde_json::json;

use crate::routing::{Controller, HandlerRegistry, Response};

const APPLICATION_JSON: &str = "application/json";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

fn write_json(response: &mut Response, value: &serde_json::Value) {
    response.set_header("content-type", APPLICATION_JSON);
    response.set_body(value.to_string());
}

/// `Echo::args` replies with the captured arguments as a JSON array;
/// `Echo::first` replies with the first argument as plain text.
pub fn echo() -> Controller {
    Controller::new()
        .action("args", |args, res| write_json(res, &json!(args)))
        .action("first", |args, res| {
            res.set_header("content-type", TEXT_PLAIN);
            res.set_body(args.first().cloned().unwrap_or_default());
        })
}

/// Fixed status replies, usable as fallbacks.
pub fn status() -> Controller {
    Controller::new()
        .action("ok", |_, res| {
            res.set_header("content-type", TEXT_PLAIN);
            res.set_body("OK");
        })
        .action("not_found", |args, res| {
            res.set_status(StatusCode::NOT_FOUND);
            write_json(
                res,
                &json!({ "error": "not found", "path": args.first() }),
            );
        })
        .action("method_not_allowed", |args, res| {
            res.set_status(StatusCode::METHOD_NOT_ALLOWED);
            write_json(
                res,
                &json!({
                    "error": "method not allowed",
                    "path": args.first(),
                    "method": args.get(1),
                }),
            );
        })
}

/// Middleware that logs the captured arguments and tags the response.
pub fn audit() -> Controller {
    Controller::new().action("log", |args, res| {
        tracing::info!(args = ?args, "Audited route invoked");
        res.set_header("x-audited", "true");
    })
}

/// Registry holding every built-in target:
/// `Echo::{args,first}`, `Status::{ok,not_found,method_not_allowed}`,
/// `Audit::log` and the function `health`.
pub fn builtin_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();
    registry.insert_controller("Echo", echo());
    registry.insert_controller("Status", status());
    registry.insert_controller("Audit", audit());
    registry.insert_function("health", |_, res| {
        res.set_header("content-type", TEXT_PLAIN);
        res.set_body("OK");
    });
    registry
}
