//! HTTP front end tests.

use std::time::Duration;

use pattern_router::config::parse_config;
use pattern_router::handlers::builtin_registry;
use pattern_router::http::{HttpServer, X_REQUEST_ID};
use pattern_router::routing::{Controller, Router};

mod common;

fn greeter_router() -> Router {
    let mut router = Router::new();
    router.register_controller(
        "Greeter",
        Controller::new().action("hi", |args, res| {
            res.set_header("content-type", "text/plain");
            res.set_body(format!("hi {}", args[0]));
        }),
    );
    router.get(r"/hello/(\w+)", "Greeter::hi");
    router
}

#[tokio::test]
async fn test_routes_code_built_router() {
    let server = common::start_router(greeter_router()).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/hello/world")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.headers().contains_key(X_REQUEST_ID));
    assert_eq!(res.text().await.unwrap(), "hi world");

    let res = client.get(server.url("/nope")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let res = client.post(server.url("/hello/world")).send().await.unwrap();
    assert_eq!(res.status(), 405);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let server = common::start_router(greeter_router()).await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/hello/there"))
        .header(X_REQUEST_ID, "req-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()[X_REQUEST_ID], "req-123");
}

#[tokio::test]
async fn test_unresolved_handler_is_server_error() {
    let mut router = Router::new();
    router.get("/broken", "Missing::handler");
    let server = common::start_router(router).await;

    let res = reqwest::get(server.url("/broken")).await.unwrap();
    assert_eq!(res.status(), 500);
}

const CONFIG: &str = r#"
    [router]
    base_path = "/api"
    not_found = "Status::not_found"
    method_not_allowed = "Status::method_not_allowed"

    [[routes]]
    pattern = '/echo/(\w+)/(\w+)'
    method = "get"
    handler = "Echo::args"
    middleware = "Audit::log"

    [[routes]]
    pattern = "/health"
    method = "get"
    handler = "health"
"#;

#[tokio::test]
async fn test_config_built_router_under_base_path() {
    let config = parse_config(CONFIG).unwrap();
    let server = common::start_server(HttpServer::new(config, builtin_registry()).unwrap()).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/echo/a/b")).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["x-audited"], "true");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body, serde_json::json!(["a", "b"]));

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), 404);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["path"], "/health");

    let res = client.delete(server.url("/api/health")).send().await.unwrap();
    assert_eq!(res.status(), 405);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["method"], "delete");
}

#[tokio::test]
async fn test_config_update_swaps_route_table() {
    let config = parse_config(CONFIG).unwrap();
    let server = common::start_server(HttpServer::new(config, builtin_registry()).unwrap()).await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/api/ping")).send().await.unwrap();
    assert_eq!(res.status(), 404);

    let updated = parse_config(
        r#"
        [router]
        base_path = "/api"

        [[routes]]
        pattern = "/ping"
        method = "get"
        handler = "Status::ok"
        "#,
    )
    .unwrap();
    server.config_updates.send(updated).unwrap();

    let mut status = 0;
    for _ in 0..20 {
        status = client.get(server.url("/api/ping")).send().await.unwrap().status().as_u16();
        if status == 200 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_rejected_update_keeps_current_table() {
    let config = parse_config(CONFIG).unwrap();
    let server = common::start_server(HttpServer::new(config, builtin_registry()).unwrap()).await;

    let bad = parse_config(
        r#"
        [[routes]]
        pattern = "/x"
        method = "get"
        handler = "Nope::missing"
        "#,
    )
    .unwrap();
    server.config_updates.send(bad).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let res = reqwest::get(server.url("/api/health")).await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");
}
