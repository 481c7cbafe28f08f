//! pattern-router service binary.
//!
//! ```text
//!   routes.toml ──▶ config (load + validate) ──▶ builder ──▶ Router
//!                                                             │
//!   serve:    TCP ──▶ axum fallback ──▶ dispatch_under ◀──────┤
//!   dispatch: argv ─────────────────▶ dispatch_under ◀────────┤
//!   check / routes: print summary ◀───────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use pattern_router::config::{build_router, load_config, watcher::ConfigWatcher, AppConfig};
use pattern_router::handlers::builtin_registry;
use pattern_router::http::HttpServer;
use pattern_router::observability::{logging, metrics};
use pattern_router::routing::{Handler, Router};

#[derive(Parser)]
#[command(name = "pattern-router")]
#[command(about = "Ordered regex-pattern HTTP request router", long_about = None)]
struct Cli {
    /// Route table and service configuration (TOML).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the route table over HTTP
    Serve,
    /// Validate the configuration and route table
    Check,
    /// Print the route table
    Routes,
    /// Dispatch a single request and print the result
    Dispatch {
        method: String,
        path: String,
        /// Override the configured base path
        #[arg(short, long)]
        base_path: Option<String>,
    },
}

#[derive(Serialize)]
struct RouteSummary {
    index: usize,
    method: String,
    pattern: String,
    handler: String,
    middleware: Option<String>,
}

#[derive(Serialize)]
struct DispatchSummary<'a> {
    outcome: &'static str,
    status: u16,
    headers: &'a [(String, String)],
    body: &'a str,
}

fn describe(handler: &Handler) -> String {
    match handler.reference() {
        Some(r) => r.to_string(),
        None => "<closure>".to_string(),
    }
}

fn route_summaries(router: &Router) -> Vec<RouteSummary> {
    router
        .routes()
        .iter()
        .enumerate()
        .map(|(index, route)| RouteSummary {
            index,
            method: route.method().to_string(),
            pattern: route.pattern().to_string(),
            handler: describe(route.handler()),
            middleware: route.middleware().map(describe),
        })
        .collect()
}

fn load(path: Option<&Path>) -> Result<AppConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => Ok(load_config(path)?),
        None => Ok(AppConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load(cli.config.as_deref())?;

    logging::init_logging(&config.observability)?;
    tracing::info!(
        config = ?cli.config,
        routes = config.routes.len(),
        "pattern-router v0.1.0 starting"
    );

    match cli.command {
        Commands::Serve => serve(config, cli.config).await?,
        Commands::Check => {
            let router = build_router(&config, builtin_registry())?;
            let summary = serde_json::json!({
                "valid": true,
                "routes": router.len(),
                "base_path": config.router.base_path,
                "not_found": router.not_found_handler().map(describe),
                "method_not_allowed": router.method_not_allowed_handler().map(describe),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Commands::Routes => {
            let router = build_router(&config, builtin_registry())?;
            println!("{}", serde_json::to_string_pretty(&route_summaries(&router))?);
        }
        Commands::Dispatch { method, path, base_path } => {
            let router = build_router(&config, builtin_registry())?;
            let base_path = base_path.unwrap_or_else(|| config.router.base_path.clone());
            let dispatched = router.dispatch_under(&method, &path, &base_path)?;
            let summary = DispatchSummary {
                outcome: dispatched.outcome.label(),
                status: dispatched.response.status().as_u16(),
                headers: dispatched.response.headers(),
                body: dispatched.response.body(),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}

async fn serve(config: AppConfig, path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    // The watcher handle must outlive the server.
    let (_watcher, config_updates) = match path {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(&path, builtin_registry());
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        base_path = %config.router.base_path,
        "Listening for connections"
    );

    let server = HttpServer::new(config, builtin_registry())?;
    server.run(listener, config_updates, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
