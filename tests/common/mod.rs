//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pattern_router::config::AppConfig;
use pattern_router::http::HttpServer;
use pattern_router::routing::{Handler, Router};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

/// Ordered log of handler invocations.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

#[allow(dead_code)]
impl CallLog {
    /// Handler that records `tag(arg1,arg2,...)`.
    pub fn handler(&self, tag: &'static str) -> Handler {
        let log = self.0.clone();
        Handler::from_fn(move |args, _| {
            log.lock().unwrap().push(format!("{}({})", tag, args.join(",")));
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// A running server plus the handles needed to drive and stop it.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub config_updates: mpsc::UnboundedSender<AppConfig>,
    shutdown: Option<oneshot::Sender<()>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Start `server` on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(server: HttpServer) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (config_tx, config_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let _ = server
            .run(listener, config_rx, async move {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        config_updates: config_tx,
        shutdown: Some(shutdown_tx),
    }
}

/// Serve a router assembled in code with default settings.
#[allow(dead_code)]
pub async fn start_router(router: Router) -> TestServer {
    start_server(HttpServer::with_router(AppConfig::default(), router)).await
}
