//! Hot reload of the route table file.
//!
//! A change event re-reads the file and assembles a throwaway router from
//! it. Only configs whose route table builds are forwarded, so the server
//! never sees an update it would have to reject.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::builder::build_router;
use crate::config::loader::{load_config, ConfigError};
use crate::config::schema::AppConfig;
use crate::routing::HandlerRegistry;

/// Forwards reloaded route table configs from one file.
pub struct ConfigWatcher {
    path: PathBuf,
    registry: HandlerRegistry,
    update_tx: mpsc::UnboundedSender<AppConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, checking reloaded route tables against `registry`.
    ///
    /// Returns the watcher and the receiving end for accepted configs.
    pub fn new(
        path: &Path,
        registry: HandlerRegistry,
    ) -> (Self, mpsc::UnboundedReceiver<AppConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            registry,
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Re-read the file and forward it if its route table builds.
    fn reload(&self) -> Result<(), ConfigError> {
        let config = load_config(&self.path)?;
        let router = build_router(&config, self.registry.clone())?;
        tracing::info!(
            path = ?self.path,
            routes = router.len(),
            "Route table reloaded"
        );
        // The receiver is gone once the server stops.
        let _ = self.update_tx.send(config);
        Ok(())
    }

    fn on_event(&self, res: notify::Result<Event>) {
        match res {
            Ok(event) if is_content_change(&event.kind) => {
                if let Err(e) = self.reload() {
                    tracing::error!(
                        path = ?self.path,
                        error = %e,
                        "Reload rejected; keeping current route table"
                    );
                }
            }
            Ok(_) => {}
            Err(e) => tracing::error!(error = ?e, "Watch error"),
        }
    }

    /// Start watching. The returned handle must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| self.on_event(res),
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Route table watcher started");
        Ok(watcher)
    }
}

fn is_content_change(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::builtin_registry;
    use notify::event::{AccessKind, ModifyKind};
    use std::fs;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir()
            .join(format!("pattern-router-watch-{}-{}.toml", name, std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    const ROUTES: &str = r#"
        [[routes]]
        pattern = "/health"
        method = "get"
        handler = "health"
    "#;

    #[test]
    fn test_change_forwards_buildable_config() {
        let path = temp_file("ok", ROUTES);
        let (watcher, mut updates) = ConfigWatcher::new(&path, builtin_registry());

        watcher.on_event(Ok(Event::new(EventKind::Modify(ModifyKind::Any))));

        let config = updates.try_recv().unwrap();
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].pattern, "/health");
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_unknown_handler_is_not_forwarded() {
        let path = temp_file(
            "unknown",
            r#"
            [[routes]]
            pattern = "/x"
            method = "get"
            handler = "Nope::missing"
            "#,
        );
        let (watcher, mut updates) = ConfigWatcher::new(&path, builtin_registry());

        assert!(matches!(watcher.reload(), Err(ConfigError::Routes(_))));
        watcher.on_event(Ok(Event::new(EventKind::Modify(ModifyKind::Any))));
        assert!(updates.try_recv().is_err());
        fs::remove_file(path).unwrap();
    }

    #[test]
    fn test_access_events_are_ignored() {
        let path = temp_file("access", ROUTES);
        let (watcher, mut updates) = ConfigWatcher::new(&path, builtin_registry());

        watcher.on_event(Ok(Event::new(EventKind::Access(AccessKind::Any))));
        assert!(updates.try_recv().is_err());
        fs::remove_file(path).unwrap();
    }
}
