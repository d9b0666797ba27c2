//! Shared application state.
//!
//! [`AppState<C>`] pairs the configuration with the [`RouteGuard`] that owns
//! the route file and the published graph snapshot. It is handed to the
//! axum router as state and the console thread gets a clone of the guard.
//!
//! # Example
//!
//! ```no_run
//! use farepath_cli::{AppState, FarepathConfig};
//!
//! let state = AppState::open(FarepathConfig::default()).unwrap();
//! println!("{}", state.project_name());
//! ```

use farepath_core::Result;
use farepath_core::traits::ConfigProvider;
use farepath_graph::RouteGuard;
use std::sync::Arc;

/// Thread-safe shared application state.
///
/// Cloning is cheap (two `Arc` clones).
#[derive(Debug)]
pub struct AppState<C: ConfigProvider> {
    config: Arc<C>,
    routes: Arc<RouteGuard>,
}

impl<C: ConfigProvider> AppState<C> {
    /// Wrap an already opened guard.
    pub fn new(config: C, routes: RouteGuard) -> Self {
        Self {
            config: Arc::new(config),
            routes: Arc::new(routes),
        }
    }

    /// Open the route file named by the configuration.
    pub fn open(config: C) -> Result<Self> {
        let routes = RouteGuard::open(config.routes_path()?)?;
        Ok(Self::new(config, routes))
    }

    /// Build from handles that are already shared elsewhere.
    pub fn from_arcs(config: Arc<C>, routes: Arc<RouteGuard>) -> Self {
        Self { config, routes }
    }

    /// The configuration.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// The route guard.
    pub fn routes(&self) -> &RouteGuard {
        &self.routes
    }

    /// An owned handle to the route guard, for blocking tasks and threads.
    pub fn routes_arc(&self) -> Arc<RouteGuard> {
        Arc::clone(&self.routes)
    }

    /// Project name from the configuration.
    pub fn project_name(&self) -> &str {
        self.config.project_name()
    }
}

impl<C: ConfigProvider> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            routes: Arc::clone(&self.routes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Clone, Debug)]
    struct TestConfig {
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            "test-project"
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.base.clone())
        }

        fn routes_path(&self) -> Result<PathBuf> {
            Ok(self.base.join("routes.csv"))
        }
    }

    fn test_state(dir: &TempDir) -> AppState<TestConfig> {
        std::fs::write(dir.path().join("routes.csv"), "GRU,BRC,10\n").unwrap();
        AppState::open(TestConfig {
            base: dir.path().to_path_buf(),
        })
        .unwrap()
    }

    #[test]
    fn test_app_state_open() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        assert_eq!(state.project_name(), "test-project");
        assert!(state.routes().snapshot().contains_node("GRU"));
    }

    #[test]
    fn test_app_state_open_missing_routes() {
        let dir = TempDir::new().unwrap();
        let result = AppState::open(TestConfig {
            base: dir.path().to_path_buf(),
        });
        assert!(result.unwrap_err().is_io());
    }

    #[test]
    fn test_app_state_clone_shares_guard() {
        let dir = TempDir::new().unwrap();
        let first = test_state(&dir);
        let second = first.clone();

        assert!(Arc::ptr_eq(&first.routes_arc(), &second.routes_arc()));
        first.routes().register("GRU", "EWR", 30).unwrap();
        assert!(second.routes().snapshot().contains_node("EWR"));
    }

    #[test]
    fn test_app_state_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AppState<TestConfig>>();
    }
}
