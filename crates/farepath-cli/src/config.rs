//! Configuration for the farepath binary.
//!
//! Provides the [`FarepathConfig`] struct that loads from TOML files,
//! environment variables, and defaults using the `confyg` crate.
//!
//! # Loading Priority
//!
//! 1. Explicit `--config <path>` flag
//! 2. `FAREPATH_CONFIG` environment variable
//! 3. XDG default: `~/.config/farepath/config.toml`
//! 4. Built-in defaults

use confyg::{Confygery, env};
use farepath_core::traits::ConfigProvider;
use farepath_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Route file used when neither the config nor `--routes` names one.
pub const DEFAULT_ROUTES_FILE: &str = "routes.csv";

// ============================================================================
// Configuration structs
// ============================================================================

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FarepathConfig {
    /// Project name, used in log output and default paths.
    pub project_name: String,

    /// Base path that a relative routes file is resolved against.
    pub base_path: Option<String>,

    /// Route file configuration.
    pub routes: RoutesConfig,

    /// HTTP server configuration.
    pub server: ServerConfig,
}

/// Route file configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Path to the route record file.
    pub path: Option<String>,
}

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,

    /// Host address to bind to.
    pub host: String,
}

impl ServerConfig {
    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Default implementations
// ============================================================================

impl Default for FarepathConfig {
    fn default() -> Self {
        Self {
            project_name: "farepath".to_string(),
            base_path: None,
            routes: RoutesConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
        }
    }
}

// ============================================================================
// Config loading
// ============================================================================

impl FarepathConfig {
    /// Load configuration from file, environment, and defaults.
    ///
    /// A config path that does not exist is not an error; defaults and the
    /// environment still apply.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder =
            Confygery::new().map_err(|e| Error::config(format!("config init: {e}")))?;

        if let Some(path) = Self::resolve_config_path(config_path) {
            if path.exists() {
                tracing::debug!("Loading config from {}", path.display());
                builder
                    .add_file(&path.to_string_lossy())
                    .map_err(|e| Error::config(format!("config file: {e}")))?;
            }
        }

        let mut env_opts = env::Options::with_top_level("FAREPATH");
        env_opts.add_section("routes");
        env_opts.add_section("server");
        builder
            .add_env(env_opts)
            .map_err(|e| Error::config(format!("config env: {e}")))?;

        let config: Self = builder
            .build()
            .map_err(|e| Error::config(format!("config build: {e}")))?;

        Ok(config)
    }

    /// Resolve the config file path from explicit flag, env var, or XDG default.
    pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(PathBuf::from(path));
        }

        if let Ok(path) = std::env::var("FAREPATH_CONFIG") {
            return Some(PathBuf::from(path));
        }

        Self::default_config_path()
    }

    /// Return the XDG default config path.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("farepath").join("config.toml"))
    }

    /// Serialize this config to a pretty-printed TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}

// ============================================================================
// ConfigProvider implementation
// ============================================================================

impl ConfigProvider for FarepathConfig {
    fn project_name(&self) -> &str {
        &self.project_name
    }

    fn base_path(&self) -> Result<PathBuf> {
        match &self.base_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => std::env::current_dir()
                .map_err(|e| Error::config(format!("Could not determine base path: {e}"))),
        }
    }

    fn routes_path(&self) -> Result<PathBuf> {
        let file = self.routes.path.as_deref().unwrap_or(DEFAULT_ROUTES_FILE);
        let path = PathBuf::from(file);
        if path.is_absolute() {
            Ok(path)
        } else {
            Ok(self.base_path()?.join(path))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
