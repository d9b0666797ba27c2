//! Core traits for farepath.
//!
//! The primary trait is [`ConfigProvider`], which abstracts where the
//! route file lives so the graph layer never depends on the CLI's
//! concrete configuration type.

use std::path::PathBuf;

use crate::Result;

/// Trait for application configuration.
///
/// # Bounds
///
/// - `Send + Sync`: Configuration must be shareable across threads
/// - `Clone`: Configuration can be duplicated for passing to subsystems
/// - `'static`: Configuration lifetime is not borrowed
///
/// # Example
///
/// ```
/// use std::path::PathBuf;
/// use farepath_core::traits::ConfigProvider;
/// use farepath_core::Result;
///
/// #[derive(Clone)]
/// struct AirlineConfig {
///     data_dir: PathBuf,
/// }
///
/// impl ConfigProvider for AirlineConfig {
///     fn project_name(&self) -> &str {
///         "airline"
///     }
///
///     fn base_path(&self) -> Result<PathBuf> {
///         Ok(self.data_dir.clone())
///     }
///
///     fn routes_path(&self) -> Result<PathBuf> {
///         Ok(self.data_dir.join("routes.csv"))
///     }
/// }
/// ```
pub trait ConfigProvider: Send + Sync + Clone + 'static {
    /// The project name, used in log output and default paths.
    fn project_name(&self) -> &str;

    /// Base path for relative data files.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be determined.
    fn base_path(&self) -> Result<PathBuf>;

    /// Path of the append-only route record file.
    ///
    /// # Errors
    ///
    /// Returns an error if the path cannot be resolved.
    fn routes_path(&self) -> Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct TestConfig {
        name: String,
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            &self.name
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.base.clone())
        }

        fn routes_path(&self) -> Result<PathBuf> {
            Ok(self.base.join("routes.csv"))
        }
    }

    #[test]
    fn test_config_provider_routes_path() {
        let config = TestConfig {
            name: "test".into(),
            base: PathBuf::from("/data"),
        };
        assert_eq!(
            config.routes_path().unwrap(),
            PathBuf::from("/data/routes.csv")
        );
        assert_eq!(config.project_name(), "test");
    }

    #[test]
    fn test_config_provider_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TestConfig>();
    }
}
