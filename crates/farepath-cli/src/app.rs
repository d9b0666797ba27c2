//! FarepathApp application framework.
//!
//! [`FarepathApp`] resolves the route file, dispatches one-shot commands and
//! supervises the long-running front ends. In `run` mode the HTTP server is
//! a tokio task and the console is a plain thread; the supervisor waits for
//! whichever of them (or a shutdown signal) finishes first.

use crate::cli::{BaseCommand, CliArgs, GraphSubcommand, RunMode};
use crate::config::{FarepathConfig, ServerConfig};
use crate::console::{self, ConsoleEvent};
use crate::state::AppState;
use crate::{config_handlers, route_handlers, server};
use farepath_core::traits::ConfigProvider;
use farepath_core::{Error, Result};
use farepath_graph::RouteGuard;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing_subscriber::EnvFilter;

// ============================================================================
// FarepathApp
// ============================================================================

/// CLI application parameterized over a config provider.
pub struct FarepathApp<C: ConfigProvider> {
    name: String,
    config: Arc<C>,
    server: ServerConfig,
    version: String,
}

impl FarepathApp<FarepathConfig> {
    /// Create from CLI args, loading config from file/env.
    pub fn from_args(name: impl Into<String>, args: &CliArgs) -> Result<Self> {
        let config = FarepathConfig::load(args.config.as_deref())?;
        let server = config.server.clone();
        Ok(Self::new(name, config).with_server(server))
    }
}

impl<C: ConfigProvider> FarepathApp<C> {
    /// Create a new application with the default server settings.
    pub fn new(name: impl Into<String>, config: C) -> Self {
        Self {
            name: name.into(),
            config: Arc::new(config),
            server: ServerConfig::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Override the version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Override the HTTP bind settings.
    pub fn with_server(mut self, server: ServerConfig) -> Self {
        self.server = server;
        self
    }

    /// Get a reference to the config provider.
    pub fn config(&self) -> &C {
        &self.config
    }

    /// Initialise tracing-based logging.
    ///
    /// Uses `RUST_LOG` env var if set, otherwise defaults based on verbosity flags.
    pub fn init_logging(&self, verbose: bool, quiet: bool) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        };

        // A subscriber may already be installed (e.g. in tests).
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Resolve the route file.
    ///
    /// An explicit `--routes` file is used when it exists. Otherwise a
    /// warning is logged and the configured file is used instead.
    pub fn routes_path(&self, explicit: Option<&str>) -> Result<PathBuf> {
        if let Some(raw) = explicit {
            let path = PathBuf::from(raw);
            if path.exists() {
                return Ok(path);
            }
            let fallback = self.config.routes_path()?;
            tracing::warn!(
                "Routes file '{}' not found, using '{}'",
                path.display(),
                fallback.display()
            );
            return Ok(fallback);
        }
        self.config.routes_path()
    }

    /// Run the CLI with the given arguments.
    pub async fn run(&self, args: CliArgs) -> Result<()> {
        self.init_logging(args.verbose, args.quiet);

        match args.command {
            Some(BaseCommand::Version) => {
                println!("{} {}", self.name, self.version);
                Ok(())
            }
            Some(BaseCommand::Config(config_cmd)) => {
                config_handlers::handle_config_command(args.config.as_deref(), config_cmd.command)
            }
            Some(BaseCommand::Route { from, to }) => {
                let path = self.routes_path(args.routes.as_deref())?;
                route_handlers::handle_route(&path, &from, &to).await
            }
            Some(BaseCommand::Register { from, to, price }) => {
                let path = self.routes_path(args.routes.as_deref())?;
                route_handlers::handle_register(&path, &from, &to, &price).await
            }
            Some(BaseCommand::Graph(graph_cmd)) => match graph_cmd.command {
                GraphSubcommand::Stats { json } => {
                    let path = self.routes_path(args.routes.as_deref())?;
                    route_handlers::handle_stats(&path, json).await
                }
            },
            Some(BaseCommand::Run { web, cli, port }) => {
                self.serve(args.routes.as_deref(), RunMode::from_flags(web, cli), port)
                    .await
            }
            None => self.serve(args.routes.as_deref(), RunMode::default(), None).await,
        }
    }

    /// Load the route file and run the selected front ends until they stop.
    pub async fn serve(&self, routes: Option<&str>, mode: RunMode, port: Option<u16>) -> Result<()> {
        let path = self.routes_path(routes)?;
        let guard = RouteGuard::open(&path)?;
        let state = AppState::from_arcs(Arc::clone(&self.config), Arc::new(guard));

        let mut server = self.server.clone();
        if let Some(port) = port {
            server.port = port;
        }

        tracing::info!(
            project = state.project_name(),
            web = mode.web,
            console = mode.console,
            "Starting {} {}",
            self.name,
            self.version
        );

        let addr = mode.web.then(|| server.bind_addr());
        let console = if mode.console {
            Some(console::spawn(state.routes_arc())?)
        } else {
            None
        };
        supervise(state, addr, console, shutdown_signal()).await
    }
}

// ============================================================================
// Supervisor
// ============================================================================

enum Outcome {
    Signal,
    Console(ConsoleEvent),
    Server(Result<()>),
}

/// Serve HTTP on `addr` (if any) alongside the `console` session (if any).
///
/// `signal` stops everything. When the console ends the process keeps
/// serving HTTP if the server is running, and exits otherwise. A server that
/// stops on its own ends the run with its result.
async fn supervise<C, S>(
    state: AppState<C>,
    addr: Option<String>,
    mut console: Option<mpsc::Receiver<ConsoleEvent>>,
    signal: S,
) -> Result<()>
where
    C: ConfigProvider,
    S: Future<Output = ()>,
{
    let (stop_tx, stop_rx) = watch::channel(false);

    let mut server = addr.map(|addr| {
        let mut stop = stop_rx;
        let shutdown = async move {
            let _ = stop.wait_for(|stopped| *stopped).await;
        };
        tokio::spawn(server::serve(state, addr, shutdown))
    });

    tokio::pin!(signal);
    loop {
        let outcome = tokio::select! {
            () = &mut signal => Outcome::Signal,
            event = next_console_event(&mut console) => Outcome::Console(event),
            result = join_server(&mut server) => Outcome::Server(result),
        };

        match outcome {
            Outcome::Signal => {
                tracing::info!("Received exit signal, shutting down");
                break;
            }
            Outcome::Console(event) => {
                console = None;
                if let ConsoleEvent::Failed(ref reason) = event {
                    tracing::warn!(%reason, "console stopped");
                }
                if server.is_none() {
                    break;
                }
                tracing::info!("Console session ended; HTTP API still running");
            }
            Outcome::Server(result) => {
                server = None;
                result?;
                break;
            }
        }
    }

    let _ = stop_tx.send(true);
    if let Some(handle) = server {
        handle.await.map_err(join_error)??;
    }
    Ok(())
}

async fn next_console_event(console: &mut Option<mpsc::Receiver<ConsoleEvent>>) -> ConsoleEvent {
    match console {
        Some(rx) => rx.recv().await.unwrap_or(ConsoleEvent::InputClosed),
        None => std::future::pending().await,
    }
}

async fn join_server(server: &mut Option<JoinHandle<Result<()>>>) -> Result<()> {
    match server {
        Some(handle) => handle.await.map_err(join_error)?,
        None => std::future::pending().await,
    }
}

fn join_error(err: JoinError) -> Error {
    Error::io(std::io::Error::other(err))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(?err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(?err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::oneshot;

    #[derive(Clone)]
    struct TestConfig {
        base: PathBuf,
    }

    impl ConfigProvider for TestConfig {
        fn project_name(&self) -> &str {
            "test-app"
        }

        fn base_path(&self) -> Result<PathBuf> {
            Ok(self.base.clone())
        }

        fn routes_path(&self) -> Result<PathBuf> {
            Ok(self.base.join("routes.csv"))
        }
    }

    fn test_app(dir: &Path) -> FarepathApp<TestConfig> {
        std::fs::write(dir.join("routes.csv"), "GRU,BRC,10\nBRC,SCL,5\n").unwrap();
        FarepathApp::new(
            "farepath",
            TestConfig {
                base: dir.to_path_buf(),
            },
        )
    }

    #[test]
    fn test_farepath_app_new() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        assert_eq!(app.name, "farepath");
        assert_eq!(app.config().project_name(), "test-app");
        assert_eq!(app.server, ServerConfig::default());
    }

    #[test]
    fn test_farepath_app_with_version_and_server() {
        let dir = TempDir::new().unwrap();
        let server = ServerConfig {
            port: 8080,
            host: "127.0.0.1".into(),
        };
        let app = test_app(dir.path())
            .with_version("1.2.3")
            .with_server(server.clone());
        assert_eq!(app.version, "1.2.3");
        assert_eq!(app.server, server);
    }

    #[test]
    fn test_routes_path_explicit_existing() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let other = dir.path().join("other.csv");
        std::fs::write(&other, "A,B,1\n").unwrap();

        let path = app.routes_path(Some(other.to_str().unwrap())).unwrap();
        assert_eq!(path, other);
    }

    #[test]
    fn test_routes_path_explicit_missing_falls_back() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let missing = dir.path().join("missing.csv");

        let path = app.routes_path(Some(missing.to_str().unwrap())).unwrap();
        assert_eq!(path, dir.path().join("routes.csv"));
    }

    #[test]
    fn test_routes_path_default() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        assert_eq!(app.routes_path(None).unwrap(), dir.path().join("routes.csv"));
    }

    #[tokio::test]
    async fn test_run_version_command() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path()).with_version("0.1.0");
        let args = CliArgs::parse_from(["farepath", "version"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_route_command() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let args = CliArgs::parse_from(["farepath", "route", "GRU", "SCL"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_run_register_command_uses_routes_flag() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let other = dir.path().join("other.csv");
        std::fs::write(&other, "A,B,1\n").unwrap();

        let args = CliArgs::parse_from([
            "farepath",
            "--routes",
            other.to_str().unwrap(),
            "register",
            "B",
            "C",
            "2",
        ]);
        app.run(args).await.unwrap();

        assert_eq!(std::fs::read_to_string(&other).unwrap(), "A,B,1\nB,C,2\n");
        let default = std::fs::read_to_string(dir.path().join("routes.csv")).unwrap();
        assert!(!default.contains("B,C,2"));
    }

    #[tokio::test]
    async fn test_run_graph_stats_command() {
        let dir = TempDir::new().unwrap();
        let app = test_app(dir.path());
        let args = CliArgs::parse_from(["farepath", "graph", "stats"]);
        assert!(app.run(args).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_missing_routes_file() {
        let dir = TempDir::new().unwrap();
        let app = FarepathApp::new(
            "farepath",
            TestConfig {
                base: dir.path().to_path_buf(),
            },
        );
        let err = app
            .serve(None, RunMode::from_flags(true, false), Some(0))
            .await
            .unwrap_err();
        assert!(err.is_io());
        assert!(err.to_string().contains("routes.csv"));
    }

    fn test_state(dir: &Path) -> AppState<TestConfig> {
        let app = test_app(dir);
        AppState::open(app.config().clone()).unwrap()
    }

    fn free_addr() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    }

    async fn get_health(addr: &str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let mut stream = None;
        for _ in 0..100 {
            if let Ok(s) = tokio::net::TcpStream::connect(addr).await {
                stream = Some(s);
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let mut stream = stream.unwrap_or_else(|| panic!("nothing listening on {addr}"));

        stream
            .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_supervise_returns_server_error() {
        let dir = TempDir::new().unwrap();
        let err = supervise(
            test_state(dir.path()),
            Some("not-an-address".to_string()),
            None,
            std::future::pending(),
        )
        .await
        .unwrap_err();
        assert!(err.is_io());
    }

    #[tokio::test]
    async fn test_supervise_console_only_exits_when_console_ends() {
        for event in [
            ConsoleEvent::Exited,
            ConsoleEvent::InputClosed,
            ConsoleEvent::Failed("broken pipe".into()),
        ] {
            let dir = TempDir::new().unwrap();
            let (tx, rx) = mpsc::channel(1);
            tx.send(event).await.unwrap();

            supervise(test_state(dir.path()), None, Some(rx), std::future::pending())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_supervise_console_only_exits_when_thread_is_gone() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel::<ConsoleEvent>(1);
        drop(tx);

        supervise(test_state(dir.path()), None, Some(rx), std::future::pending())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_supervise_signal_stops_console_only() {
        let dir = TempDir::new().unwrap();
        let (_tx, rx) = mpsc::channel::<ConsoleEvent>(1);

        supervise(test_state(dir.path()), None, Some(rx), async {})
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_supervise_keeps_serving_after_console_ends() {
        let dir = TempDir::new().unwrap();
        let addr = free_addr();
        let (console_tx, console_rx) = mpsc::channel(1);
        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let signal = async move {
            let _ = stop_rx.await;
        };

        let run = tokio::spawn(supervise(
            test_state(dir.path()),
            Some(addr.clone()),
            Some(console_rx),
            signal,
        ));

        console_tx.send(ConsoleEvent::Exited).await.unwrap();
        // The supervisor drops the receiver once it has handled the event.
        console_tx.closed().await;

        let response = get_health(&addr).await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.contains("healthy"));
        assert!(!run.is_finished());

        stop_tx.send(()).unwrap();
        run.await.unwrap().unwrap();
    }
}
