//! CLI argument parsing and command definitions.
//!
//! With no subcommand `farepath` behaves like `farepath run`: it serves the
//! HTTP API and opens the interactive console on the same route file.

use clap::{Parser, Subcommand};

// ============================================================================
// CLI argument types
// ============================================================================

/// Top-level CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "farepath", author, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file.
    #[arg(short, long, env = "FAREPATH_CONFIG")]
    pub config: Option<String>,

    /// Route record file (falls back to the configured file if missing).
    #[arg(short, long)]
    pub routes: Option<String>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<BaseCommand>,
}

/// Commands understood by the `farepath` binary.
#[derive(Subcommand, Debug)]
pub enum BaseCommand {
    /// Serve the HTTP API and/or the interactive console.
    Run {
        /// Start the HTTP API.
        #[arg(long)]
        web: bool,

        /// Start the interactive console.
        #[arg(long)]
        cli: bool,

        /// Port to listen on (overrides the configured port).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the cheapest route between two locations.
    Route {
        /// Origin location.
        from: String,

        /// Destination location.
        to: String,
    },

    /// Register a new connection.
    Register {
        /// Origin location.
        from: String,

        /// Destination location.
        to: String,

        /// Non-negative integer price.
        #[arg(allow_hyphen_values = true)]
        price: String,
    },

    /// Print version information.
    Version,

    /// Graph operations.
    Graph(GraphCommand),

    /// Configuration operations.
    Config(ConfigCommand),
}

/// Which front ends `run` starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunMode {
    /// HTTP API.
    pub web: bool,
    /// Interactive console.
    pub console: bool,
}

impl RunMode {
    /// Resolve the `--web`/`--cli` flags. Neither flag means both.
    pub fn from_flags(web: bool, cli: bool) -> Self {
        if !web && !cli {
            return Self::default();
        }
        Self { web, console: cli }
    }
}

impl Default for RunMode {
    fn default() -> Self {
        Self {
            web: true,
            console: true,
        }
    }
}

/// Config-specific subcommands.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Config subcommand to execute.
    #[command(subcommand)]
    pub command: ConfigAction,
}

/// Available config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path.
    Path,

    /// Create a default configuration file.
    Init {
        /// Output file path (defaults to XDG config path).
        #[arg(short, long)]
        file: Option<String>,

        /// Overwrite existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Graph-specific subcommands.
#[derive(Parser, Debug)]
pub struct GraphCommand {
    /// Graph subcommand to execute.
    #[command(subcommand)]
    pub command: GraphSubcommand,
}

/// Available graph subcommands.
#[derive(Subcommand, Debug)]
pub enum GraphSubcommand {
    /// Show graph statistics.
    Stats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================
