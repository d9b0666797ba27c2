//! Command line, HTTP API and interactive console for farepath.
//!
//! # Key Abstractions
//!
//! - [`FarepathApp`](app::FarepathApp): CLI application parameterized over a config provider
//! - [`AppState`](state::AppState): config plus the shared route guard, handed to the HTTP layer
//! - [`console`]: blocking console loop run on its own thread

#![doc = include_str!("../README.md")]

pub mod app;
pub mod cli;
pub mod config;
pub mod config_handlers;
pub mod console;
pub mod route_handlers;
pub mod server;
pub mod state;

pub use app::FarepathApp;
pub use cli::CliArgs;
pub use config::FarepathConfig;
pub use state::AppState;
