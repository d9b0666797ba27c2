//! Utility modules.
//!
//! # Modules
//!
//! - [`ids`]: Route identifier normalization

pub mod ids;
