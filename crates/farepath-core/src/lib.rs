//! Farepath Core: shared types, traits, errors, and utilities.
//!
//! This crate provides the foundational types used across all farepath crates.
//! It has no internal farepath dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`traits`]: Configuration abstraction
//! - [`util`]: Identifier helpers

#![doc = include_str!("../README.md")]

pub mod error;
pub mod traits;
pub mod util;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use traits::ConfigProvider;

pub use util::ids::normalize_id;
