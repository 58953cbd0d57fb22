//! Gasket Core - Foundational types for the gasket visualizer
//!
//! This crate provides the types that all other gasket crates depend on:
//! - `Axis`, `Color` - Shared value types
//! - `GasketConfig` - Layered TOML configuration
//! - `GasketRng` - Small deterministic PRNG for jitter and recoloring
//! - Error types and Result alias

mod config;
mod error;
mod rng;
mod types;

pub use config::{
    BounceConfig, BounceFile, ConfigFile, GasketConfig, WindowConfig, WindowFile,
    MAX_SUBDIVISION_DEPTH,
};
pub use error::{GasketError, Result};
pub use rng::GasketRng;
pub use types::{Axis, Color};
