//! Circumflex: layered application configuration and production asset
//! bundling.
//!
//! - [`config`]: key-path store, environment overrides, profile selection
//! - [`asset`]: bundle descriptors, fingerprinting compiler, runtime registry
//! - [`cli`]: the `circumflex` command

pub mod asset;
pub mod cli;
pub mod config;
pub mod logger;
pub mod utils;
