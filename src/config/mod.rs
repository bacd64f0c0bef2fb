//! Configuration module for megadl.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - The output destination (`--path`)
//! - Validation of the requested run before any network activity

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, DownloadConfig, NetworkConfig};
pub use modes::Destination;
pub use validation::{validate_links, validate_network, validate_run};
