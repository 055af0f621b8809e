//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every field has a compiled-in default matching the tuning the
//! source site is known to tolerate, so a config file is optional.

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AuthConfig, Config, OutputConfig, PacingConfig, SiteConfig, SolverConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
