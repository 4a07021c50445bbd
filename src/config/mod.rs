//! Configuration module for Douban-Roast
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use douban_roast::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("roast.toml")).unwrap();
//! println!("Will fetch at most {} pages", config.source.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FailurePolicy, RoastConfig, SourceConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, read_api_key};
