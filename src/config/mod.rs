//! Configuration module for Sitemap-Primer
//!
//! This module handles loading the optional TOML configuration file, merging it
//! with command-line overrides, and validating the result into an immutable
//! [`CrawlConfig`].
//!
//! # Example
//!
//! ```no_run
//! use sitemap_primer::config::{load_config, resolve, Overrides};
//! use std::path::Path;
//!
//! let file = load_config(Path::new("primer.toml")).unwrap();
//! let config = resolve(file, Overrides::default()).unwrap();
//! println!("Priming from {}", config.sitemap);
//! ```

mod parser;
mod resolve;
mod types;
mod validation;

// Re-export types
pub use types::{ConfigFile, CrawlConfig, LocalCacheConfig, LocalSection};

// Re-export parser and resolution functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use resolve::{resolve, Overrides};
pub use validation::validate;
