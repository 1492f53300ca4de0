//! Configuration module for the byggesak scraper
//!
//! Targets are resolved from the built-in registry of known municipal
//! portals, or loaded from a TOML targets file. Either way a target passes
//! validation before any network activity happens on its behalf.
//!
//! # Example
//!
//! ```no_run
//! use byggesak_scraper::config::load_targets;
//! use std::path::Path;
//!
//! let registry = load_targets(Path::new("targets.toml")).unwrap();
//! let target = registry.lookup("oslo").unwrap();
//! println!("Portal: {}", target.base_url);
//! ```

mod parser;
mod registry;
mod types;
pub(crate) mod validation;

// Re-export types
pub use registry::Registry;
pub use types::{ClientConfig, TargetConfig, TargetsFile};

// Re-export parser functions
pub use parser::{compute_targets_hash, load_targets, load_targets_with_hash};

// Re-export validation entry points
pub use validation::{validate, validate_target};
