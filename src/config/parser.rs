use crate::config::registry::Registry;
use crate::config::types::TargetsFile;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and validates a targets file from the given path
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use byggesak_scraper::config::load_targets;
///
/// let registry = load_targets(Path::new("targets.toml")).unwrap();
/// let target = registry.lookup("oslo").unwrap();
/// println!("Search endpoint: {}{}", target.base_url, target.search_path);
/// ```
pub fn load_targets(path: &Path) -> Result<Registry, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let file: TargetsFile = toml::from_str(&content)?;

    let registry = Registry::new(file.targets, file.client);
    validate(&registry)?;

    Ok(registry)
}

/// Computes a SHA-256 hash of the targets file content
///
/// Used to detect configuration drift between runs; the hash is logged at
/// startup so exported records can be traced back to the exact target
/// definitions that produced them.
pub fn compute_targets_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Loads a targets file and returns both the registry and its hash
pub fn load_targets_with_hash(path: &Path) -> Result<(Registry, String), ConfigError> {
    let registry = load_targets(path)?;
    let hash = compute_targets_hash(path)?;
    Ok((registry, hash))
}
