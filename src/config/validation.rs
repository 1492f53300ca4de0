use crate::config::registry::Registry;
use crate::config::types::{ClientConfig, TargetConfig};
use crate::validate::validate_email;
use crate::ConfigError;
use url::Url;

/// Marker that must appear exactly once in each detail path template
const CASE_ID_MARKER: &str = "{case_id}";

/// Validates a whole registry: client settings plus every target
pub fn validate(registry: &Registry) -> Result<(), ConfigError> {
    validate_client_config(registry.client())?;
    for (name, target) in registry.iter() {
        validate_target(name, target)?;
    }
    Ok(())
}

/// Validates one target entry
pub fn validate_target(name: &str, target: &TargetConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&target.base_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid base-url for '{}': {}", name, e))
    })?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "base-url for '{}' must use http or https, got '{}'",
            name,
            base.scheme()
        )));
    }

    if !target.search_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "search-path for '{}' must start with '/', got '{}'",
            name, target.search_path
        )));
    }

    if !target.detail_path_template.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "detail-path-template for '{}' must start with '/', got '{}'",
            name, target.detail_path_template
        )));
    }

    if target.detail_path_template.matches(CASE_ID_MARKER).count() != 1 {
        return Err(ConfigError::Validation(format!(
            "detail-path-template for '{}' must contain exactly one {} marker",
            name, CASE_ID_MARKER
        )));
    }

    if target.requests_per_minute < 1 {
        return Err(ConfigError::Validation(format!(
            "requests-per-minute for '{}' must be >= 1, got {}",
            name, target.requests_per_minute
        )));
    }

    Ok(())
}

/// Validates the shared client settings
fn validate_client_config(config: &ClientConfig) -> Result<(), ConfigError> {
    if config.scraper_name.is_empty() {
        return Err(ConfigError::Validation(
            "scraper-name cannot be empty".to_string(),
        ));
    }

    if !config
        .scraper_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "scraper-name must contain only alphanumeric characters and hyphens, got '{}'",
            config.scraper_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;

    if !validate_email(&config.contact_email) {
        return Err(ConfigError::Validation(format!(
            "Invalid contact-email: '{}'",
            config.contact_email
        )));
    }

    if config.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "timeout-seconds must be >= 1".to_string(),
        ));
    }

    Ok(())
}
