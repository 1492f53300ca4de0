//! Validation and normalization helpers for entity data
//!
//! These utilities serve the collaborators that turn scraped records into
//! registry entities; the scrape pipeline itself only uses the email check
//! for config validation.

use regex::Regex;
use std::sync::OnceLock;

/// Entity types accepted by the registry
const VALID_ENTITY_TYPES: [&str; 4] = ["municipality", "agency", "technical", "test"];

/// An entity candidate assembled from scraped data
#[derive(Debug, Clone)]
pub struct Entity {
    pub entity_id: String,
    pub name: String,
    pub entity_type: String,
    pub email: Option<String>,
    pub org_num: Option<String>,
}

fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid regex")
    })
}

fn entity_id_regex() -> &'static Regex {
    static ENTITY_ID_REGEX: OnceLock<Regex> = OnceLock::new();
    ENTITY_ID_REGEX.get_or_init(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"))
}

/// Checks email format
pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Checks a Norwegian organization number: exactly nine digits
///
/// Only the format is validated. The MOD11 check-digit scheme is
/// deliberately not implemented here, so a well-formed but invalid number
/// passes.
pub fn validate_org_num(org_num: &str) -> bool {
    org_num.len() == 9 && org_num.chars().all(|c| c.is_ascii_digit())
}

/// Validates an entity's structure and content
///
/// # Returns
///
/// * `Ok(())` - The entity is valid
/// * `Err(String)` - Description of the first violation found
pub fn validate_entity(entity: &Entity) -> Result<(), String> {
    if entity.entity_id.is_empty() {
        return Err("Missing required field: entity_id".to_string());
    }
    if entity.name.is_empty() {
        return Err("Missing required field: name".to_string());
    }
    if entity.entity_type.is_empty() {
        return Err("Missing required field: entity_type".to_string());
    }

    if !entity_id_regex().is_match(&entity.entity_id) {
        return Err(format!("Invalid entity_id format: {}", entity.entity_id));
    }

    if !VALID_ENTITY_TYPES.contains(&entity.entity_type.as_str()) {
        return Err(format!(
            "Invalid entity_type: {}. Must be one of {}",
            entity.entity_type,
            VALID_ENTITY_TYPES.join(", ")
        ));
    }

    if let Some(email) = &entity.email {
        if !validate_email(email) {
            return Err(format!("Invalid email format: {}", email));
        }
    }

    if let Some(org_num) = &entity.org_num {
        if !validate_org_num(org_num) {
            return Err(format!(
                "Invalid org_num format: {} (must be 9 digits)",
                org_num
            ));
        }
    }

    Ok(())
}

/// Generates a normalized entity id from a name and optional org number
///
/// The name is lowercased, Norwegian letters are transliterated (å/ä → a,
/// ø → o, æ → ae), and runs of other non-alphanumerics collapse to single
/// hyphens. The org number, when given, becomes a prefix.
pub fn normalize_entity_id(name: &str, org_num: Option<&str>) -> String {
    let mut slug = String::new();
    let mut pending_hyphen = false;

    for c in name.to_lowercase().chars() {
        let mapped: &str = match c {
            'å' | 'ä' => "a",
            'ø' => "o",
            'æ' => "ae",
            c if c.is_ascii_alphanumeric() => {
                if pending_hyphen && !slug.is_empty() {
                    slug.push('-');
                }
                pending_hyphen = false;
                slug.push(c);
                continue;
            }
            _ => {
                pending_hyphen = true;
                continue;
            }
        };

        if pending_hyphen && !slug.is_empty() {
            slug.push('-');
        }
        pending_hyphen = false;
        slug.push_str(mapped);
    }

    match org_num {
        Some(num) => format!("{}-{}", num, slug),
        None => slug,
    }
}
