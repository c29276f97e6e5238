// src/utils.rs
use anyhow::Result;

/// Validate that a required request field is present and non-blank
pub fn require_field<'a>(value: &'a str, name: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("Missing required field: {}", name);
    }
    Ok(trimmed)
}

/// Trim an optional free-text field, mapping blank to None
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Display name for a contact, used in duplicate checks and CSV export
pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name.map(str::trim).filter(|s| !s.is_empty()) {
        Some(last) => format!("{} {}", first_name.trim(), last),
        None => first_name.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field() {
        assert_eq!(require_field("abc", "userId").unwrap(), "abc");
        assert_eq!(require_field("  abc  ", "userId").unwrap(), "abc");
        assert!(require_field("", "userId").is_err());
        assert!(require_field("   ", "sessionId").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some("Acme")), Some("Acme".to_string()));
        assert_eq!(non_blank(Some("  Acme  ")), Some("Acme".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Ada", Some("Lovelace")), "Ada Lovelace");
        assert_eq!(full_name("Ada", None), "Ada");
        assert_eq!(full_name("Ada", Some("  ")), "Ada");
    }
}
