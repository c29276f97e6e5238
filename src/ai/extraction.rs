// src/ai/extraction.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::gemini::GeminiClient;
use crate::utils::non_blank;

/// Fields pulled out of pasted background text or a pasted bio.
/// Every field is optional; the model returns null for what it cannot find.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedPerson {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub current_company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl ExtractedPerson {
    /// Trim whitespace and collapse blank strings to None
    pub fn normalized(self) -> Self {
        Self {
            first_name: non_blank(self.first_name.as_deref()),
            last_name: non_blank(self.last_name.as_deref()),
            current_role: non_blank(self.current_role.as_deref()),
            current_company: non_blank(self.current_company.as_deref()),
            location: non_blank(self.location.as_deref()),
        }
    }
}

/// Extract the guest's own profile fields from pasted background text
pub async fn extract_profile(client: &GeminiClient, background_input: &str) -> Result<ExtractedPerson> {
    let prompt = extraction_prompt("the person's own professional background", background_input);
    let extracted: ExtractedPerson = client.generate_json(&prompt).await?;
    Ok(extracted.normalized())
}

/// Extract a third party's fields from a pasted LinkedIn-style bio
pub async fn extract_contact(client: &GeminiClient, bio_input: &str) -> Result<ExtractedPerson> {
    let prompt = extraction_prompt("a third party's LinkedIn-style bio", bio_input);
    let extracted: ExtractedPerson = client.generate_json(&prompt).await?;
    Ok(extracted.normalized())
}

fn extraction_prompt(kind: &str, input: &str) -> String {
    format!(
        "You are given {kind}. Extract the following fields and respond with a \
         single JSON object only, no markdown, no commentary. Use null for any \
         field the text does not state.\n\
         Keys: first_name, last_name, current_role, current_company, location.\n\n\
         Text:\n{input}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_nulls_and_missing_fields() {
        let raw = r#"{"first_name": "Ada", "last_name": null, "current_company": "Acme"}"#;
        let person: ExtractedPerson = serde_json::from_str(raw).unwrap();
        assert_eq!(person.first_name.as_deref(), Some("Ada"));
        assert_eq!(person.last_name, None);
        assert_eq!(person.current_role, None);
        assert_eq!(person.current_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_normalized_collapses_blanks() {
        let person = ExtractedPerson {
            first_name: Some("  Ada ".to_string()),
            last_name: Some("   ".to_string()),
            current_role: None,
            current_company: Some("Acme".to_string()),
            location: Some("".to_string()),
        }
        .normalized();

        assert_eq!(person.first_name.as_deref(), Some("Ada"));
        assert_eq!(person.last_name, None);
        assert_eq!(person.location, None);
        assert_eq!(person.current_company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_prompt_carries_input_and_keys() {
        let prompt = extraction_prompt("a bio", "Bob leads platform at Acme");
        assert!(prompt.contains("Bob leads platform at Acme"));
        assert!(prompt.contains("current_company"));
    }
}
