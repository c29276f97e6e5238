// src/ai/summary.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::gemini::GeminiClient;
use crate::store::GuestProfile;

/// Narrative summary derived from a guest's background text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedSummary {
    pub experience_highlights: String,
    #[serde(default)]
    pub key_skills: Vec<String>,
    pub value_proposition: String,
}

impl GeneratedSummary {
    /// Skills flattened for storage as a single text column
    pub fn key_skills_text(&self) -> String {
        self.key_skills.join(", ")
    }
}

pub async fn generate_summary(
    client: &GeminiClient,
    profile: &GuestProfile,
) -> Result<GeneratedSummary> {
    let prompt = summary_prompt(profile);
    client.generate_json(&prompt).await
}

fn summary_prompt(profile: &GuestProfile) -> String {
    let name = profile.first_name.as_deref().unwrap_or("The candidate");
    let role = profile.current_role.as_deref().unwrap_or("unknown role");
    let company = profile.current_company.as_deref().unwrap_or("unknown company");

    format!(
        "Summarize this job seeker's professional background for use in \
         networking outreach. Respond with a single JSON object only, keys: \
         experience_highlights (string, 2-3 sentences), key_skills (array of \
         short strings), value_proposition (string, one sentence).\n\n\
         Name: {name}\nCurrent role: {role} at {company}\n\nBackground:\n{}",
        profile.background_input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_skills_text() {
        let summary = GeneratedSummary {
            experience_highlights: "Led platform teams.".to_string(),
            key_skills: vec!["Rust".to_string(), "Distributed systems".to_string()],
            value_proposition: "Ships reliable infrastructure.".to_string(),
        };
        assert_eq!(summary.key_skills_text(), "Rust, Distributed systems");
    }

    #[test]
    fn test_parse_tolerates_missing_skills() {
        let raw = r#"{"experience_highlights": "x", "value_proposition": "y"}"#;
        let summary: GeneratedSummary = serde_json::from_str(raw).unwrap();
        assert!(summary.key_skills.is_empty());
    }
}
