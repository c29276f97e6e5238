// src/ai/messages.rs
use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::gemini::GeminiClient;
use crate::store::{GuestContact, GuestProfile};

pub const VARIANT_COUNT: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageVariant {
    pub version_name: String,
    pub message_text: String,
}

#[derive(Debug, Deserialize)]
struct VariantsPayload {
    #[serde(default)]
    versions: Vec<RawVariant>,
}

#[derive(Debug, Deserialize)]
struct RawVariant {
    #[serde(default)]
    message_text: Option<String>,
}

/// Generate up to three outreach drafts for a contact, named
/// "Version 1".."Version 3" regardless of what the model calls them.
pub async fn generate_outreach_variants(
    client: &GeminiClient,
    profile: &GuestProfile,
    contact: &GuestContact,
) -> Result<Vec<MessageVariant>> {
    let prompt = outreach_prompt(profile, contact);
    let payload: VariantsPayload = client.generate_json(&prompt).await?;
    normalize_variants(payload)
}

fn normalize_variants(payload: VariantsPayload) -> Result<Vec<MessageVariant>> {
    let variants: Vec<MessageVariant> = payload
        .versions
        .into_iter()
        .filter_map(|raw| raw.message_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .take(VARIANT_COUNT)
        .enumerate()
        .map(|(index, message_text)| MessageVariant {
            version_name: format!("Version {}", index + 1),
            message_text,
        })
        .collect();

    if variants.is_empty() {
        anyhow::bail!("Model returned no usable message versions");
    }

    Ok(variants)
}

fn outreach_prompt(profile: &GuestProfile, contact: &GuestContact) -> String {
    let sender = profile.first_name.as_deref().unwrap_or("the sender");
    let sender_role = profile.current_role.as_deref().unwrap_or("a professional");
    let recipient_company = contact.current_company.as_deref().unwrap_or("their company");

    format!(
        "Write {VARIANT_COUNT} short LinkedIn outreach messages from {sender} \
         ({sender_role}) to {} at {recipient_company}. Vary the tone across \
         versions: direct, warm, curious. Respond with a single JSON object \
         only: {{\"versions\": [{{\"message_text\": \"...\"}}]}}.\n\n\
         Sender background:\n{}\n\nRecipient bio:\n{}",
        contact.first_name, profile.background_input, contact.bio_input
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(texts: &[&str]) -> VariantsPayload {
        VariantsPayload {
            versions: texts
                .iter()
                .map(|t| RawVariant {
                    message_text: Some(t.to_string()),
                })
                .collect(),
        }
    }

    #[test]
    fn test_normalize_renames_and_caps_at_three() {
        let variants = normalize_variants(raw(&["a", "b", "c", "d"])).unwrap();
        assert_eq!(variants.len(), 3);
        assert_eq!(variants[0].version_name, "Version 1");
        assert_eq!(variants[2].version_name, "Version 3");
        assert_eq!(variants[2].message_text, "c");
    }

    #[test]
    fn test_normalize_drops_blank_texts() {
        let variants = normalize_variants(raw(&["  ", "Hi Bob"])).unwrap();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].version_name, "Version 1");
        assert_eq!(variants[0].message_text, "Hi Bob");
    }

    #[test]
    fn test_normalize_rejects_empty_payload() {
        assert!(normalize_variants(VariantsPayload { versions: vec![] }).is_err());
    }
}
