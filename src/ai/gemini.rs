// src/ai/gemini.rs
//! Thin client for the Gemini generateContent API. Prompts in, text out;
//! JSON-shaped responses are recovered with a regex fallback because the
//! model does not always honor "respond with JSON only".

use anyhow::{Context, Result};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::GeminiConfig;

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

pub fn generate_content_url(base_url: &str, model: &str, api_key: &str) -> String {
    format!(
        "{}/models/{}:generateContent?key={}",
        base_url.trim_end_matches('/'),
        model,
        api_key
    )
}

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: String, model: String, api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            model,
            api_key,
        })
    }

    /// Build from config, reading the API key from GEMINI_API_KEY
    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY environment variable not set"))?;

        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            api_key,
            config.timeout_seconds,
        )
    }

    /// Single-shot prompt, concatenated text of the first candidate back
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let url = generate_content_url(&self.base_url, &self.model, &self.api_key);
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        info!("Calling Gemini model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to call Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Gemini API returned status {}: {}", status, error_text);
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let text = collect_candidate_text(&body);
        if text.trim().is_empty() {
            anyhow::bail!("Gemini response contained no text");
        }

        Ok(text)
    }

    /// Prompt expecting a single JSON object, deserialized into T
    pub async fn generate_json<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
        let text = self.generate_text(prompt).await?;
        let value = extract_json_object(&text)?;
        serde_json::from_value(value).context("Model output did not match the expected shape")
    }
}

fn collect_candidate_text(response: &GenerateContentResponse) -> String {
    let mut text = String::new();
    if let Some(candidate) = response.candidates.first() {
        if let Some(content) = &candidate.content {
            for part in &content.parts {
                if let Some(part_text) = &part.text {
                    text.push_str(part_text);
                }
            }
        }
    }
    text
}

/// Recover a JSON object from free-form model output. Tries a straight
/// parse first, then a fenced ```json block, then the outermost braces.
pub fn extract_json_object(text: &str) -> Result<serde_json::Value> {
    let trimmed = text.trim();

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if value.is_object() {
            return Ok(value);
        }
    }

    let fence = Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```")
        .context("Invalid fence pattern")?;
    if let Some(captures) = fence.captures(trimmed) {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&captures[1]) {
            if value.is_object() {
                return Ok(value);
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&trimmed[start..=end]) {
                if value.is_object() {
                    return Ok(value);
                }
            }
        }
    }

    anyhow::bail!("No JSON object found in model output")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_content_url() {
        assert_eq!(
            generate_content_url("https://api.example.com/v1beta/", "gemini-1.5-flash", "k"),
            "https://api.example.com/v1beta/models/gemini-1.5-flash:generateContent?key=k"
        );
    }

    #[test]
    fn test_collect_candidate_text() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello "}, {"text": "world"}]}}
            ]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(collect_candidate_text(&response), "Hello world");
    }

    #[test]
    fn test_collect_candidate_text_empty() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(collect_candidate_text(&response), "");
    }

    #[test]
    fn test_extract_json_object_plain() {
        let value = extract_json_object(r#"{"first_name": "Ada"}"#).unwrap();
        assert_eq!(value["first_name"], "Ada");
    }

    #[test]
    fn test_extract_json_object_fenced() {
        let text = "Here you go:\n```json\n{\"first_name\": \"Ada\"}\n```\n";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["first_name"], "Ada");
    }

    #[test]
    fn test_extract_json_object_prose_wrapped() {
        let text = "Sure! The extracted fields are {\"first_name\": \"Ada\", \"location\": null} as requested.";
        let value = extract_json_object(text).unwrap();
        assert_eq!(value["first_name"], "Ada");
        assert!(value["location"].is_null());
    }

    #[test]
    fn test_extract_json_object_rejects_garbage() {
        assert!(extract_json_object("no json here").is_err());
        assert!(extract_json_object("[1, 2, 3]").is_err());
        assert!(extract_json_object("").is_err());
    }
}
