// src/email.rs
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EmailConfig;

#[derive(Debug, Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

/// Minimal Resend client for plain-text transactional mail
pub struct ResendMailer {
    client: reqwest::Client,
    base_url: String,
    sender: String,
    api_key: String,
}

impl ResendMailer {
    pub fn new(base_url: String, sender: String, api_key: String, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            sender,
            api_key,
        })
    }

    /// Build from config, reading the API key from RESEND_API_KEY
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let api_key = std::env::var("RESEND_API_KEY")
            .map_err(|_| anyhow::anyhow!("RESEND_API_KEY environment variable not set"))?;

        Self::new(
            config.base_url.clone(),
            config.sender.clone(),
            api_key,
            config.timeout_seconds,
        )
    }

    /// Send a plain-text email, returning the provider's message id
    pub async fn send_text(&self, to: &str, subject: &str, body: &str) -> Result<String> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let request = SendEmailRequest {
            from: &self.sender,
            to: vec![to],
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to call email API")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Email API returned status {}: {}", status, error_text);
        }

        let body: SendEmailResponse = response
            .json()
            .await
            .context("Failed to parse email API response")?;

        info!("Sent email {} to {}", body.id, to);
        Ok(body.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = SendEmailRequest {
            from: "Introlink <notifications@introlink.app>",
            to: vec!["ada@example.com"],
            subject: "Your saved outreach message",
            text: "Hi Bob",
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["to"][0], "ada@example.com");
        assert_eq!(value["text"], "Hi Bob");
    }

    #[test]
    fn test_response_parse() {
        let parsed: SendEmailResponse = serde_json::from_str(r#"{"id": "re_123"}"#).unwrap();
        assert_eq!(parsed.id, "re_123");
    }
}
