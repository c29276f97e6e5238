// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub allowed_origins: Vec<String>,
    pub gemini: GeminiConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    pub base_url: String,
    pub sender: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: AppConfig,
    production: AppConfig,
}

impl AppConfig {
    /// Load configuration based on environment
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        Self::load_from_file(&environment)
    }

    fn get_environment() -> String {
        std::env::var("INTROLINK_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(environment: &str) -> Result<Self> {
        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let config_content =
            std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;

        let config_file: ConfigFile =
            serde_yaml::from_str(&config_content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(Self {
            database_path: Self::resolve_path(&env_config.database_path)?,
            ..env_config
        })
    }

    fn resolve_path(path: &PathBuf) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.clone())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(db_parent).await.with_context(|| {
                format!(
                    "Failed to create database directory: {}",
                    db_parent.display()
                )
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_file() {
        let yaml = r#"
local:
  database_path: data/test.db
  allowed_origins:
    - http://localhost:5173
  gemini:
    base_url: https://generativelanguage.googleapis.com/v1beta
    model: gemini-1.5-flash
    timeout_seconds: 60
  email:
    base_url: https://api.resend.com
    sender: Test <test@example.com>
    timeout_seconds: 30
production:
  database_path: /app/data/test.db
  allowed_origins:
    - https://app.example.com
  gemini:
    base_url: https://generativelanguage.googleapis.com/v1beta
    model: gemini-1.5-flash
    timeout_seconds: 60
  email:
    base_url: https://api.resend.com
    sender: Test <test@example.com>
    timeout_seconds: 30
"#;
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            parsed.local.allowed_origins,
            vec!["http://localhost:5173".to_string()]
        );
        assert_eq!(parsed.production.gemini.model, "gemini-1.5-flash");
        assert!(parsed.production.database_path.is_absolute());
    }
}
