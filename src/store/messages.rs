// src/store/messages.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SavedMessageVersion {
    pub id: String,
    pub user_id: String,
    pub contact_id: String,
    pub company_id: Option<String>,
    pub version_name: String,
    pub message_text: String,
    pub created_at: DateTime<Utc>,
}

pub struct MessageRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MessageRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        user_id: &str,
        contact_id: &str,
        company_id: Option<&str>,
        version_name: &str,
        message_text: &str,
    ) -> Result<SavedMessageVersion> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO saved_message_versions
                (id, user_id, contact_id, company_id, version_name, message_text, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(contact_id)
        .bind(company_id)
        .bind(version_name)
        .bind(message_text)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(SavedMessageVersion {
            id,
            user_id: user_id.to_string(),
            contact_id: contact_id.to_string(),
            company_id: company_id.map(str::to_string),
            version_name: version_name.to_string(),
            message_text: message_text.to_string(),
            created_at: now,
        })
    }

    pub async fn list_for_contact(
        &self,
        user_id: &str,
        contact_id: &str,
    ) -> Result<Vec<SavedMessageVersion>> {
        let messages = sqlx::query_as::<_, SavedMessageVersion>(
            r#"
            SELECT id, user_id, contact_id, company_id, version_name, message_text, created_at
            FROM saved_message_versions
            WHERE user_id = ? AND contact_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(contact_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<SavedMessageVersion>> {
        let message = sqlx::query_as::<_, SavedMessageVersion>(
            r#"
            SELECT id, user_id, contact_id, company_id, version_name, message_text, created_at
            FROM saved_message_versions
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(message)
    }
}
