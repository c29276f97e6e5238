// src/store/profiles.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use super::guest::{GuestProfile, GuestSummary};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub user_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub background_input: String,
    pub email: Option<String>,
    pub linkedin_url: Option<String>,
    pub target_roles: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: String,
    pub user_id: String,
    pub experience_highlights: String,
    pub key_skills: String,
    pub value_proposition: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct ProfileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ProfileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Claim the account: one profile row per user, updated in place on a retried link
    pub async fn upsert_from_guest(
        &self,
        user_id: &str,
        guest: &GuestProfile,
    ) -> Result<UserProfile> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (id, user_id, first_name, last_name, current_role, current_company,
                 location, background_input, email, linkedin_url, target_roles,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, NULL, NULL, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                current_role = excluded.current_role,
                current_company = excluded.current_company,
                location = excluded.location,
                background_input = excluded.background_input,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(&guest.first_name)
        .bind(&guest.last_name)
        .bind(&guest.current_role)
        .bind(&guest.current_company)
        .bind(&guest.location)
        .bind(&guest.background_input)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        let profile = self
            .find_by_user(user_id)
            .await?
            .context("User profile missing after upsert")?;

        info!("Wrote user profile for user: {}", user_id);
        Ok(profile)
    }

    pub async fn find_by_user(&self, user_id: &str) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, first_name, last_name, current_role, current_company,
                   location, background_input, email, linkedin_url, target_roles,
                   created_at, updated_at
            FROM user_profiles
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn upsert_summary_from_guest(
        &self,
        user_id: &str,
        guest: &GuestSummary,
    ) -> Result<UserSummary> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO user_summaries
                (id, user_id, experience_highlights, key_skills, value_proposition,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                experience_highlights = excluded.experience_highlights,
                key_skills = excluded.key_skills,
                value_proposition = excluded.value_proposition,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(&guest.experience_highlights)
        .bind(&guest.key_skills)
        .bind(&guest.value_proposition)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.find_summary_by_user(user_id)
            .await?
            .context("User summary missing after upsert")
    }

    pub async fn find_summary_by_user(&self, user_id: &str) -> Result<Option<UserSummary>> {
        let summary = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, user_id, experience_highlights, key_skills, value_proposition,
                   created_at, updated_at
            FROM user_summaries
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(summary)
    }
}
