// src/store/guest.rs
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuestProfile {
    pub id: String,
    pub session_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub background_input: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuestSummary {
    pub id: String,
    pub session_id: String,
    pub experience_highlights: String,
    pub key_skills: String,
    pub value_proposition: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuestContact {
    pub id: String,
    pub session_id: String,
    pub first_name: String,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub bio_input: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GuestMessage {
    pub id: String,
    pub session_id: String,
    pub guest_contact_id: String,
    pub version_name: String,
    pub message_text: String,
    pub is_selected: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewGuestProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub background_input: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewGuestContact {
    pub first_name: String,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub current_company: Option<String>,
    pub location: Option<String>,
    pub bio_input: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuestTableCounts {
    pub profiles: i64,
    pub summaries: i64,
    pub contacts: i64,
    pub messages: i64,
}

pub struct GuestStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GuestStore<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create or replace the single profile row for a session
    pub async fn upsert_profile(
        &self,
        session_id: &str,
        new: &NewGuestProfile,
    ) -> Result<GuestProfile> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO guest_profiles
                (id, session_id, first_name, last_name, current_role, current_company,
                 location, background_input, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
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
        .bind(session_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.current_role)
        .bind(&new.current_company)
        .bind(&new.location)
        .bind(&new.background_input)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.find_profile(session_id)
            .await?
            .context("Guest profile missing after upsert")
    }

    pub async fn find_profile(&self, session_id: &str) -> Result<Option<GuestProfile>> {
        let profile = sqlx::query_as::<_, GuestProfile>(
            r#"
            SELECT id, session_id, first_name, last_name, current_role, current_company,
                   location, background_input, created_at, updated_at
            FROM guest_profiles
            WHERE session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(profile)
    }

    pub async fn upsert_summary(
        &self,
        session_id: &str,
        experience_highlights: &str,
        key_skills: &str,
        value_proposition: &str,
    ) -> Result<GuestSummary> {
        sqlx::query(
            r#"
            INSERT INTO guest_summaries
                (id, session_id, experience_highlights, key_skills, value_proposition, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(session_id) DO UPDATE SET
                experience_highlights = excluded.experience_highlights,
                key_skills = excluded.key_skills,
                value_proposition = excluded.value_proposition
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(session_id)
        .bind(experience_highlights)
        .bind(key_skills)
        .bind(value_proposition)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        self.find_summary(session_id)
            .await?
            .context("Guest summary missing after upsert")
    }

    pub async fn find_summary(&self, session_id: &str) -> Result<Option<GuestSummary>> {
        let summary = sqlx::query_as::<_, GuestSummary>(
            r#"
            SELECT id, session_id, experience_highlights, key_skills, value_proposition, created_at
            FROM guest_summaries
            WHERE session_id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(summary)
    }

    pub async fn insert_contact(
        &self,
        session_id: &str,
        new: &NewGuestContact,
    ) -> Result<GuestContact> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO guest_contacts
                (id, session_id, first_name, last_name, current_role, current_company,
                 location, bio_input, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(session_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.current_role)
        .bind(&new.current_company)
        .bind(&new.location)
        .bind(&new.bio_input)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(GuestContact {
            id,
            session_id: session_id.to_string(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            current_role: new.current_role.clone(),
            current_company: new.current_company.clone(),
            location: new.location.clone(),
            bio_input: new.bio_input.clone(),
            created_at: now,
        })
    }

    /// Contacts for a session in insertion order
    pub async fn list_contacts(&self, session_id: &str) -> Result<Vec<GuestContact>> {
        let contacts = sqlx::query_as::<_, GuestContact>(
            r#"
            SELECT id, session_id, first_name, last_name, current_role, current_company,
                   location, bio_input, created_at
            FROM guest_contacts
            WHERE session_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn find_contact(
        &self,
        session_id: &str,
        contact_id: &str,
    ) -> Result<Option<GuestContact>> {
        let contact = sqlx::query_as::<_, GuestContact>(
            r#"
            SELECT id, session_id, first_name, last_name, current_role, current_company,
                   location, bio_input, created_at
            FROM guest_contacts
            WHERE session_id = ? AND id = ?
            "#,
        )
        .bind(session_id)
        .bind(contact_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }

    pub async fn insert_message(
        &self,
        session_id: &str,
        guest_contact_id: &str,
        version_name: &str,
        message_text: &str,
    ) -> Result<GuestMessage> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO guest_messages
                (id, session_id, guest_contact_id, version_name, message_text, is_selected, created_at)
            VALUES (?, ?, ?, ?, ?, FALSE, ?)
            "#,
        )
        .bind(&id)
        .bind(session_id)
        .bind(guest_contact_id)
        .bind(version_name)
        .bind(message_text)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(GuestMessage {
            id,
            session_id: session_id.to_string(),
            guest_contact_id: guest_contact_id.to_string(),
            version_name: version_name.to_string(),
            message_text: message_text.to_string(),
            is_selected: false,
            created_at: now,
        })
    }

    pub async fn list_messages(
        &self,
        session_id: &str,
        guest_contact_id: &str,
    ) -> Result<Vec<GuestMessage>> {
        let messages = sqlx::query_as::<_, GuestMessage>(
            r#"
            SELECT id, session_id, guest_contact_id, version_name, message_text, is_selected, created_at
            FROM guest_messages
            WHERE session_id = ? AND guest_contact_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(session_id)
        .bind(guest_contact_id)
        .fetch_all(self.pool)
        .await?;

        Ok(messages)
    }

    /// The one message the guest chose to keep, if any
    pub async fn find_selected_message(&self, session_id: &str) -> Result<Option<GuestMessage>> {
        let message = sqlx::query_as::<_, GuestMessage>(
            r#"
            SELECT id, session_id, guest_contact_id, version_name, message_text, is_selected, created_at
            FROM guest_messages
            WHERE session_id = ? AND is_selected = TRUE
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(message)
    }

    /// Exclusive selection: clear every sibling row before setting the new one
    pub async fn select_message(
        &self,
        session_id: &str,
        guest_contact_id: &str,
        message_id: &str,
    ) -> Result<bool> {
        sqlx::query(
            r#"
            UPDATE guest_messages
            SET is_selected = FALSE
            WHERE session_id = ? AND guest_contact_id = ?
            "#,
        )
        .bind(session_id)
        .bind(guest_contact_id)
        .execute(self.pool)
        .await?;

        let result = sqlx::query(
            r#"
            UPDATE guest_messages
            SET is_selected = TRUE
            WHERE id = ? AND session_id = ? AND guest_contact_id = ?
            "#,
        )
        .bind(message_id)
        .bind(session_id)
        .bind(guest_contact_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_messages(&self, session_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM guest_messages WHERE session_id = ?")
            .bind(session_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_contacts(&self, session_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM guest_contacts WHERE session_id = ?")
            .bind(session_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_summary(&self, session_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM guest_summaries WHERE session_id = ?")
            .bind(session_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_profile(&self, session_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM guest_profiles WHERE session_id = ?")
            .bind(session_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Row counts across the guest tables, for the admin CLI
    pub async fn table_counts(&self) -> Result<GuestTableCounts> {
        let profiles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest_profiles")
            .fetch_one(self.pool)
            .await?;
        let summaries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest_summaries")
            .fetch_one(self.pool)
            .await?;
        let contacts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest_contacts")
            .fetch_one(self.pool)
            .await?;
        let messages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM guest_messages")
            .fetch_one(self.pool)
            .await?;

        Ok(GuestTableCounts {
            profiles,
            summaries,
            contacts,
            messages,
        })
    }

    /// Delete every guest row belonging to sessions whose profile predates the cutoff.
    /// Returns the number of sessions removed.
    pub async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        for table in ["guest_messages", "guest_contacts", "guest_summaries"] {
            let statement = format!(
                "DELETE FROM {} WHERE session_id IN \
                 (SELECT session_id FROM guest_profiles WHERE created_at < ?)",
                table
            );
            sqlx::query(&statement)
                .bind(cutoff)
                .execute(self.pool)
                .await?;
        }

        let result = sqlx::query("DELETE FROM guest_profiles WHERE created_at < ?")
            .bind(cutoff)
            .execute(self.pool)
            .await?;

        let purged = result.rows_affected();
        if purged > 0 {
            info!("Purged {} stale guest sessions", purged);
        }
        Ok(purged)
    }
}
