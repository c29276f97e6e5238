// src/store/contacts.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Contact {
    pub id: String,
    pub user_id: String,
    pub company_id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewContact {
    pub company_id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub current_role: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

pub struct ContactRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ContactRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user_id: &str, new: &NewContact) -> Result<Contact> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO contacts
                (id, user_id, company_id, first_name, last_name, current_role, location, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(&new.company_id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.current_role)
        .bind(&new.location)
        .bind(&new.notes)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(Contact {
            id,
            user_id: user_id.to_string(),
            company_id: new.company_id.clone(),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            current_role: new.current_role.clone(),
            location: new.location.clone(),
            notes: new.notes.clone(),
            created_at: now,
        })
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, user_id, company_id, first_name, last_name, current_role, location, notes, created_at
            FROM contacts
            WHERE user_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, user_id, company_id, first_name, last_name, current_role, location, notes, created_at
            FROM contacts
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(contact)
    }
}
