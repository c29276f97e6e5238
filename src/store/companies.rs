// src/store/companies.rs
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub status: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct CompanyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Exact, case-sensitive name match as stored
    pub async fn find_by_exact_name(&self, user_id: &str, name: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, name, status, website, industry, description, created_at
            FROM companies
            WHERE user_id = ? AND name = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        website: Option<&str>,
        industry: Option<&str>,
    ) -> Result<Company> {
        let now = Utc::now();
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO companies (id, user_id, name, status, website, industry, description, created_at)
            VALUES (?, ?, ?, 'active', ?, ?, NULL, ?)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(name)
        .bind(website)
        .bind(industry)
        .bind(now)
        .execute(self.pool)
        .await?;

        info!("Created company '{}' for user: {}", name, user_id);

        Ok(Company {
            id,
            user_id: user_id.to_string(),
            name: name.to_string(),
            status: "active".to_string(),
            website: website.map(str::to_string),
            industry: industry.map(str::to_string),
            description: None,
            created_at: now,
        })
    }

    pub async fn list_for_user(&self, user_id: &str) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, name, status, website, industry, description, created_at
            FROM companies
            WHERE user_id = ?
            ORDER BY name ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(companies)
    }

    pub async fn find_by_id(&self, user_id: &str, id: &str) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, user_id, name, status, website, industry, description, created_at
            FROM companies
            WHERE user_id = ? AND id = ?
            "#,
        )
        .bind(user_id)
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(company)
    }
}
