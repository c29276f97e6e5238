// src/database.rs
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());

        let pool = SqlitePool::connect(&database_url)
            .await
            .context("Failed to connect to SQLite database")?;
        self.pool = Some(pool);

        info!("Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Database pool not initialized. Call init_pool() first."))
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        run_migrations(self.pool()?).await
    }
}

/// Idempotent schema setup, also used by tests against in-memory pools
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Guest tables, keyed by an opaque browser session id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guest_profiles (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL UNIQUE,
            first_name TEXT,
            last_name TEXT,
            current_role TEXT,
            current_company TEXT,
            location TEXT,
            background_input TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guest_summaries (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL UNIQUE,
            experience_highlights TEXT NOT NULL,
            key_skills TEXT NOT NULL,
            value_proposition TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guest_contacts (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT,
            current_role TEXT,
            current_company TEXT,
            location TEXT,
            bio_input TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS guest_messages (
            id TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            guest_contact_id TEXT NOT NULL,
            version_name TEXT NOT NULL,
            message_text TEXT NOT NULL,
            is_selected BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Permanent tables, keyed by authenticated user id
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_profiles (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            first_name TEXT,
            last_name TEXT,
            current_role TEXT,
            current_company TEXT,
            location TEXT,
            background_input TEXT NOT NULL,
            email TEXT,
            linkedin_url TEXT,
            target_roles TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_summaries (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE,
            experience_highlights TEXT NOT NULL,
            key_skills TEXT NOT NULL,
            value_proposition TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS companies (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL CHECK (name <> ''),
            status TEXT NOT NULL DEFAULT 'active',
            website TEXT,
            industry TEXT,
            description TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            company_id TEXT,
            first_name TEXT NOT NULL CHECK (first_name <> ''),
            last_name TEXT,
            current_role TEXT,
            location TEXT,
            notes TEXT,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS saved_message_versions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            contact_id TEXT NOT NULL,
            company_id TEXT,
            version_name TEXT NOT NULL,
            message_text TEXT NOT NULL,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_guest_contacts_session ON guest_contacts(session_id);",
        "CREATE INDEX IF NOT EXISTS idx_guest_messages_session ON guest_messages(session_id);",
        "CREATE INDEX IF NOT EXISTS idx_guest_messages_contact ON guest_messages(session_id, guest_contact_id);",
        "CREATE INDEX IF NOT EXISTS idx_companies_user ON companies(user_id);",
        "CREATE INDEX IF NOT EXISTS idx_companies_user_name ON companies(user_id, name);",
        "CREATE INDEX IF NOT EXISTS idx_contacts_user ON contacts(user_id);",
        "CREATE INDEX IF NOT EXISTS idx_messages_user_contact ON saved_message_versions(user_id, contact_id);",
    ];

    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}
