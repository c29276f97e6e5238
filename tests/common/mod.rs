// tests/common/mod.rs
use introlink_core::run_migrations;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

/// Single-connection in-memory database so every query sees the same data
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    run_migrations(&pool).await.expect("Migrations failed");
    pool
}

#[allow(dead_code)]
pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Count query failed")
}
