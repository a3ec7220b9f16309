//! Document store migrations
//!
//! Each migration is a SQL script applied once, in version order, inside
//! its own transaction. Applied versions are recorded in
//! `schema_migrations`.

use crate::error::Result;
use sqlx::sqlite::SqlitePool;

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "documents",
    sql: include_str!("migrations/001_documents.sql"),
}];

const BOOKKEEPING: &str = r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Bring the document store schema up to date
pub async fn initialize_database(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(BOOKKEEPING).execute(pool).await?;

    let applied: Vec<i64> = sqlx::query_scalar("SELECT version FROM schema_migrations")
        .fetch_all(pool)
        .await?;

    let pending: Vec<&Migration> = MIGRATIONS
        .iter()
        .filter(|m| !applied.contains(&m.version))
        .collect();

    if pending.is_empty() {
        tracing::debug!("Document store schema is current");
        return Ok(());
    }

    for migration in pending {
        apply(pool, migration).await?;
    }

    Ok(())
}

async fn apply(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
    sqlx::query("INSERT INTO schema_migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(
        "Applied migration {} ({})",
        migration.version,
        migration.name
    );
    Ok(())
}
