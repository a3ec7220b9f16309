//! Database module
//!
//! Local SQLite document store backing the `sqlite` remote backend:
//! - Schema migrations
//! - Row models
//! - Repository layer for document CRUD

pub mod models;
pub mod repository;
pub mod schema;

pub use models::DocumentRow;
pub use repository::Repository;
pub use schema::initialize_database;

use crate::config::{SQLITE_BUSY_TIMEOUT, SQLITE_MAX_CONNECTIONS};
use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;

/// Open the document store at `db_path`, creating the file and any missing
/// parent directories, and migrate it to the current schema.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(SQLITE_BUSY_TIMEOUT);

    let pool = SqlitePoolOptions::new()
        .max_connections(SQLITE_MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    initialize_database(&pool).await?;

    tracing::info!("Document store ready at {:?}", db_path);
    Ok(pool)
}
