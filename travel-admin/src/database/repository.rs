//! Repository layer for database operations
//!
//! Document CRUD on the `documents` table, scoped by collection.
//! Read-modify-write operations run in a transaction.

use super::models::DocumentRow;
use crate::error::{AppError, Result};
use crate::remote::{apply_timestamps, Document, Fields};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a document and return its generated key
    pub async fn insert_document(
        &self,
        collection: &str,
        mut fields: Fields,
        stamps: &[&'static str],
    ) -> Result<String> {
        let key = Uuid::new_v4().simple().to_string();
        apply_timestamps(&mut fields, stamps, Utc::now());

        sqlx::query("INSERT INTO documents (collection, doc_key, fields) VALUES (?, ?, ?)")
            .bind(collection)
            .bind(&key)
            .bind(serde_json::to_string(&fields)?)
            .execute(&self.pool)
            .await?;

        tracing::debug!("Inserted document: {}/{}", collection, key);
        Ok(key)
    }

    /// List every document in a collection, oldest first
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT collection, doc_key, fields
            FROM documents WHERE collection = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DocumentRow::into_document).collect()
    }

    /// Merge `patch` into an existing document
    pub async fn update_document(
        &self,
        collection: &str,
        key: &str,
        patch: Fields,
        stamps: &[&'static str],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT collection, doc_key, fields
            FROM documents WHERE collection = ? AND doc_key = ?
            "#,
        )
        .bind(collection)
        .bind(key)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{}/{}", collection, key)))?;

        let mut fields = row.parse_fields()?;
        fields.extend(patch);
        apply_timestamps(&mut fields, stamps, Utc::now());

        sqlx::query("UPDATE documents SET fields = ? WHERE collection = ? AND doc_key = ?")
            .bind(serde_json::to_string(&fields)?)
            .bind(collection)
            .bind(key)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Updated document: {}/{}", collection, key);
        Ok(())
    }

    /// Delete a document; a missing key is not an error
    pub async fn delete_document(&self, collection: &str, key: &str) -> Result<()> {
        let rows = sqlx::query("DELETE FROM documents WHERE collection = ? AND doc_key = ?")
            .bind(collection)
            .bind(key)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::debug!("Deleted document: {}/{} ({} rows)", collection, key, rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::schema::initialize_database;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn create_test_repo() -> Repository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        initialize_database(&pool).await.unwrap();

        Repository::new(pool)
    }

    fn fields(value: serde_json::Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    async fn find(repo: &Repository, collection: &str, key: &str) -> Document {
        repo.list_documents(collection)
            .await
            .unwrap()
            .into_iter()
            .find(|doc| doc.key == key)
            .unwrap()
    }

    #[tokio::test]
    async fn test_insert_stamps_document() {
        let repo = create_test_repo().await;

        let key = repo
            .insert_document(
                "reviews",
                fields(json!({"place_name": "Beach", "score": 3})),
                &["created_at", "updated_at"],
            )
            .await
            .unwrap();

        let doc = find(&repo, "reviews", &key).await;
        assert_eq!(doc.fields["score"], json!(3));
        assert!(doc.fields["created_at"].is_string());
        assert_eq!(doc.fields["created_at"], doc.fields["updated_at"]);
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_ordered() {
        let repo = create_test_repo().await;

        for name in ["A", "B", "C"] {
            repo.insert_document("places", fields(json!({ "name": name })), &[])
                .await
                .unwrap();
        }
        repo.insert_document("categories", fields(json!({"name": "Beach"})), &[])
            .await
            .unwrap();

        let places = repo.list_documents("places").await.unwrap();
        let names: Vec<_> = places.iter().map(|d| d.fields["name"].clone()).collect();
        assert_eq!(names, vec![json!("A"), json!("B"), json!("C")]);
    }

    #[tokio::test]
    async fn test_update_merges_and_stamps() {
        let repo = create_test_repo().await;

        let key = repo
            .insert_document(
                "users",
                fields(json!({"username": "a", "status": "active"})),
                &["created_at", "updated_at"],
            )
            .await
            .unwrap();
        let before = find(&repo, "users", &key).await;

        repo.update_document(
            "users",
            &key,
            fields(json!({"status": "inactive"})),
            &["updated_at"],
        )
        .await
        .unwrap();

        let after = find(&repo, "users", &key).await;
        assert_eq!(after.fields["username"], json!("a"));
        assert_eq!(after.fields["status"], json!("inactive"));
        assert_eq!(after.fields["created_at"], before.fields["created_at"]);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let repo = create_test_repo().await;

        let err = repo
            .update_document("users", "missing", Fields::new(), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_document() {
        let repo = create_test_repo().await;

        let key = repo
            .insert_document("places", fields(json!({"name": "Temple"})), &[])
            .await
            .unwrap();

        repo.delete_document("places", &key).await.unwrap();
        repo.delete_document("places", &key).await.unwrap();

        assert!(repo.list_documents("places").await.unwrap().is_empty());
    }
}
