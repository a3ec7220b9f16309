//! SQLite-backed remote collection
//!
//! Thin adapter from [`RemoteCollection`] onto the document repository.

use super::{Document, RemoteCollection, WriteRequest};
use crate::database::Repository;
use crate::error::Result;
use async_trait::async_trait;

#[derive(Clone)]
pub struct SqliteCollection {
    name: String,
    repo: Repository,
}

impl SqliteCollection {
    pub fn new(repo: Repository, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            repo,
        }
    }
}

#[async_trait]
impl RemoteCollection for SqliteCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self) -> Result<Vec<Document>> {
        self.repo.list_documents(&self.name).await
    }

    async fn create(&self, write: WriteRequest) -> Result<String> {
        self.repo
            .insert_document(&self.name, write.fields, &write.server_timestamps)
            .await
    }

    async fn update(&self, key: &str, write: WriteRequest) -> Result<()> {
        self.repo
            .update_document(&self.name, key, write.fields, &write.server_timestamps)
            .await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.repo.delete_document(&self.name, key).await
    }
}
