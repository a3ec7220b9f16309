//! In-process document store
//!
//! Keeps documents in insertion order behind a mutex. Individual verbs can
//! be made to fail so error paths are testable without a network.

use super::{apply_timestamps, Document, RemoteCollection, WriteRequest};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Remote verb, used to target failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct MemoryState {
    documents: Vec<Document>,
    failing: HashSet<Operation>,
}

/// In-memory remote collection. Clones share the same documents.
#[derive(Clone)]
pub struct MemoryCollection {
    name: String,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCollection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Make every call to `op` fail until [`recover`](Self::recover) is called.
    pub async fn fail_on(&self, op: Operation) {
        self.state.lock().await.failing.insert(op);
    }

    pub async fn recover(&self, op: Operation) {
        self.state.lock().await.failing.remove(&op);
    }

    /// Current documents, in insertion order
    pub async fn snapshot(&self) -> Vec<Document> {
        self.state.lock().await.documents.clone()
    }

    fn check(&self, state: &MemoryState, op: Operation) -> Result<()> {
        if state.failing.contains(&op) {
            return Err(AppError::Remote(format!(
                "{:?} on '{}' unavailable",
                op, self.name
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteCollection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let state = self.state.lock().await;
        self.check(&state, Operation::List)?;
        Ok(state.documents.clone())
    }

    async fn create(&self, write: WriteRequest) -> Result<String> {
        let mut state = self.state.lock().await;
        self.check(&state, Operation::Create)?;

        let key = Uuid::new_v4().simple().to_string();
        let mut fields = write.fields;
        apply_timestamps(&mut fields, &write.server_timestamps, Utc::now());

        state.documents.push(Document {
            key: key.clone(),
            fields,
        });

        tracing::debug!("Created document {}/{}", self.name, key);
        Ok(key)
    }

    async fn update(&self, key: &str, write: WriteRequest) -> Result<()> {
        let mut state = self.state.lock().await;
        self.check(&state, Operation::Update)?;

        let document = state
            .documents
            .iter_mut()
            .find(|doc| doc.key == key)
            .ok_or_else(|| AppError::NotFound(format!("{}/{}", self.name, key)))?;

        document.fields.extend(write.fields);
        apply_timestamps(
            &mut document.fields,
            &write.server_timestamps,
            Utc::now(),
        );

        tracing::debug!("Updated document {}/{}", self.name, key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        self.check(&state, Operation::Delete)?;

        state.documents.retain(|doc| doc.key != key);

        tracing::debug!("Deleted document {}/{}", self.name, key);
        Ok(())
    }
}
