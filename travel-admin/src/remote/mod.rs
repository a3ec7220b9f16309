//! Remote collection clients
//!
//! A remote collection is a named set of documents addressed by key. The
//! console only needs four verbs from it; each backend implements
//! [`RemoteCollection`] for its own storage:
//! - `memory`: in-process store (tests, throwaway sessions)
//! - `sqlite`: documents persisted through the repository layer
//! - `firestore`: Cloud Firestore REST API

pub mod firestore;
pub mod memory;
pub mod sqlite;

pub use firestore::FirestoreCollection;
pub use memory::{MemoryCollection, Operation};
pub use sqlite::SqliteCollection;

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Document body: field name to JSON value
pub type Fields = Map<String, Value>;

/// A stored document with its storage-assigned key
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub key: String,
    pub fields: Fields,
}

/// Fields to write plus the fields the backend must stamp with its own clock
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteRequest {
    pub fields: Fields,
    pub server_timestamps: Vec<&'static str>,
}

impl WriteRequest {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            server_timestamps: Vec::new(),
        }
    }

    pub fn stamped(mut self, names: &[&'static str]) -> Self {
        self.server_timestamps.extend_from_slice(names);
        self
    }
}

/// Write `now` into each named field, as backends without native
/// server timestamps do.
pub(crate) fn apply_timestamps(fields: &mut Fields, names: &[&'static str], now: DateTime<Utc>) {
    let stamp = now.to_rfc3339_opts(SecondsFormat::Micros, true);
    for name in names {
        fields.insert((*name).to_string(), Value::String(stamp.clone()));
    }
}

#[async_trait]
pub trait RemoteCollection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Enumerate every document in the collection.
    async fn list(&self) -> Result<Vec<Document>>;

    /// Store a new document and return its key.
    async fn create(&self, write: WriteRequest) -> Result<String>;

    /// Overwrite the given fields of an existing document.
    async fn update(&self, key: &str, write: WriteRequest) -> Result<()>;

    /// Remove a document. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;
}
