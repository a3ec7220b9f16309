//! Database models
//!
//! Rows of the `documents` table. Fields are kept as a JSON object so any
//! entity kind fits the same table.

use crate::error::{AppError, Result};
use crate::remote::{Document, Fields};
use serde_json::Value;
use sqlx::FromRow;

/// A stored document
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub collection: String,
    pub doc_key: String,
    /// JSON-encoded field object
    pub fields: String,
}

impl DocumentRow {
    pub fn parse_fields(&self) -> Result<Fields> {
        match serde_json::from_str::<Value>(&self.fields)? {
            Value::Object(fields) => Ok(fields),
            _ => Err(AppError::Generic(format!(
                "Document {}/{} is not a JSON object",
                self.collection, self.doc_key
            ))),
        }
    }

    pub fn into_document(self) -> Result<Document> {
        let fields = self.parse_fields()?;
        Ok(Document {
            key: self.doc_key,
            fields,
        })
    }
}
