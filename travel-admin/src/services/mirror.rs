//! Local mirror of a remote collection
//!
//! An ordered list of the records seen by the last successful listing,
//! patched in place after each successful write.

use crate::error::Result;
use crate::models::schema::{CREATED_AT, UPDATED_AT};
use crate::models::Entity;
use crate::remote::{Document, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A mirrored document: storage key, entity fields and server timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<E> {
    pub id: String,
    #[serde(flatten)]
    pub data: E,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl<E: Entity> Record<E> {
    /// A record known only locally; timestamps arrive with the next listing.
    pub fn new(id: impl Into<String>, data: E) -> Self {
        Self {
            id: id.into(),
            data,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn from_document(document: Document) -> Result<Self> {
        let mut fields = document.fields;
        let created_at = take_timestamp(&mut fields, CREATED_AT);
        let updated_at = take_timestamp(&mut fields, UPDATED_AT);
        fields.remove("id");

        Ok(Self {
            id: document.key,
            data: E::from_fields(fields)?,
            created_at,
            updated_at,
        })
    }
}

fn take_timestamp(fields: &mut Fields, name: &str) -> Option<DateTime<Utc>> {
    match fields.remove(name) {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}

/// Ids that differ between two mirrors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorDiff {
    /// Present remotely but not in the local mirror
    pub added: Vec<String>,
    /// Present locally but gone remotely
    pub removed: Vec<String>,
    /// Present in both with different entity fields
    pub changed: Vec<String>,
}

impl MirrorDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mirror<E> {
    records: Vec<Record<E>>,
}

impl<E> Default for Mirror<E> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<E: Entity> Mirror<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record<E>>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record<E>] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Record<E>> {
        self.records.iter().find(|r| r.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Record<E>> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub(crate) fn replace_all(&mut self, records: Vec<Record<E>>) {
        self.records = records;
    }

    pub(crate) fn push(&mut self, record: Record<E>) {
        self.records.push(record);
    }

    /// Overwrite the given fields of the record with `id`, keeping its id,
    /// untouched fields and timestamps. Returns whether a record matched.
    pub(crate) fn patch(&mut self, id: &str, fields: &Fields) -> Result<bool> {
        let Some(record) = self.get_mut(id) else {
            return Ok(false);
        };

        let mut merged = record.data.to_fields()?;
        merged.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
        record.data = E::from_fields(merged)?;

        Ok(true)
    }

    pub(crate) fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Compare this mirror against a fresher one
    pub fn diff(&self, fresh: &Mirror<E>) -> MirrorDiff {
        let mut diff = MirrorDiff::default();

        for record in &self.records {
            match fresh.get(&record.id) {
                None => diff.removed.push(record.id.clone()),
                Some(other) if other.data != record.data => diff.changed.push(record.id.clone()),
                Some(_) => {}
            }
        }

        for record in &fresh.records {
            if self.get(&record.id).is_none() {
                diff.added.push(record.id.clone());
            }
        }

        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Place, Status};
    use serde_json::json;

    fn category(id: &str, name: &str) -> Record<Category> {
        Record::new(
            id,
            Category {
                name: name.into(),
                description: "d".into(),
            },
        )
    }

    #[test]
    fn test_from_document_extracts_timestamps() {
        let doc = Document {
            key: "k1".into(),
            fields: json!({
                "name": "Temple",
                "isActive": false,
                "created_at": "2024-11-02T08:15:00Z",
                "updated_at": "not a time"
            })
            .as_object()
            .cloned()
            .unwrap(),
        };

        let record: Record<Place> = Record::from_document(doc).unwrap();
        assert_eq!(record.id, "k1");
        assert_eq!(record.data.name, "Temple");
        assert_eq!(record.data.is_active, Status::Inactive);
        assert!(record.created_at.is_some());
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn test_patch_preserves_other_fields() {
        let mut mirror = Mirror::from_records(vec![Record::new(
            "p1",
            Place {
                name: "Temple".into(),
                address: "Old town".into(),
                ..Place::default()
            },
        )]);

        let patch = json!({"name": "Old Temple"}).as_object().cloned().unwrap();
        assert!(mirror.patch("p1", &patch).unwrap());
        assert!(!mirror.patch("missing", &patch).unwrap());

        let record = mirror.get("p1").unwrap();
        assert_eq!(record.id, "p1");
        assert_eq!(record.data.name, "Old Temple");
        assert_eq!(record.data.address, "Old town");
        assert!(record.data.is_active.is_active());
    }

    #[test]
    fn test_remove_filters_by_id() {
        let mut mirror = Mirror::from_records(vec![category("a", "A"), category("b", "B")]);
        assert!(mirror.remove("a"));
        assert!(!mirror.remove("a"));
        assert_eq!(mirror.len(), 1);
        assert!(mirror.get("a").is_none());
    }

    #[test]
    fn test_diff() {
        let local = Mirror::from_records(vec![category("a", "A"), category("b", "B")]);
        let fresh = Mirror::from_records(vec![category("b", "B2"), category("c", "C")]);

        let diff = local.diff(&fresh);
        assert_eq!(diff.removed, vec!["a".to_string()]);
        assert_eq!(diff.changed, vec!["b".to_string()]);
        assert_eq!(diff.added, vec!["c".to_string()]);
        assert!(local.diff(&local).is_empty());
    }

    #[test]
    fn test_serializes_flat() {
        let mirror = Mirror::from_records(vec![category("a", "Beach")]);
        let value = serde_json::to_value(&mirror).unwrap();
        assert_eq!(
            value,
            json!([{"id": "a", "name": "Beach", "description": "d"}])
        );
    }
}
