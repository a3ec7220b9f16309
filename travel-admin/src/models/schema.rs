//! Entity schema descriptors
//!
//! One [`EntitySchema`] per entity kind replaces the per-manager copies of
//! field lists, required checks and status handling.

use super::status::{Status, StatusRepr};
use crate::error::{AppError, Result};
use crate::remote::Fields;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Location and representation of an entity's two-state flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusField {
    pub name: &'static str,
    pub repr: StatusRepr,
}

#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    /// Remote collection name
    pub collection: &'static str,
    /// Human-readable singular name used in logs and messages
    pub label: &'static str,
    /// Fields written by an edit; excludes the status flag and timestamps
    pub fields: &'static [&'static str],
    /// Fields that must be non-empty before a create is sent
    pub required: &'static [&'static str],
    pub status: Option<StatusField>,
    /// Whether the backend stamps `created_at` / `updated_at`
    pub timestamped: bool,
    /// Field holding the client-generated token, if any
    pub token_field: Option<&'static str>,
}

impl EntitySchema {
    pub fn create_stamps(&self) -> &'static [&'static str] {
        if self.timestamped {
            &[CREATED_AT, UPDATED_AT]
        } else {
            &[]
        }
    }

    pub fn update_stamps(&self) -> &'static [&'static str] {
        if self.timestamped {
            &[UPDATED_AT]
        } else {
            &[]
        }
    }

    /// First required field that is absent, null or blank.
    pub fn missing_required(&self, fields: &Fields) -> Option<&'static str> {
        self.required.iter().copied().find(|name| match fields.get(*name) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
    }

    /// Restrict `fields` to the editable subset.
    pub fn editable(&self, fields: &Fields) -> Fields {
        fields
            .iter()
            .filter(|(name, _)| self.fields.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect()
    }
}

/// A record kind managed by the console
pub trait Entity:
    Serialize + DeserializeOwned + Clone + PartialEq + Debug + Send + Sync + 'static
{
    const SCHEMA: EntitySchema;

    /// Empty draft; `token` is set when the schema has a token field.
    fn blank(token: Option<String>) -> Self;

    fn status(&self) -> Option<Status> {
        None
    }

    fn set_status(&mut self, _status: Status) {}

    fn to_fields(&self) -> Result<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(fields) => Ok(fields),
            other => Err(AppError::Generic(format!(
                "{} did not serialize to an object: {}",
                Self::SCHEMA.label,
                other
            ))),
        }
    }

    fn from_fields(fields: Fields) -> Result<Self> {
        Ok(serde_json::from_value(Value::Object(fields))?)
    }
}
