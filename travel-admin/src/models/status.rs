//! Two-state status flag
//!
//! Reviews and users store their flag as the strings `"active"` /
//! `"inactive"`, places store it as a boolean `isActive`. Inside the crate
//! both are a [`Status`]; the representation only matters at the serde
//! boundary and when a single field is written remotely.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Active,
    Inactive,
}

/// External representation of a [`Status`] field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRepr {
    /// `"active"` / `"inactive"`
    Text,
    /// `true` / `false`
    Bool,
}

impl Status {
    pub fn flipped(self) -> Self {
        match self {
            Status::Active => Status::Inactive,
            Status::Inactive => Status::Active,
        }
    }

    pub fn is_active(self) -> bool {
        self == Status::Active
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Inactive => "inactive",
        }
    }

    pub fn to_value(self, repr: StatusRepr) -> Value {
        match repr {
            StatusRepr::Text => Value::String(self.as_str().to_string()),
            StatusRepr::Bool => Value::Bool(self.is_active()),
        }
    }

    /// Read a stored flag in either representation.
    ///
    /// Any string other than `"active"` reads as inactive, matching how the
    /// console has always rendered unknown values. A null flag reads like a
    /// missing one.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Status::default()),
            Value::Bool(active) => Some(Status::from(*active)),
            Value::String(s) => Some(Status::from(s.eq_ignore_ascii_case("active"))),
            _ => None,
        }
    }
}

impl From<bool> for Status {
    fn from(active: bool) -> Self {
        if active {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Status::from_value(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid status value: {}", value)))
    }
}

/// Serde adapter storing a [`Status`] as a boolean.
///
/// Use with `#[serde(with = "crate::models::status::as_bool")]`.
pub mod as_bool {
    use super::Status;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(status: &Status, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(status.is_active())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Status, D::Error>
    where
        D: Deserializer<'de>,
    {
        Status::deserialize(deserializer)
    }
}
