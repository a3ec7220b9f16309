use super::schema::{Entity, EntitySchema, StatusField};
use super::status::{self, Status, StatusRepr};
use crate::config::PLACES_COLLECTION;
use serde::{Deserialize, Serialize};

/// Tourist attraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Place {
    pub name: String,
    pub category: String,
    pub address: String,
    pub contact: String,
    /// Stored as a boolean `isActive`
    #[serde(rename = "isActive", with = "status::as_bool")]
    pub is_active: Status,
}

impl Entity for Place {
    const SCHEMA: EntitySchema = EntitySchema {
        collection: PLACES_COLLECTION,
        label: "Place",
        fields: &["name", "category", "address", "contact"],
        required: &["name"],
        status: Some(StatusField {
            name: "isActive",
            repr: StatusRepr::Bool,
        }),
        timestamped: false,
        token_field: None,
    };

    fn blank(_token: Option<String>) -> Self {
        Self::default()
    }

    fn status(&self) -> Option<Status> {
        Some(self.is_active)
    }

    fn set_status(&mut self, status: Status) {
        self.is_active = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_active_round_trips_as_bool() {
        let place = Place {
            name: "Temple".into(),
            is_active: Status::Inactive,
            ..Place::default()
        };
        let fields = place.to_fields().unwrap();
        assert_eq!(fields["isActive"], json!(false));
        assert!(!fields.contains_key("is_active"));

        assert_eq!(Place::from_fields(fields).unwrap(), place);
    }

    #[test]
    fn test_blank_place_is_active() {
        assert!(Place::blank(None).is_active.is_active());
    }
}
