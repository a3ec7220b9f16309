use super::schema::{Entity, EntitySchema};
use crate::config::CATEGORIES_COLLECTION;
use serde::{Deserialize, Serialize};

/// Place category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub name: String,
    pub description: String,
}

impl Entity for Category {
    const SCHEMA: EntitySchema = EntitySchema {
        collection: CATEGORIES_COLLECTION,
        label: "Category",
        fields: &["name", "description"],
        required: &["name", "description"],
        status: None,
        timestamped: false,
        token_field: None,
    };

    fn blank(_token: Option<String>) -> Self {
        Self::default()
    }
}
