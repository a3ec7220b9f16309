use super::schema::{Entity, EntitySchema, StatusField};
use super::status::{Status, StatusRepr};
use crate::config::USERS_COLLECTION;
use serde::{Deserialize, Serialize};

/// Console user account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredUser")]
pub struct User {
    pub username: String,
    pub email: String,
    pub phone: String,
    /// Client-generated token, distinct from the document key
    pub user_id: String,
    pub status: Status,
}

/// User document as stored. Older documents carry `name` instead of
/// `username`, and an edited one carries both.
#[derive(Deserialize, Default)]
#[serde(default)]
struct StoredUser {
    username: Option<String>,
    name: Option<String>,
    email: String,
    phone: String,
    user_id: String,
    status: Status,
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        let username = stored
            .username
            .filter(|u| !u.is_empty())
            .or(stored.name)
            .unwrap_or_default();

        Self {
            username,
            email: stored.email,
            phone: stored.phone,
            user_id: stored.user_id,
            status: stored.status,
        }
    }
}

impl Entity for User {
    const SCHEMA: EntitySchema = EntitySchema {
        collection: USERS_COLLECTION,
        label: "User",
        fields: &["username", "email", "phone", "user_id"],
        required: &["username", "email"],
        status: Some(StatusField {
            name: "status",
            repr: StatusRepr::Text,
        }),
        timestamped: true,
        token_field: Some("user_id"),
    };

    fn blank(token: Option<String>) -> Self {
        Self {
            user_id: token.unwrap_or_default(),
            ..Self::default()
        }
    }

    fn status(&self) -> Option<Status> {
        Some(self.status)
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}
