//! Travel review
//!
//! Review scores are stepped by the form one point at a time and stay
//! within [`SCORE_MIN`]..=[`SCORE_MAX`].

use super::schema::{Entity, EntitySchema, StatusField};
use super::status::{Status, StatusRepr};
use crate::config::{REVIEWS_COLLECTION, SCORE_MAX, SCORE_MIN};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub place_name: String,
    #[serde(deserialize_with = "lenient_score")]
    pub score: u8,
    pub comment: String,
    /// Client-generated token, distinct from the document key
    pub user_id: String,
    pub status: Status,
}

impl Default for Review {
    fn default() -> Self {
        Self {
            place_name: String::new(),
            score: SCORE_MIN,
            comment: String::new(),
            user_id: String::new(),
            status: Status::Active,
        }
    }
}

impl Review {
    /// Step the score up; no-op at [`SCORE_MAX`].
    pub fn increase_score(&mut self) {
        if self.score < SCORE_MAX {
            self.score += 1;
        }
    }

    /// Step the score down; no-op at [`SCORE_MIN`].
    pub fn decrease_score(&mut self) {
        if self.score > SCORE_MIN {
            self.score -= 1;
        }
    }
}

/// Stored scores may be numbers, numeric strings or empty.
fn lenient_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n.as_f64().map(|f| f.round() as i64),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    Ok(score
        .map(|s| s.clamp(SCORE_MIN as i64, SCORE_MAX as i64) as u8)
        .unwrap_or(SCORE_MIN))
}

impl Entity for Review {
    const SCHEMA: EntitySchema = EntitySchema {
        collection: REVIEWS_COLLECTION,
        label: "Review",
        fields: &["place_name", "score", "comment", "user_id"],
        required: &["place_name"],
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_increase_blocked_at_max() {
        let mut review = Review {
            score: SCORE_MAX,
            ..Review::default()
        };
        review.increase_score();
        assert_eq!(review.score, SCORE_MAX);
    }

    #[test]
    fn test_decrease_blocked_at_min() {
        let mut review = Review::default();
        assert_eq!(review.score, SCORE_MIN);
        review.decrease_score();
        assert_eq!(review.score, SCORE_MIN);
    }

    #[test]
    fn test_step_within_bounds() {
        let mut review = Review::default();
        review.increase_score();
        review.increase_score();
        assert_eq!(review.score, 3);
        review.decrease_score();
        assert_eq!(review.score, 2);
    }

    #[test]
    fn test_lenient_decode() {
        let review = Review::from_fields(
            json!({"place_name": "Beach", "score": "", "status": "inactive"})
                .as_object()
                .cloned()
                .unwrap(),
        )
        .unwrap();
        assert_eq!(review.score, SCORE_MIN);
        assert_eq!(review.status, Status::Inactive);
        assert_eq!(review.comment, "");

        let review: Review = serde_json::from_value(json!({"score": "4"})).unwrap();
        assert_eq!(review.score, 4);
    }

    #[test]
    fn test_null_status_decodes_as_active() {
        let review: Review =
            serde_json::from_value(json!({"place_name": "Beach", "status": null})).unwrap();
        assert_eq!(review.status, Status::Active);
    }

    #[test]
    fn test_blank_uses_token() {
        let review = Review::blank(Some("tok-1".into()));
        assert_eq!(review.user_id, "tok-1");
        assert_eq!(review.status, Status::Active);
    }
}
