//! Console sections and their routes

use crate::config::{
    CATEGORIES_COLLECTION, PLACES_COLLECTION, REVIEWS_COLLECTION, USERS_COLLECTION,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[default]
    Reviews,
    Users,
    Categories,
    Places,
}

impl Section {
    /// Navigation order
    pub const ALL: [Section; 4] = [
        Section::Reviews,
        Section::Users,
        Section::Categories,
        Section::Places,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Section::Reviews => "Review Manage",
            Section::Users => "User Manage",
            Section::Categories => "Categories Manage",
            Section::Places => "Place Manage",
        }
    }

    pub fn route(self) -> &'static str {
        match self {
            Section::Reviews => "/",
            Section::Users => "/UserManager",
            Section::Categories => "/dashboard",
            Section::Places => "/placemanage",
        }
    }

    pub fn collection(self) -> &'static str {
        match self {
            Section::Reviews => REVIEWS_COLLECTION,
            Section::Users => USERS_COLLECTION,
            Section::Categories => CATEGORIES_COLLECTION,
            Section::Places => PLACES_COLLECTION,
        }
    }

    /// Resolve a path; unknown paths land on the review manager.
    pub fn from_route(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        Self::ALL
            .into_iter()
            .find(|s| s.route().trim_end_matches('/') == trimmed)
            .unwrap_or_default()
    }
}
