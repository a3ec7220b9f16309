//! Application configuration
//!
//! Central location for configuration constants, validation boundaries
//! and the backend selection read from the environment.

use crate::error::{AppError, Result};
use crate::services::Consistency;
use std::path::PathBuf;
use std::time::Duration;

// ===== Review Score =====

/// Lowest score a review draft can be stepped down to
pub const SCORE_MIN: u8 = 1;
/// Highest score a review draft can be stepped up to
pub const SCORE_MAX: u8 = 5;

// ===== Notifications =====

/// How long a success toast stays visible, in milliseconds
pub const TOAST_DURATION_MS: i64 = 3_000;

// ===== Remote Collections =====

pub const REVIEWS_COLLECTION: &str = "reviews";
pub const USERS_COLLECTION: &str = "users";
pub const CATEGORIES_COLLECTION: &str = "categories";
pub const PLACES_COLLECTION: &str = "places";

// ===== Firestore =====

/// Base URL of the Firestore REST API
pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Documents requested per listing page. The page token is followed
/// until the collection is exhausted.
pub const FIRESTORE_PAGE_SIZE: u32 = 300;

/// Length of client-generated document keys (matches the Firestore SDK)
pub const AUTO_ID_LENGTH: usize = 20;

/// Timeout applied to every Firestore request
pub const FIRESTORE_TIMEOUT: Duration = Duration::from_secs(15);

// ===== SQLite =====

pub const SQLITE_MAX_CONNECTIONS: u32 = 5;
pub const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Which document store backs the remote collections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// In-process store, contents are lost on exit
    Memory,
    /// Documents persisted in a local SQLite file
    Sqlite { path: PathBuf },
    /// Cloud Firestore over its REST API
    Firestore(FirestoreConfig),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    pub database: String,
}

impl FirestoreConfig {
    /// `projects/{project}/databases/{database}/documents`
    pub fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }
}

/// Console configuration resolved from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub backend: Backend,
    pub consistency: Consistency,
}

impl ConsoleConfig {
    /// Load configuration from the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup("TRAVEL_ADMIN_BACKEND").unwrap_or_else(|| "sqlite".to_string());

        let backend = match kind.trim().to_lowercase().as_str() {
            "memory" => Backend::Memory,
            "sqlite" => Backend::Sqlite {
                path: lookup("TRAVEL_ADMIN_DB_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("travel-admin.db")),
            },
            "firestore" => {
                let project_id = lookup("FIRESTORE_PROJECT_ID")
                    .ok_or_else(|| AppError::Config("FIRESTORE_PROJECT_ID must be set".into()))?;
                let api_key = lookup("FIRESTORE_API_KEY")
                    .ok_or_else(|| AppError::Config("FIRESTORE_API_KEY must be set".into()))?;
                let database =
                    lookup("FIRESTORE_DATABASE").unwrap_or_else(|| "(default)".to_string());

                Backend::Firestore(FirestoreConfig {
                    project_id,
                    api_key,
                    database,
                })
            }
            other => {
                return Err(AppError::Config(format!(
                    "Unknown backend '{}', expected memory, sqlite or firestore",
                    other
                )))
            }
        };

        let consistency = match lookup("TRAVEL_ADMIN_CONSISTENCY") {
            Some(value) => Consistency::parse(&value).ok_or_else(|| {
                AppError::Config(format!(
                    "Unknown consistency '{}', expected optimistic or reconcile",
                    value
                ))
            })?,
            None => Consistency::default(),
        };

        Ok(Self {
            backend,
            consistency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_to_sqlite() {
        let config = ConsoleConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(
            config.backend,
            Backend::Sqlite {
                path: PathBuf::from("travel-admin.db")
            }
        );
        assert_eq!(config.consistency, Consistency::Optimistic);
    }

    #[test]
    fn test_consistency_from_env() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("TRAVEL_ADMIN_BACKEND", "memory"),
            ("TRAVEL_ADMIN_CONSISTENCY", "reconcile"),
        ]))
        .unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.consistency, Consistency::Reconcile);

        let err = ConsoleConfig::from_lookup(lookup(&[("TRAVEL_ADMIN_CONSISTENCY", "strong")]))
            .unwrap_err();
        assert!(err.to_string().contains("strong"));
    }

    #[test]
    fn test_firestore_requires_project() {
        let err = ConsoleConfig::from_lookup(lookup(&[("TRAVEL_ADMIN_BACKEND", "firestore")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_firestore_config() {
        let config = ConsoleConfig::from_lookup(lookup(&[
            ("TRAVEL_ADMIN_BACKEND", "Firestore"),
            ("FIRESTORE_PROJECT_ID", "demo"),
            ("FIRESTORE_API_KEY", "key"),
        ]))
        .unwrap();

        match config.backend {
            Backend::Firestore(fs) => {
                assert_eq!(fs.database, "(default)");
                assert_eq!(
                    fs.documents_path(),
                    "projects/demo/databases/(default)/documents"
                );
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_backend() {
        let err =
            ConsoleConfig::from_lookup(lookup(&[("TRAVEL_ADMIN_BACKEND", "mongo")])).unwrap_err();
        assert!(err.to_string().contains("mongo"));
    }
}
