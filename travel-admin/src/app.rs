//! Application state and initialization
//!
//! Opens the configured document store and wires one console per managed
//! collection. Everything the manager screens need is reachable through
//! [`AppState`].

use crate::config::{Backend, ConsoleConfig};
use crate::console::{Console, Section};
use crate::database::{create_pool, Repository};
use crate::error::Result;
use crate::ids::{TokenSource, UuidTokens};
use crate::models::{Category, Entity, Place, Review, User};
use crate::remote::firestore::http_client;
use crate::remote::{FirestoreCollection, MemoryCollection, RemoteCollection, SqliteCollection};
use crate::services::{Consistency, CrudService};
use std::sync::Arc;

/// The four remote collections the console manages
#[derive(Clone)]
pub struct Collections {
    pub reviews: Arc<dyn RemoteCollection>,
    pub users: Arc<dyn RemoteCollection>,
    pub categories: Arc<dyn RemoteCollection>,
    pub places: Arc<dyn RemoteCollection>,
}

impl Collections {
    /// Build each section's collection from a per-name constructor
    pub fn from_fn<F>(mut make: F) -> Self
    where
        F: FnMut(&'static str) -> Arc<dyn RemoteCollection>,
    {
        Self {
            reviews: make(Section::Reviews.collection()),
            users: make(Section::Users.collection()),
            categories: make(Section::Categories.collection()),
            places: make(Section::Places.collection()),
        }
    }
}

/// Central application state holding one console per section
#[derive(Clone)]
pub struct AppState {
    pub reviews: Console<Review>,
    pub users: Console<User>,
    pub categories: Console<Category>,
    pub places: Console<Place>,
}

impl AppState {
    /// Open the configured backend and wire the consoles onto it.
    pub async fn open(config: &ConsoleConfig) -> Result<Self> {
        let collections = match &config.backend {
            Backend::Memory => {
                tracing::warn!("Using in-memory store, changes will not be kept");
                Collections::from_fn(|name| Arc::new(MemoryCollection::new(name)))
            }
            Backend::Sqlite { path } => {
                let repo = Repository::new(create_pool(path).await?);
                Collections::from_fn(|name| Arc::new(SqliteCollection::new(repo.clone(), name)))
            }
            Backend::Firestore(firestore) => {
                tracing::info!("Using Firestore project {}", firestore.project_id);
                let client = http_client()?;
                Collections::from_fn(|name| {
                    Arc::new(FirestoreCollection::new(
                        client.clone(),
                        firestore.clone(),
                        name,
                    ))
                })
            }
        };

        Ok(Self::with_collections(
            collections,
            Arc::new(UuidTokens),
            config.consistency,
        ))
    }

    pub fn with_collections(
        collections: Collections,
        tokens: Arc<dyn TokenSource>,
        consistency: Consistency,
    ) -> Self {
        Self {
            reviews: console(collections.reviews, &tokens, consistency),
            users: console(collections.users, &tokens, consistency),
            categories: console(collections.categories, &tokens, consistency),
            places: console(collections.places, &tokens, consistency),
        }
    }
}

fn console<E: Entity>(
    remote: Arc<dyn RemoteCollection>,
    tokens: &Arc<dyn TokenSource>,
    consistency: Consistency,
) -> Console<E> {
    Console::new(CrudService::new(remote, Arc::clone(tokens)).with_consistency(consistency))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_memory_backend() {
        let config = ConsoleConfig {
            backend: Backend::Memory,
            consistency: Consistency::Reconcile,
        };
        let state = AppState::open(&config).await.unwrap();

        assert_eq!(state.places.service().consistency(), Consistency::Reconcile);

        let mut view = state.places.new_view();
        state.places.load(&mut view).await;
        assert!(view.records.is_empty());
        assert!(view.error.is_none());
    }

    #[test]
    fn test_collections_match_entity_schemas() {
        let collections = Collections::from_fn(|name| Arc::new(MemoryCollection::new(name)));

        assert_eq!(collections.reviews.name(), Review::SCHEMA.collection);
        assert_eq!(collections.users.name(), User::SCHEMA.collection);
        assert_eq!(collections.categories.name(), Category::SCHEMA.collection);
        assert_eq!(collections.places.name(), Place::SCHEMA.collection);
    }

    #[tokio::test]
    async fn test_open_sqlite_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig {
            backend: Backend::Sqlite {
                path: dir.path().join("nested").join("admin.db"),
            },
            consistency: Consistency::Optimistic,
        };
        let state = AppState::open(&config).await.unwrap();

        let mut view = state.categories.new_view();
        state.categories.load(&mut view).await;
        assert!(view.error.is_none());
        assert!(dir.path().join("nested").join("admin.db").exists());
    }
}
