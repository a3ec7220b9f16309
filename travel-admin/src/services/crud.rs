//! CRUD synchronizer
//!
//! Keeps a caller-owned [`Mirror`] consistent with a remote collection. The
//! service holds no view state of its own: every operation takes the mirror
//! it should patch.
//!
//! Writes are optimistic. After a successful remote call the mirror is
//! patched from what was sent, without waiting for a re-fetch, so
//! server-assigned timestamps only show up after the next `list`. Under
//! [`Consistency::Reconcile`] each mutation is followed by a re-fetch that
//! replaces the mirror and logs what diverged.

use super::mirror::{Mirror, MirrorDiff, Record};
use crate::error::{AppError, Result};
use crate::ids::TokenSource;
use crate::models::{Entity, Status};
use crate::remote::{Fields, RemoteCollection, WriteRequest};
use std::marker::PhantomData;
use std::sync::Arc;

/// What happens to the mirror after a successful write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Consistency {
    /// Keep the locally patched mirror; last writer wins
    #[default]
    Optimistic,
    /// Re-fetch and adopt the remote state after every write
    Reconcile,
}

impl Consistency {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "optimistic" => Some(Consistency::Optimistic),
            "reconcile" => Some(Consistency::Reconcile),
            _ => None,
        }
    }
}

pub struct CrudService<E: Entity> {
    remote: Arc<dyn RemoteCollection>,
    tokens: Arc<dyn TokenSource>,
    consistency: Consistency,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Clone for CrudService<E> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            tokens: Arc::clone(&self.tokens),
            consistency: self.consistency,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> CrudService<E> {
    pub fn new(remote: Arc<dyn RemoteCollection>, tokens: Arc<dyn TokenSource>) -> Self {
        Self {
            remote,
            tokens,
            consistency: Consistency::default(),
            _entity: PhantomData,
        }
    }

    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = consistency;
        self
    }

    pub fn consistency(&self) -> Consistency {
        self.consistency
    }

    /// Blank draft, with a fresh client token where the entity has one
    pub fn new_draft(&self) -> E {
        let token = E::SCHEMA.token_field.map(|_| self.tokens.next_token());
        E::blank(token)
    }

    /// Replace the mirror with the remote collection's contents.
    ///
    /// On failure the mirror is left exactly as it was.
    pub async fn list(&self, mirror: &mut Mirror<E>) -> Result<()> {
        let records = self.fetch().await?;
        tracing::debug!("Fetched {} {} records", records.len(), E::SCHEMA.label);
        mirror.replace_all(records);
        Ok(())
    }

    /// Create a remote document from `draft` and append it to the mirror.
    pub async fn create(&self, mirror: &mut Mirror<E>, draft: E) -> Result<String> {
        let schema = E::SCHEMA;
        let fields = draft.to_fields()?;

        if let Some(field) = schema.missing_required(&fields) {
            return Err(AppError::MissingField {
                entity: schema.label,
                field,
            });
        }

        let write = WriteRequest::new(fields).stamped(schema.create_stamps());
        let id = self.remote.create(write).await?;

        tracing::info!("Created {} {}", schema.label, id);
        mirror.push(Record::new(id.clone(), draft));

        self.after_write(mirror).await;
        Ok(id)
    }

    /// Write the draft's editable fields to the selected record.
    ///
    /// The status flag and timestamps are not part of an edit and stay as
    /// they are.
    pub async fn update(
        &self,
        mirror: &mut Mirror<E>,
        selected: Option<&str>,
        draft: &E,
    ) -> Result<()> {
        let id = selected
            .filter(|id| !id.is_empty())
            .ok_or(AppError::NoSelection(E::SCHEMA.label))?;

        let fields = E::SCHEMA.editable(&draft.to_fields()?);
        self.update_fields(mirror, id, fields).await
    }

    /// Overwrite only the given fields of a record, remotely then locally.
    pub async fn update_fields(
        &self,
        mirror: &mut Mirror<E>,
        id: &str,
        fields: Fields,
    ) -> Result<()> {
        let write = WriteRequest::new(fields.clone()).stamped(E::SCHEMA.update_stamps());
        self.remote.update(id, write).await?;

        if !mirror.patch(id, &fields)? {
            tracing::debug!("{} {} updated but not mirrored", E::SCHEMA.label, id);
        }

        tracing::info!("Updated {} {}", E::SCHEMA.label, id);
        self.after_write(mirror).await;
        Ok(())
    }

    /// Delete a record remotely and drop it from the mirror.
    pub async fn remove(&self, mirror: &mut Mirror<E>, id: &str) -> Result<()> {
        self.remote.delete(id).await?;
        mirror.remove(id);

        tracing::info!("Deleted {} {}", E::SCHEMA.label, id);
        self.after_write(mirror).await;
        Ok(())
    }

    /// Flip a record's status flag and return the new value.
    ///
    /// Only the flag (and `updated_at`, for timestamped entities) is
    /// written; the mirror is flipped without re-reading the remote.
    pub async fn toggle_status(&self, mirror: &mut Mirror<E>, id: &str) -> Result<Status> {
        let schema = E::SCHEMA;
        let field = schema.status.ok_or(AppError::NoStatusField(schema.label))?;

        let current = mirror
            .get(id)
            .and_then(|record| record.data.status())
            .ok_or_else(|| AppError::NotFound(format!("{} {}", schema.label, id)))?;
        let next = current.flipped();

        let mut fields = Fields::new();
        fields.insert(field.name.to_string(), next.to_value(field.repr));

        let write = WriteRequest::new(fields).stamped(schema.update_stamps());
        self.remote.update(id, write).await?;

        if let Some(record) = mirror.get_mut(id) {
            record.data.set_status(next);
        }

        tracing::info!("{} {} is now {}", schema.label, id, next);
        self.after_write(mirror).await;
        Ok(next)
    }

    /// Re-fetch the collection, report how the mirror diverged and adopt
    /// the remote state.
    pub async fn reconcile(&self, mirror: &mut Mirror<E>) -> Result<MirrorDiff> {
        let fresh = Mirror::from_records(self.fetch().await?);
        let diff = mirror.diff(&fresh);
        *mirror = fresh;
        Ok(diff)
    }

    async fn fetch(&self) -> Result<Vec<Record<E>>> {
        let documents = self.remote.list().await?;
        let mut records = Vec::with_capacity(documents.len());

        for document in documents {
            let key = document.key.clone();
            match Record::from_document(document) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!(
                    "Skipping undecodable {} document {}/{}: {}",
                    E::SCHEMA.label,
                    self.remote.name(),
                    key,
                    e
                ),
            }
        }

        Ok(records)
    }

    async fn after_write(&self, mirror: &mut Mirror<E>) {
        if self.consistency != Consistency::Reconcile {
            return;
        }

        match self.reconcile(mirror).await {
            Ok(diff) if diff.is_empty() => {
                tracing::debug!("{} mirror matches remote", E::SCHEMA.label);
            }
            Ok(diff) => {
                tracing::info!(
                    "{} mirror reconciled: {} added, {} removed, {} changed",
                    E::SCHEMA.label,
                    diff.added.len(),
                    diff.removed.len(),
                    diff.changed.len()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "Reconcile of {} failed, keeping local mirror: {}",
                    E::SCHEMA.label,
                    e
                );
            }
        }
    }
}
