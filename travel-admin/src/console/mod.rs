//! Manager screen handlers
//!
//! A [`Console`] binds UI callbacks to a [`CrudService`]. Handlers mutate
//! the caller's [`ViewState`] and never return errors; failures end up in
//! the log and, when the user can act on them, in `ViewState::error`.
//!
//! Overlay transitions:
//! - `Closed -> Adding` (`open_add`), `Closed -> Editing` (`select_for_edit`)
//! - `Adding | Editing -> Closed` (`submit` succeeds, or `cancel`)
//! - `Closed -> ConfirmingDelete -> Closed` (`request_delete`, then
//!   `confirm_delete` or `cancel`)
//!
//! Anything else is ignored with a warning.

pub mod navigation;
pub mod state;

pub use navigation::Section;
pub use state::{ModalState, Toast, ViewState};

use crate::error::AppError;
use crate::models::Entity;
use crate::services::CrudService;
use chrono::Utc;

#[derive(Clone)]
pub struct Console<E: Entity> {
    service: CrudService<E>,
}

impl<E: Entity> Console<E> {
    pub fn new(service: CrudService<E>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &CrudService<E> {
        &self.service
    }

    /// Fresh view state with a blank draft and an empty table
    pub fn new_view(&self) -> ViewState<E> {
        ViewState::new(self.service.new_draft())
    }

    /// Populate the table from the remote collection
    pub async fn load(&self, view: &mut ViewState<E>) {
        view.loading = true;
        match self.service.list(&mut view.records).await {
            Ok(()) => view.error = None,
            Err(e) => self.report(view, "load", e),
        }
        view.loading = false;
    }

    pub fn open_add(&self, view: &mut ViewState<E>) {
        if !view.modal.is_closed() {
            tracing::warn!("open_add ignored while {:?}", view.modal);
            return;
        }
        view.draft = self.service.new_draft();
        view.modal = ModalState::Adding;
    }

    pub fn select_for_edit(&self, view: &mut ViewState<E>, id: &str) {
        if !view.modal.is_closed() {
            tracing::warn!("select_for_edit ignored while {:?}", view.modal);
            return;
        }
        let Some(record) = view.records.get(id) else {
            tracing::warn!("{} {} is not in the table", E::SCHEMA.label, id);
            return;
        };
        view.draft = record.data.clone();
        view.modal = ModalState::Editing { id: id.to_string() };
    }

    /// Close whatever overlay is open
    pub fn cancel(&self, view: &mut ViewState<E>) {
        view.modal = ModalState::Closed;
    }

    /// Save the draft: create when adding, update when editing.
    ///
    /// The form stays open on failure so the draft is not lost.
    pub async fn submit(&self, view: &mut ViewState<E>) {
        let label = E::SCHEMA.label;

        let result = match view.modal.clone() {
            ModalState::Adding => {
                let draft = view.draft.clone();
                self.service
                    .create(&mut view.records, draft)
                    .await
                    .map(|_| format!("{} added", label))
            }
            ModalState::Editing { id } => self
                .service
                .update(&mut view.records, Some(&id), &view.draft)
                .await
                .map(|_| format!("{} updated", label)),
            other => {
                tracing::warn!("submit ignored while {:?}", other);
                return;
            }
        };

        match result {
            Ok(message) => {
                view.modal = ModalState::Closed;
                view.draft = self.service.new_draft();
                view.error = None;
                view.toast = Some(Toast::new(message, Utc::now()));
            }
            Err(e) => self.report(view, "save", e),
        }
    }

    pub fn request_delete(&self, view: &mut ViewState<E>, id: &str) {
        if !view.modal.is_closed() {
            tracing::warn!("request_delete ignored while {:?}", view.modal);
            return;
        }
        view.modal = ModalState::ConfirmingDelete { id: id.to_string() };
    }

    pub async fn confirm_delete(&self, view: &mut ViewState<E>) {
        let ModalState::ConfirmingDelete { id } = view.modal.clone() else {
            tracing::warn!("confirm_delete ignored while {:?}", view.modal);
            return;
        };

        view.modal = ModalState::Closed;
        match self.service.remove(&mut view.records, &id).await {
            Ok(()) => {
                view.error = None;
                view.toast = Some(Toast::new(
                    format!("{} deleted", E::SCHEMA.label),
                    Utc::now(),
                ));
            }
            Err(e) => self.report(view, "delete", e),
        }
    }

    /// Flip a record's status flag from the table
    pub async fn toggle(&self, view: &mut ViewState<E>, id: &str) {
        match self.service.toggle_status(&mut view.records, id).await {
            Ok(_) => view.error = None,
            Err(e) => self.report(view, "update status of", e),
        }
    }

    fn report(&self, view: &mut ViewState<E>, action: &str, err: AppError) {
        let label = E::SCHEMA.label;

        if err.is_precondition() {
            tracing::warn!("Cannot {} {}: {}", action, label, err);
            return;
        }

        tracing::error!("Failed to {} {}: {}", action, label, err);
        view.error = Some(format!(
            "Failed to {} {}: {}",
            action,
            label.to_lowercase(),
            err
        ));
    }
}
