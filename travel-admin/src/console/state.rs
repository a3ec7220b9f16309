//! View state owned by the presentation layer
//!
//! Everything a manager screen renders: the mirrored table, the form draft,
//! which overlay is open, and any message to show.

use crate::config::TOAST_DURATION_MS;
use crate::services::Mirror;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Which overlay is showing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Closed,
    Adding,
    Editing {
        id: String,
    },
    ConfirmingDelete {
        id: String,
    },
}

impl ModalState {
    pub fn is_closed(&self) -> bool {
        matches!(self, ModalState::Closed)
    }

    /// Add or edit form is showing
    pub fn is_form_open(&self) -> bool {
        matches!(self, ModalState::Adding | ModalState::Editing { .. })
    }
}

/// Transient success message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub expires_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(message: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            message: message.into(),
            expires_at: now + Duration::milliseconds(TOAST_DURATION_MS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewState<E> {
    pub records: Mirror<E>,
    pub draft: E,
    pub modal: ModalState,
    pub loading: bool,
    pub error: Option<String>,
    pub toast: Option<Toast>,
}

impl<E> ViewState<E> {
    pub fn new(draft: E) -> Self {
        Self {
            records: Mirror::default(),
            draft,
            modal: ModalState::Closed,
            loading: false,
            error: None,
            toast: None,
        }
    }

    /// Drop the toast once its lifetime has passed. Returns true if one was dropped.
    pub fn clear_expired_toast(&mut self, now: DateTime<Utc>) -> bool {
        if self.toast.as_ref().is_some_and(|t| t.is_expired(now)) {
            self.toast = None;
            return true;
        }
        false
    }
}
