//! The single root application state and the patch type used to mutate it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Ticket, User};

/// Field-keyed validation messages surfaced to forms.
///
/// Both keys and messages are fixed strings chosen by the validation layer.
pub type FormErrors = BTreeMap<&'static str, &'static str>;

/// Severity of a transient notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

/// A transient user-facing notification. Written once per action and
/// replaced (or cleared) by the next one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            message: message.into(),
        }
    }
}

/// The root state object. Owned exclusively by the store; callers only ever
/// see shared borrows of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub tickets: Vec<Ticket>,
    /// Transient selection (e.g. for an edit form). A copy, not a live
    /// reference: editing the underlying ticket elsewhere does not refresh
    /// it.
    pub current_ticket: Option<Ticket>,
    pub loading: bool,
    pub form_errors: FormErrors,
    pub toast: Option<Toast>,
}

/// A shallow-merge update to [`AppState`].
///
/// `None` leaves a field untouched. Nullable state fields are doubly
/// wrapped so a patch can distinguish "leave alone" (`None`) from "clear"
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub user: Option<Option<User>>,
    pub is_authenticated: Option<bool>,
    pub tickets: Option<Vec<Ticket>>,
    pub current_ticket: Option<Option<Ticket>>,
    pub loading: Option<bool>,
    pub form_errors: Option<FormErrors>,
    pub toast: Option<Option<Toast>>,
}

impl StatePatch {
    /// Merge this patch into `state`, field by field.
    pub fn apply(self, state: &mut AppState) {
        if let Some(user) = self.user {
            state.user = user;
        }
        if let Some(is_authenticated) = self.is_authenticated {
            state.is_authenticated = is_authenticated;
        }
        if let Some(tickets) = self.tickets {
            state.tickets = tickets;
        }
        if let Some(current_ticket) = self.current_ticket {
            state.current_ticket = current_ticket;
        }
        if let Some(loading) = self.loading {
            state.loading = loading;
        }
        if let Some(form_errors) = self.form_errors {
            state.form_errors = form_errors;
        }
        if let Some(toast) = self.toast {
            state.toast = toast;
        }
    }
}
