//! Pure input validation for ticket forms and auth forms.
//!
//! No side effects and no state access. Each function either parses the
//! input into typed fields or returns a [`Validation`] carrying fixed,
//! field-keyed messages; the two outcomes are mutually exclusive.

use std::str::FromStr;

use crate::model::{Priority, Status, TicketDraft};
use crate::state::FormErrors;

/// Maximum title length in characters.
pub const MAX_TITLE_CHARS: usize = 100;
/// Maximum description length in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;
/// Minimum password length, enforced on signup only.
pub const MIN_SIGNUP_PASSWORD_CHARS: usize = 6;

/// A non-empty set of field errors from a failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    errors: FormErrors,
}

impl Validation {
    pub fn errors(&self) -> &FormErrors {
        &self.errors
    }

    pub fn into_errors(self) -> FormErrors {
        self.errors
    }
}

/// A ticket draft that passed validation, with enums parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTicket {
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub priority: Option<Priority>,
}

/// Which auth flow is being validated. Signup additionally enforces the
/// minimum password length; login deliberately does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthIntent {
    Login,
    Signup,
}

/// Validate a ticket draft.
///
/// Title is required (whitespace-only counts as empty); the length check
/// applies only when the title is non-empty, so the two title errors never
/// both fire. Status is required and must be a known value. Description and
/// priority are optional and only checked when present.
pub fn validate_ticket(draft: &TicketDraft) -> Result<ValidTicket, Validation> {
    let mut errors = FormErrors::new();

    if draft.title.trim().is_empty() {
        errors.insert("title", "Title is required");
    } else if draft.title.chars().count() > MAX_TITLE_CHARS {
        errors.insert("title", "Title must be less than 100 characters");
    }

    let status = match draft.status.as_deref() {
        None | Some("") => {
            errors.insert("status", "Status is required");
            None
        }
        Some(raw) => match Status::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.insert("status", "Status must be one of: open, in_progress, closed");
                None
            }
        },
    };

    if let Some(description) = draft.description.as_deref() {
        if !description.is_empty() && description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.insert("description", "Description must be less than 500 characters");
        }
    }

    let mut priority = None;
    if let Some(raw) = draft.priority.as_deref().filter(|raw| !raw.is_empty()) {
        match Priority::from_str(raw) {
            Ok(parsed) => priority = Some(parsed),
            Err(_) => {
                errors.insert("priority", "Priority must be one of: low, medium, high");
            }
        }
    }

    match status {
        Some(status) if errors.is_empty() => Ok(ValidTicket {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status,
            priority,
        }),
        _ => Err(Validation { errors }),
    }
}

/// Validate auth form input.
///
/// Email must look like `local@domain.tld`. Password is required for both
/// flows; the ≥6 character rule applies to signup only.
pub fn validate_auth(
    email: &str,
    password: &str,
    intent: AuthIntent,
) -> Result<(), Validation> {
    let mut errors = FormErrors::new();

    if email.trim().is_empty() {
        errors.insert("email", "Email is required");
    } else if !is_valid_email(email) {
        errors.insert("email", "Please enter a valid email address");
    }

    if password.trim().is_empty() {
        errors.insert("password", "Password is required");
    } else if intent == AuthIntent::Signup
        && password.chars().count() < MIN_SIGNUP_PASSWORD_CHARS
    {
        errors.insert("password", "Password must be at least 6 characters");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Validation { errors })
    }
}

/// Structural email check: a local part and a domain with a dot, none of
/// the segments empty or containing whitespace or a second `@`.
fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    let clean =
        |part: &str| !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@');
    clean(local) && clean(host) && clean(tld)
}
