use serde::{Deserialize, Serialize};

/// The signed-in user. Synthesized on login/signup, destroyed on logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// The session record persisted under `ticketapp_session`, independent of
/// the main state blob so a session can be restored without reparsing the
/// whole application state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user: User,
}

/// The part of an email address before the `@`, used as the default
/// display name.
#[must_use]
pub fn email_local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}
