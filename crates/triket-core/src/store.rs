//! The state container and its auth/CRUD actions.
//!
//! The [`Store`] owns one [`AppState`], mutates it only through
//! [`Store::set_state`], persists `{tickets, user, isAuthenticated}` after
//! every mutation, and notifies subscribers in registration order. Actions
//! take `&mut self`, so each store runs at most one action at a time.
//!
//! Failure model: validation problems and corrupt persisted data are
//! values, surfaced through `form_errors` and toasts; only the storage
//! backend can produce a [`StoreError`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, AUTH_LATENCY, MUTATION_LATENCY};
use crate::error::StoreError;
use crate::id::generate_id;
use crate::model::user::email_local_part;
use crate::model::{SessionRecord, Ticket, TicketDraft, TicketStats, User};
use crate::seed::seed_tickets;
use crate::state::{AppState, FormErrors, StatePatch, Toast};
use crate::storage::{Storage, SESSION_KEY, STATE_KEY};
use crate::validate::{validate_auth, validate_ticket, AuthIntent, Validation};

/// Handle returned by [`Store::subscribe`]; pass it to
/// [`Store::unsubscribe`] to remove exactly that listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    callback: Box<dyn FnMut(&AppState)>,
}

/// The durable subset of [`AppState`]. `loading`, `form_errors`, and
/// `toast` are transient by design and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default = "seed_tickets")]
    tickets: Vec<Ticket>,
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
}

/// The application state store.
pub struct Store {
    state: AppState,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
}

impl Store {
    /// Build a store over the given backends, loading persisted state.
    ///
    /// An absent or unparsable `ticket-store` blob falls back to the seed
    /// dataset; parse failures are logged, never propagated. The loaded
    /// state is persisted once so storage and memory agree from the start.
    pub fn new(storage: Box<dyn Storage>, clock: Box<dyn Clock>) -> Result<Self, StoreError> {
        let mut state = AppState::default();

        match storage.get(STATE_KEY)? {
            Some(raw) => match serde_json::from_str::<PersistedState>(&raw) {
                Ok(persisted) => {
                    state.tickets = persisted.tickets;
                    state.user = persisted.user;
                    state.is_authenticated = persisted.is_authenticated;
                }
                Err(err) => {
                    warn!(error = %err, "failed to parse persisted state, using seed data");
                    state.tickets = seed_tickets();
                }
            },
            None => state.tickets = seed_tickets(),
        }

        let mut store = Self {
            state,
            storage,
            clock,
            subscribers: Vec::new(),
            next_subscriber: 0,
        };
        store.persist()?;
        Ok(store)
    }

    /// The current state. Read-only: all mutation goes through actions.
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Ticket counts by status for the current state.
    #[must_use]
    pub fn stats(&self) -> TicketStats {
        TicketStats::from_tickets(&self.state.tickets)
    }

    /// Shallow-merge `patch` into the state, persist the durable subset,
    /// then notify every subscriber. Synchronous and unbatched: each call
    /// is a complete, immediately-visible transition.
    pub fn set_state(&mut self, patch: StatePatch) -> Result<(), StoreError> {
        patch.apply(&mut self.state);
        self.persist()?;

        let state = &self.state;
        for subscriber in &mut self.subscribers {
            (subscriber.callback)(state);
        }
        Ok(())
    }

    /// Register a listener invoked with the full new state on every
    /// `set_state`.
    pub fn subscribe(&mut self, listener: impl FnMut(&AppState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers.push(Subscriber {
            id,
            callback: Box::new(listener),
        });
        id
    }

    /// Remove the listener registered under `id`. Removing an already
    /// removed listener is a no-op.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|subscriber| subscriber.id != id);
    }

    // ------------------------------------------------------------------
    // Auth actions
    // ------------------------------------------------------------------

    /// Log in. Returns `Ok(false)` on validation failure, before any delay
    /// or storage activity.
    pub fn login(&mut self, email: &str, password: &str) -> Result<bool, StoreError> {
        self.begin_action()?;

        if let Err(validation) = validate_auth(email, password, AuthIntent::Login) {
            self.fail_validation(validation)?;
            return Ok(false);
        }

        self.clock.sleep(AUTH_LATENCY);
        let user = self.synthesize_user(email, None);
        self.open_session(&user)?;

        let message = format!("Welcome back, {}!", user.name);
        self.finish_auth(user, message)?;
        Ok(true)
    }

    /// Sign up. Same flow as [`Store::login`] but the minimum password
    /// length is enforced and a display name may be supplied.
    pub fn signup(
        &mut self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<bool, StoreError> {
        self.begin_action()?;

        if let Err(validation) = validate_auth(email, password, AuthIntent::Signup) {
            self.fail_validation(validation)?;
            return Ok(false);
        }

        self.clock.sleep(AUTH_LATENCY);
        let user = self.synthesize_user(email, name);
        self.open_session(&user)?;

        let message = format!("Account created! Welcome, {}!", user.name);
        self.finish_auth(user, message)?;
        Ok(true)
    }

    /// Log out: drop the session record and reset to the signed-out state.
    ///
    /// The ticket list is reset to the seed dataset as well — deliberate
    /// demo behaviour, so a session's created tickets do not outlive it.
    pub fn logout(&mut self) -> Result<(), StoreError> {
        self.storage.remove(SESSION_KEY)?;
        debug!("logged out");
        self.set_state(StatePatch {
            user: Some(None),
            is_authenticated: Some(false),
            tickets: Some(seed_tickets()),
            current_ticket: Some(None),
            toast: Some(Some(Toast::info("You have been logged out"))),
            ..StatePatch::default()
        })
    }

    /// Restore a previously persisted session, if any. A corrupt record is
    /// discarded. Never fails: storage problems are logged and treated as
    /// "no session".
    pub fn restore_session(&mut self) -> bool {
        let raw = match self.storage.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                warn!(error = %err, "failed to read session record");
                return false;
            }
        };

        match serde_json::from_str::<SessionRecord>(&raw) {
            Ok(record) => {
                debug!(user = %record.user.email, "session restored");
                let patch = StatePatch {
                    user: Some(Some(record.user)),
                    is_authenticated: Some(true),
                    ..StatePatch::default()
                };
                if let Err(err) = self.set_state(patch) {
                    warn!(error = %err, "failed to persist restored session");
                }
                true
            }
            Err(err) => {
                warn!(error = %err, "discarding corrupt session record");
                if let Err(err) = self.storage.remove(SESSION_KEY) {
                    warn!(error = %err, "failed to remove corrupt session record");
                }
                false
            }
        }
    }

    // ------------------------------------------------------------------
    // Ticket actions
    // ------------------------------------------------------------------

    /// Create a ticket from form input. Returns `Ok(None)` on validation
    /// failure (no delay, no mutation beyond `form_errors` and the toast).
    /// The created ticket is prepended, keeping most-recent-first order.
    pub fn create_ticket(&mut self, draft: &TicketDraft) -> Result<Option<Ticket>, StoreError> {
        self.begin_action()?;

        let valid = match validate_ticket(draft) {
            Ok(valid) => valid,
            Err(validation) => {
                self.fail_validation(validation)?;
                return Ok(None);
            }
        };

        self.clock.sleep(MUTATION_LATENCY);
        let now = self.clock.now();
        let ticket = Ticket {
            id: generate_id(now),
            title: valid.title,
            description: valid.description,
            status: valid.status,
            priority: valid.priority,
            created_at: now,
            updated_at: now,
        };
        debug!(id = %ticket.id, "ticket created");

        let mut tickets = Vec::with_capacity(self.state.tickets.len() + 1);
        tickets.push(ticket.clone());
        tickets.extend(self.state.tickets.iter().cloned());

        self.set_state(StatePatch {
            tickets: Some(tickets),
            loading: Some(false),
            form_errors: Some(FormErrors::new()),
            toast: Some(Some(Toast::success("Ticket created successfully!"))),
            ..StatePatch::default()
        })?;
        Ok(Some(ticket))
    }

    /// Update the ticket with `id` from form input. The draft must pass
    /// full-object validation even for partial edits. An unknown id is a
    /// silent no-op; the success toast fires either way. Returns whether
    /// validation passed.
    pub fn update_ticket(&mut self, id: &str, draft: &TicketDraft) -> Result<bool, StoreError> {
        self.begin_action()?;

        let valid = match validate_ticket(draft) {
            Ok(valid) => valid,
            Err(validation) => {
                self.fail_validation(validation)?;
                return Ok(false);
            }
        };

        self.clock.sleep(MUTATION_LATENCY);
        let now = self.clock.now();

        let mut tickets = self.state.tickets.clone();
        if let Some(ticket) = tickets.iter_mut().find(|ticket| ticket.id == id) {
            ticket.title = valid.title;
            ticket.status = valid.status;
            // Merge semantics: absent optional fields keep their old value.
            if let Some(description) = valid.description {
                ticket.description = Some(description);
            }
            if let Some(priority) = valid.priority {
                ticket.priority = Some(priority);
            }
            ticket.updated_at = now;
            debug!(%id, "ticket updated");
        } else {
            debug!(%id, "update for unknown ticket ignored");
        }

        self.set_state(StatePatch {
            tickets: Some(tickets),
            loading: Some(false),
            form_errors: Some(FormErrors::new()),
            current_ticket: Some(None),
            toast: Some(Some(Toast::success("Ticket updated successfully!"))),
            ..StatePatch::default()
        })?;
        Ok(true)
    }

    /// Delete the ticket with `id`. No validation; an unknown id is a
    /// no-op and the success toast still fires.
    pub fn delete_ticket(&mut self, id: &str) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            loading: Some(true),
            ..StatePatch::default()
        })?;

        self.clock.sleep(MUTATION_LATENCY);
        let tickets: Vec<Ticket> = self
            .state
            .tickets
            .iter()
            .filter(|ticket| ticket.id != id)
            .cloned()
            .collect();
        debug!(%id, remaining = tickets.len(), "ticket deleted");

        self.set_state(StatePatch {
            tickets: Some(tickets),
            loading: Some(false),
            toast: Some(Some(Toast::success("Ticket deleted successfully!"))),
            ..StatePatch::default()
        })
    }

    /// Select (or clear) the ticket backing an edit form. Synchronous.
    pub fn set_current_ticket(&mut self, ticket: Option<Ticket>) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            current_ticket: Some(ticket),
            form_errors: Some(FormErrors::new()),
            ..StatePatch::default()
        })
    }

    /// Dismiss the current toast, if any.
    pub fn clear_toast(&mut self) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            toast: Some(None),
            ..StatePatch::default()
        })
    }

    /// Drop all form errors.
    pub fn clear_form_errors(&mut self) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            form_errors: Some(FormErrors::new()),
            ..StatePatch::default()
        })
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn persist(&mut self) -> Result<(), StoreError> {
        let blob = serde_json::to_string(&PersistedState {
            tickets: self.state.tickets.clone(),
            user: self.state.user.clone(),
            is_authenticated: self.state.is_authenticated,
        })?;
        self.storage.set(STATE_KEY, &blob)
    }

    fn begin_action(&mut self) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            loading: Some(true),
            form_errors: Some(FormErrors::new()),
            ..StatePatch::default()
        })
    }

    fn fail_validation(&mut self, validation: Validation) -> Result<(), StoreError> {
        self.set_state(StatePatch {
            loading: Some(false),
            form_errors: Some(validation.into_errors()),
            toast: Some(Some(Toast::error("Please fix the errors in the form"))),
            ..StatePatch::default()
        })
    }

    fn synthesize_user(&self, email: &str, name: Option<&str>) -> User {
        let name = name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| email_local_part(email));
        User {
            id: generate_id(self.clock.now()),
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    fn open_session(&mut self, user: &User) -> Result<(), StoreError> {
        let record = SessionRecord {
            token: format!("token_{}", generate_id(self.clock.now())),
            user: user.clone(),
        };
        self.storage.set(SESSION_KEY, &serde_json::to_string(&record)?)
    }

    fn finish_auth(&mut self, user: User, message: String) -> Result<(), StoreError> {
        debug!(email = %user.email, "authenticated");
        self.set_state(StatePatch {
            user: Some(Some(user)),
            is_authenticated: Some(true),
            loading: Some(false),
            toast: Some(Some(Toast::success(message))),
            ..StatePatch::default()
        })
    }
}
