//! End-to-end store flows: persistence fallback, auth, CRUD, and the
//! logout demo-reset, driven through a manual clock so no test waits.

use std::time::Duration;

use triket_core::clock::{ManualClock, AUTH_LATENCY, MUTATION_LATENCY};
use triket_core::model::{SessionRecord, Status, TicketDraft, User};
use triket_core::state::ToastKind;
use triket_core::storage::{MemoryStorage, Storage, SESSION_KEY, STATE_KEY};
use triket_core::Store;

fn store_over(storage: &MemoryStorage, clock: &ManualClock) -> Store {
    Store::new(Box::new(storage.clone()), Box::new(clock.clone())).expect("store")
}

fn valid_draft(title: &str) -> TicketDraft {
    TicketDraft {
        title: title.to_string(),
        description: Some("details".to_string()),
        status: Some("open".to_string()),
        priority: Some("medium".to_string()),
    }
}

#[test]
fn fresh_store_with_empty_storage_loads_the_seed() {
    let store = store_over(&MemoryStorage::default(), &ManualClock::default());

    let tickets = &store.state().tickets;
    assert_eq!(tickets.len(), 3);
    let ids: Vec<_> = tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert!(!store.state().is_authenticated);
}

#[test]
fn corrupt_state_blob_falls_back_to_the_seed_without_failing() {
    let storage = MemoryStorage::default();
    storage.set(STATE_KEY, "not json {{").expect("seed corruption");

    let store = store_over(&storage, &ManualClock::default());
    assert_eq!(store.state().tickets.len(), 3);

    // Construction rewrites the blob, so a second store parses cleanly.
    let raw = storage.get(STATE_KEY).expect("get").expect("present");
    assert!(raw.contains("\"isAuthenticated\":false"));
}

#[test]
fn persisted_tickets_round_trip_across_construction() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();

    let created = {
        let mut store = store_over(&storage, &clock);
        store
            .create_ticket(&valid_draft("Persist me"))
            .expect("create")
            .expect("valid")
    };

    let reopened = store_over(&storage, &clock);
    assert_eq!(reopened.state().tickets.len(), 4);
    assert_eq!(reopened.state().tickets[0], created);
}

#[test]
fn login_synthesizes_a_user_and_a_session() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();
    let mut store = store_over(&storage, &clock);

    assert!(store.login("a@b.com", "secret").expect("login"));

    let state = store.state();
    assert!(state.is_authenticated);
    let user = state.user.as_ref().expect("user");
    assert_eq!(user.name, "a");
    assert_eq!(user.email, "a@b.com");

    let toast = state.toast.as_ref().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "Welcome back, a!");

    assert_eq!(clock.slept(), vec![AUTH_LATENCY]);

    let raw = storage.get(SESSION_KEY).expect("get").expect("record");
    let record: SessionRecord = serde_json::from_str(&raw).expect("parse");
    assert!(record.token.starts_with("token_"));
    assert_eq!(record.user.email, "a@b.com");
}

#[test]
fn login_validation_failure_skips_delay_and_storage() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();
    let mut store = store_over(&storage, &clock);

    assert!(!store.login("not-an-email", "pw").expect("login"));

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(!state.loading);
    assert_eq!(
        state.form_errors.get("email"),
        Some(&"Please enter a valid email address")
    );
    assert_eq!(state.toast.as_ref().expect("toast").kind, ToastKind::Error);

    assert!(clock.slept().is_empty(), "no latency on validation failure");
    assert_eq!(storage.get(SESSION_KEY).expect("get"), None);
}

#[test]
fn short_password_fails_signup_but_not_login() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());

    assert!(!store.signup("x@y.com", "short", None).expect("signup"));
    assert_eq!(
        store.state().form_errors.get("password"),
        Some(&"Password must be at least 6 characters")
    );
    assert!(!store.state().is_authenticated);

    assert!(store.login("x@y.com", "short").expect("login"));
    assert!(store.state().is_authenticated);
}

#[test]
fn signup_defaults_the_name_to_the_email_local_part() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());

    assert!(store.signup("x@y.com", "longenough", None).expect("signup"));
    assert_eq!(store.state().user.as_ref().expect("user").name, "x");
    assert_eq!(
        store.state().toast.as_ref().expect("toast").message,
        "Account created! Welcome, x!"
    );

    store.logout().expect("logout");
    assert!(store.signup("x@y.com", "longenough", Some("Xavier")).expect("signup"));
    assert_eq!(store.state().user.as_ref().expect("user").name, "Xavier");
}

#[test]
fn restore_session_reads_the_independent_record() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();

    {
        let mut store = store_over(&storage, &clock);
        assert!(store.login("a@b.com", "secret").expect("login"));
    }

    let mut store = store_over(&storage, &clock);
    assert!(store.restore_session());
    assert!(store.state().is_authenticated);
    assert_eq!(store.state().user.as_ref().expect("user").email, "a@b.com");
}

#[test]
fn restore_session_discards_a_corrupt_record() {
    let storage = MemoryStorage::default();
    storage.set(SESSION_KEY, "{broken").expect("corrupt");

    let mut store = store_over(&storage, &ManualClock::default());
    assert!(!store.restore_session());
    assert!(!store.state().is_authenticated);
    assert_eq!(storage.get(SESSION_KEY).expect("get"), None, "record removed");
}

#[test]
fn restore_session_without_a_record_is_false() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());
    assert!(!store.restore_session());
    assert!(!store.state().is_authenticated);
}

#[test]
fn created_tickets_are_prepended_with_equal_timestamps() {
    let clock = ManualClock::default();
    let mut store = store_over(&MemoryStorage::default(), &clock);

    let ticket = store
        .create_ticket(&valid_draft("Newest"))
        .expect("create")
        .expect("valid");

    assert_eq!(ticket.created_at, ticket.updated_at);
    assert_eq!(store.state().tickets.len(), 4);
    assert_eq!(store.state().tickets[0], ticket);
    assert_eq!(store.state().tickets[1].id, "1");
    assert_eq!(clock.slept(), vec![MUTATION_LATENCY]);
    assert!(store.state().form_errors.is_empty());
    assert_eq!(
        store.state().toast.as_ref().expect("toast").message,
        "Ticket created successfully!"
    );
}

#[test]
fn invalid_create_leaves_tickets_untouched() {
    let clock = ManualClock::default();
    let mut store = store_over(&MemoryStorage::default(), &clock);
    let before = store.state().tickets.clone();

    let result = store
        .create_ticket(&TicketDraft::default())
        .expect("create");

    assert!(result.is_none());
    assert_eq!(store.state().tickets, before);
    assert!(!store.state().form_errors.is_empty());
    assert!(clock.slept().is_empty());
}

#[test]
fn update_merges_fields_and_refreshes_updated_at() {
    let clock = ManualClock::default();
    let mut store = store_over(&MemoryStorage::default(), &clock);
    let original = store.state().tickets[0].clone();

    clock.advance(Duration::from_secs(3600));
    let draft = TicketDraft {
        title: "Fix login bug properly".to_string(),
        description: None,
        status: Some("in_progress".to_string()),
        priority: None,
    };
    assert!(store.update_ticket("1", &draft).expect("update"));

    let updated = &store.state().tickets[0];
    assert_eq!(updated.title, "Fix login bug properly");
    assert_eq!(updated.status, Status::InProgress);
    // Optional fields absent from the draft keep their old values.
    assert_eq!(updated.description, original.description);
    assert_eq!(updated.priority, original.priority);
    assert_eq!(updated.created_at, original.created_at);
    assert!(updated.updated_at > original.updated_at);
    assert!(store.state().current_ticket.is_none());
}

#[test]
fn update_requires_a_fully_valid_draft_even_for_partial_edits() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());
    let before = store.state().tickets.clone();

    // Retitling without a status still fails full-object validation.
    let draft = TicketDraft {
        title: "Just a retitle".to_string(),
        ..TicketDraft::default()
    };
    assert!(!store.update_ticket("1", &draft).expect("update"));
    assert_eq!(
        store.state().form_errors.get("status"),
        Some(&"Status is required")
    );
    assert_eq!(store.state().tickets, before);
}

#[test]
fn update_of_an_unknown_id_is_a_silent_no_op() {
    let clock = ManualClock::default();
    let mut store = store_over(&MemoryStorage::default(), &clock);
    let before = store.state().tickets.clone();

    assert!(store.update_ticket("missing", &valid_draft("x")).expect("update"));
    assert_eq!(store.state().tickets, before);
    assert_eq!(
        store.state().toast.as_ref().expect("toast").kind,
        ToastKind::Success
    );
    assert_eq!(clock.slept(), vec![MUTATION_LATENCY]);
}

#[test]
fn delete_removes_exactly_one_ticket_by_id() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());

    store.delete_ticket("2").expect("delete");
    let ids: Vec<_> = store.state().tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1", "3"]);

    // Absent id: length unchanged, success toast anyway.
    store.delete_ticket("2").expect("delete again");
    assert_eq!(store.state().tickets.len(), 2);
    assert_eq!(
        store.state().toast.as_ref().expect("toast").message,
        "Ticket deleted successfully!"
    );
}

#[test]
fn current_ticket_selection_is_a_stale_copy_by_design() {
    let mut store = store_over(&MemoryStorage::default(), &ManualClock::default());
    let selected = store.state().tickets[0].clone();
    store.set_current_ticket(Some(selected.clone())).expect("select");

    store.delete_ticket("1").expect("delete");
    // The selection survives the deletion of the underlying ticket.
    assert_eq!(store.state().current_ticket.as_ref(), Some(&selected));

    store.set_current_ticket(None).expect("clear");
    assert!(store.state().current_ticket.is_none());
}

#[test]
fn logout_resets_tickets_to_seed() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();
    let mut store = store_over(&storage, &clock);

    assert!(store.login("a@b.com", "secret").expect("login"));
    store
        .create_ticket(&valid_draft("Fourth"))
        .expect("create")
        .expect("valid");
    assert_eq!(store.state().tickets.len(), 4);

    store.logout().expect("logout");

    let state = store.state();
    assert!(!state.is_authenticated);
    assert!(state.user.is_none());
    // Demo reset: session-created tickets are discarded with the session.
    let ids: Vec<_> = state.tickets.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(state.toast.as_ref().expect("toast").kind, ToastKind::Info);
    assert_eq!(storage.get(SESSION_KEY).expect("get"), None);
}

#[test]
fn transient_fields_are_never_persisted() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();
    let mut store = store_over(&storage, &clock);

    assert!(!store.login("", "").expect("login"));
    assert!(store.state().toast.is_some());

    let raw = storage.get(STATE_KEY).expect("get").expect("blob");
    let value: serde_json::Value = serde_json::from_str(&raw).expect("parse");
    let object = value.as_object().expect("object");
    assert_eq!(object.len(), 3);
    for key in ["tickets", "user", "isAuthenticated"] {
        assert!(object.contains_key(key), "missing {key}");
    }
    for key in ["loading", "formErrors", "toast"] {
        assert!(!object.contains_key(key), "unexpected {key}");
    }
}

#[test]
fn persisted_user_survives_reconstruction() {
    let storage = MemoryStorage::default();
    let clock = ManualClock::default();

    let user = {
        let mut store = store_over(&storage, &clock);
        assert!(store.login("a@b.com", "secret").expect("login"));
        store.state().user.clone().expect("user")
    };

    let reopened = store_over(&storage, &clock);
    assert!(reopened.state().is_authenticated);
    assert_eq!(reopened.state().user.as_ref(), Some(&user));
    let _: &User = reopened.state().user.as_ref().expect("user");
}
