//! triket-core: the state store behind the Triket ticket demo.
//!
//! One [`store::Store`] owns the whole application state machine — auth
//! session, ticket list, form errors, transient toasts — and is mutated only
//! through named actions. Every transition persists synchronously to a
//! [`storage::Storage`] backend and is broadcast to subscribers in
//! registration order. Simulated network latency sits behind the
//! [`clock::Clock`] trait so tests can run without waiting.

pub mod clock;
pub mod error;
pub mod id;
pub mod model;
pub mod seed;
pub mod state;
pub mod storage;
pub mod store;
pub mod validate;

pub use error::StoreError;
pub use state::AppState;
pub use store::Store;
