//! Domain model: tickets, users, and session records.

pub mod ticket;
pub mod user;

pub use ticket::{ParseEnumError, Priority, Status, Ticket, TicketDraft, TicketStats};
pub use user::{SessionRecord, User};
