//! The fixed fallback dataset: three example tickets, ids `"1"`–`"3"`.
//!
//! Used whenever the persisted blob is absent or unparsable, and restored
//! wholesale by logout.

use chrono::{DateTime, TimeZone, Utc};

use crate::model::{Priority, Status, Ticket};

/// The three seed tickets, most-recently-created ordering preserved from
/// the original dataset.
#[must_use]
pub fn seed_tickets() -> Vec<Ticket> {
    vec![
        Ticket {
            id: "1".to_string(),
            title: "Fix login bug".to_string(),
            description: Some("Users cannot log in with correct credentials".to_string()),
            status: Status::Open,
            priority: Some(Priority::High),
            created_at: day(2025, 10, 20),
            updated_at: day(2025, 10, 20),
        },
        Ticket {
            id: "2".to_string(),
            title: "Update dashboard UI".to_string(),
            description: Some("Redesign dashboard with modern components".to_string()),
            status: Status::InProgress,
            priority: Some(Priority::Medium),
            created_at: day(2025, 10, 21),
            updated_at: day(2025, 10, 22),
        },
        Ticket {
            id: "3".to_string(),
            title: "Add email notifications".to_string(),
            description: Some("Send email when ticket status changes".to_string()),
            status: Status::Closed,
            priority: Some(Priority::Low),
            created_at: day(2025, 10, 18),
            updated_at: day(2025, 10, 23),
        },
    ]
}

fn day(year: i32, month: u32, dom: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, dom, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
