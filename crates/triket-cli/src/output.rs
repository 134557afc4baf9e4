//! Output layer: human-readable tables or stable JSON, shared by every
//! subcommand.

use std::io::{self, Write};

use serde::Serialize;
use triket_core::model::Ticket;
use triket_core::state::Toast;

/// How a command renders its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render `value` as pretty JSON, or fall back to the `human` closure.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode.is_json() {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        human(value, &mut out)?;
    }
    Ok(())
}

/// A left-aligned key/value line for human output.
pub fn kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// One-line ticket summary used by `list`.
pub fn ticket_line(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    let priority = ticket
        .priority
        .map_or_else(|| "-".to_string(), |p| p.to_string());
    writeln!(
        w,
        "{:<14} {:<12} {:<8} {}",
        ticket.id, ticket.status, priority, ticket.title
    )
}

/// Full ticket detail used by `show`.
pub fn ticket_detail(w: &mut dyn Write, ticket: &Ticket) -> io::Result<()> {
    kv(w, "id", &ticket.id)?;
    kv(w, "title", &ticket.title)?;
    kv(w, "status", ticket.status.to_string())?;
    kv(
        w,
        "priority",
        ticket
            .priority
            .map_or_else(|| "-".to_string(), |p| p.to_string()),
    )?;
    if let Some(description) = &ticket.description {
        kv(w, "description", description)?;
    }
    kv(w, "created", ticket.created_at.to_rfc3339())?;
    kv(w, "updated", ticket.updated_at.to_rfc3339())
}

/// Toasts go to stderr so they never pollute JSON output on stdout.
pub fn print_toast(toast: &Toast) {
    let kind = match toast.kind {
        triket_core::state::ToastKind::Success => "success",
        triket_core::state::ToastKind::Error => "error",
        triket_core::state::ToastKind::Info => "info",
    };
    eprintln!("[{kind}] {}", toast.message);
}
