#![forbid(unsafe_code)]

//! `tk`: command-line front end for the Triket ticket store.
//!
//! Plays the role of the original page scripts: it restores the persisted
//! session on startup, dispatches one store action per invocation, and
//! prints the resulting toast to stderr.

mod output;
mod routes;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use output::OutputMode;
use triket_core::clock::SystemClock;
use triket_core::model::TicketDraft;
use triket_core::storage::FileStorage;
use triket_core::Store;

#[derive(Parser, Debug)]
#[command(author, version, about = "Triket: local-first ticket store demo", long_about = None)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Data directory holding the persisted store and session.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and persist a session.
    Login {
        email: String,
        password: String,
    },
    /// Create an account and persist a session.
    Signup {
        email: String,
        password: String,
        /// Display name; defaults to the email local part.
        #[arg(long)]
        name: Option<String>,
    },
    /// Drop the session and reset the demo data.
    Logout,
    /// Show the signed-in user, if any.
    Whoami,
    /// List all tickets, most recent first.
    List,
    /// Show one ticket.
    Show { id: String },
    /// Create a ticket.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Update a ticket. The draft must be fully valid even for partial
    /// edits.
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
    },
    /// Delete a ticket by id.
    Delete { id: String },
    /// Ticket counts by status.
    Stats,
    /// Resolve a path against the page routing table.
    Route {
        path: String,
        #[arg(long, value_enum, default_value_t = routes::Method::Get)]
        method: routes::Method,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose {
            "triket_core=debug,tk=debug,info"
        } else {
            "warn"
        })
    });
    fmt().with_env_filter(filter).with_target(false).init();

    let mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    // `route` needs no store; everything else does.
    if let Commands::Route { path, method } = &cli.command {
        let page = routes::resolve(*method, path);
        return output::render(mode, &page, |page, w| {
            output::kv(w, "template", page.template)?;
            output::kv(w, "title", page.title)?;
            output::kv(w, "status", page.status.to_string())
        });
    }

    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };
    let storage = FileStorage::open(&data_dir)
        .with_context(|| format!("opening data directory {}", data_dir.display()))?;
    let mut store = Store::new(Box::new(storage), Box::new(SystemClock))?;

    // Mirror the page scripts: try to restore the session on every start.
    let restored = store.restore_session();
    tracing::debug!(restored, data_dir = %data_dir.display(), "store ready");

    run_command(&cli.command, &mut store, mode)?;

    if let Some(toast) = &store.state().toast {
        output::print_toast(toast);
    }
    Ok(())
}

fn run_command(command: &Commands, store: &mut Store, mode: OutputMode) -> Result<()> {
    match command {
        Commands::Route { .. } => Ok(()),

        Commands::Login { email, password } => {
            if !store.login(email, password)? {
                fail_with_form_errors(store)?;
            }
            Ok(())
        }

        Commands::Signup {
            email,
            password,
            name,
        } => {
            if !store.signup(email, password, name.as_deref())? {
                fail_with_form_errors(store)?;
            }
            Ok(())
        }

        Commands::Logout => {
            store.logout()?;
            Ok(())
        }

        Commands::Whoami => match &store.state().user {
            Some(user) => output::render(mode, user, |user, w| {
                output::kv(w, "id", &user.id)?;
                output::kv(w, "email", &user.email)?;
                output::kv(w, "name", &user.name)
            }),
            None => {
                println!("Not signed in.");
                Ok(())
            }
        },

        Commands::List => {
            let tickets = store.state().tickets.clone();
            output::render(mode, &tickets, |tickets, w| {
                for ticket in tickets {
                    output::ticket_line(w, ticket)?;
                }
                Ok(())
            })
        }

        Commands::Show { id } => {
            let ticket = store
                .state()
                .tickets
                .iter()
                .find(|ticket| ticket.id == *id)
                .cloned()
                .with_context(|| format!("no ticket with id '{id}'"))?;
            output::render(mode, &ticket, |ticket, w| output::ticket_detail(w, ticket))
        }

        Commands::Create {
            title,
            description,
            status,
            priority,
        } => {
            let draft = TicketDraft {
                title: title.clone(),
                description: description.clone(),
                status: status.clone(),
                priority: priority.clone(),
            };
            match store.create_ticket(&draft)? {
                Some(ticket) => {
                    output::render(mode, &ticket, |ticket, w| output::ticket_detail(w, ticket))
                }
                None => fail_with_form_errors(store),
            }
        }

        Commands::Update {
            id,
            title,
            description,
            status,
            priority,
        } => {
            let draft = TicketDraft {
                title: title.clone().unwrap_or_default(),
                description: description.clone(),
                status: status.clone(),
                priority: priority.clone(),
            };
            if !store.update_ticket(id, &draft)? {
                fail_with_form_errors(store)?;
            }
            Ok(())
        }

        Commands::Delete { id } => {
            store.delete_ticket(id)?;
            Ok(())
        }

        Commands::Stats => {
            let stats = store.stats();
            output::render(mode, &stats, |stats, w| {
                output::kv(w, "total", stats.total.to_string())?;
                output::kv(w, "open", stats.open.to_string())?;
                output::kv(w, "in_progress", stats.in_progress.to_string())?;
                output::kv(w, "closed", stats.closed.to_string())
            })
        }
    }
}

/// Print field errors to stderr and exit non-zero, leaving the toast to the
/// normal epilogue.
fn fail_with_form_errors(store: &Store) -> Result<()> {
    for (field, message) in &store.state().form_errors {
        eprintln!("{field}: {message}");
    }
    if let Some(toast) = &store.state().toast {
        output::print_toast(toast);
    }
    bail!("validation failed");
}

fn default_data_dir() -> Result<PathBuf> {
    let base = dirs::data_dir().context("no platform data directory available")?;
    Ok(base.join("triket"))
}
