//! Aura CLI - the portfolio site in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{auth, edit, logs, show, status, upload, view};

/// Aura - portfolio site with an admin content editor
#[derive(Parser)]
#[command(name = "aura", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the public page
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show content and identity summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current view
    View,

    /// Navigate to a view (home, login, signup, admin)
    Open {
        /// Target view
        view: String,
    },

    /// Register a new identity and log in
    Signup {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        governorate: Option<String>,
        #[arg(long)]
        whatsapp: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Security pin (prompted if omitted)
        #[arg(long, env = "AURA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Log in with a registered identity
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Security pin (prompted if omitted)
        #[arg(long, env = "AURA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the current session
    Logout,

    /// Show the logged-in identity
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit site content (admin only)
    Edit {
        #[command(subcommand)]
        command: edit::EditCommands,
    },

    /// Upload an image into a slot (hero, about_img or a record id)
    Upload {
        /// Slot to fill
        slot: String,
        /// Image file
        file: PathBuf,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr, filtered by `AURA_LOG` (default `warn`)
fn init_tracing() {
    let filter = EnvFilter::try_from_env("AURA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Show { json } => show::run(json),
        Commands::Status { json } => status::run(json),
        Commands::View => view::run_show(),
        Commands::Open { view } => view::run_open(&view),
        Commands::Signup {
            full_name,
            phone,
            governorate,
            whatsapp,
            email,
            password,
            json,
        } => auth::run_signup(auth::SignupArgs {
            full_name,
            phone,
            governorate,
            whatsapp,
            email,
            password,
            json,
        }),
        Commands::Login {
            email,
            password,
            json,
        } => auth::run_login(email, password, json),
        Commands::Logout => auth::run_logout(),
        Commands::Whoami { json } => auth::run_whoami(json),
        Commands::Edit { command } => edit::run(command),
        Commands::Upload { slot, file } => upload::run(&slot, &file),
        Commands::Logs { command } => logs::run(command),
    }
}
