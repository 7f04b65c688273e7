//! Fishtail CLI - the restaurant menu and account session in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::auth::AuthPage;
use commands::{auth, config, guard, logs, menu, nav, query, session};

/// Fishtail - browse the menu and inspect your session
#[derive(Parser)]
#[command(name = "ft", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu, optionally filtered
    Menu {
        /// Dietary filter (all, vegetarian, vegan, gluten-free, dairy-free)
        #[arg(long, default_value = "all")]
        diet: String,
        /// Section filter (all, appetizers, tandoori, biryani, everest, bread)
        #[arg(long, default_value = "all")]
        section: String,
        /// Read the menu payload from a JSON file instead of the backend
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// List the available filters
        #[arg(long)]
        filters: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current session
    Session {
        /// Location to initialize from, e.g. a post-login redirect URL
        #[arg(long)]
        url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the sign-in page
    Login {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the registration page
    Register {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the password recovery page
    ForgotPassword {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the email verification link for a token
    VerifyEmail {
        /// Verification token from the email
        token: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Sign out and clear the local session
    Logout {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the navigation for a role
    Nav {
        /// Role to preview (defaults to the signed-in user's)
        #[arg(long)]
        role: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether the current session may open a route
    Guard {
        /// Route to check, e.g. /admin/users
        route: String,
        /// Comma-separated roles allowed on the route (empty: any signed-in user)
        #[arg(long, value_delimiter = ',')]
        roles: Vec<String>,
        /// Treat the route as public
        #[arg(long, conflicts_with = "roles")]
        public: bool,
        /// Location to initialize the session from
        #[arg(long)]
        url: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the query parameters of a URL
    Query {
        /// URL to parse (hash-routed URLs supported)
        url: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Menu { diet, section, file, filters, json } => menu::run(menu::MenuArgs {
            diet,
            section,
            file,
            list_filters: filters,
            json,
        }),
        Commands::Session { url, json } => session::run(url.as_deref(), json),
        Commands::Login { json } => auth::open(AuthPage::Login, json),
        Commands::Register { json } => auth::open(AuthPage::Register, json),
        Commands::ForgotPassword { json } => auth::open(AuthPage::ForgotPassword, json),
        Commands::VerifyEmail { token, json } => auth::verify_email(&token, json),
        Commands::Logout { force, json } => auth::logout(force, json),
        Commands::Nav { role, json } => nav::run(role.as_deref(), json),
        Commands::Guard { route, roles, public, url, json } => guard::run(guard::GuardArgs {
            route,
            roles,
            public,
            url,
            json,
        }),
        Commands::Query { url, json } => query::run(&url, json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
