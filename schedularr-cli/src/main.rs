mod commands;
mod logging;
mod render;
mod utils;

use std::time::Duration;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use owo_colors::OwoColorize;

#[derive(Parser)]
#[command(name = "schedularr")]
#[command(version, about = "Book time on a shared Google Calendar")]
struct Cli {
    /// More log output on stderr (-v debug, -vv trace). RUST_LOG wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to Google, sign out, or show who is signed in
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Read and change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Set up the booking calendar
    Calendar {
        #[command(subcommand)]
        action: CalendarAction,
    },
    /// Share the booking calendar with collaborators
    Share {
        #[command(subcommand)]
        action: ShareAction,
    },
    /// Show end time and fee for a booking without sending anything
    Quote {
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM, on a quarter hour)
        #[arg(long)]
        time: String,

        /// Duration in hours (e.g. 1.5) or as "90m", "2h 15m"
        #[arg(long, value_parser = utils::parse_duration_hours)]
        duration: f64,
    },
    /// Add a booking to the calendar
    Book {
        /// Event title (prompted for when omitted)
        #[arg(long)]
        title: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Start time (HH:MM, on a quarter hour)
        #[arg(long)]
        time: String,

        /// Duration in hours (e.g. 1.5) or as "90m", "2h 15m"
        #[arg(long, value_parser = utils::parse_duration_hours)]
        duration: f64,

        /// Optional note added to the event description
        #[arg(long)]
        note: Option<String>,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with Google in the browser
    Login {
        /// Give up waiting for the browser after this long
        #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
        timeout: Duration,

        /// Print the sign-in URL instead of opening a browser
        #[arg(long)]
        no_browser: bool,
    },
    /// Revoke the token and forget the session
    Logout {
        /// Also reset all settings to their defaults
        #[arg(long)]
        purge: bool,
    },
    /// Show the signed-in account
    Status,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print every setting
    Show,
    /// Print one setting
    Get { key: String },
    /// Change one setting
    Set { key: String, value: String },
    /// Print where settings and the session are stored
    Path,
}

#[derive(Subcommand)]
enum CalendarAction {
    /// Use the calendar with this name, creating it if needed
    Ensure {
        /// Calendar name (defaults to the calendarName setting)
        #[arg(long)]
        name: Option<String>,
    },
    /// Always create a new calendar, picking a free name ("X", "X 1", ...)
    Create {
        #[arg(long)]
        name: Option<String>,
    },
    /// List the calendars on the account
    List,
    /// Print the embed URL of the booking calendar
    Embed,
}

#[derive(Subcommand)]
enum ShareAction {
    /// Give someone edit access to the booking calendar
    Add { email: String },
    /// List the people the calendar is shared with
    List,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Auth { action } => match action {
            AuthAction::Login {
                timeout,
                no_browser,
            } => commands::auth::login(timeout, no_browser).await,
            AuthAction::Logout { purge } => commands::auth::logout(purge).await,
            AuthAction::Status => commands::auth::status(),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Get { key } => commands::config::get(&key),
            ConfigAction::Set { key, value } => commands::config::set(&key, &value),
            ConfigAction::Path => commands::config::path(),
        },
        Commands::Calendar { action } => match action {
            CalendarAction::Ensure { name } => commands::calendar::ensure(name).await,
            CalendarAction::Create { name } => commands::calendar::create(name).await,
            CalendarAction::List => commands::calendar::list().await,
            CalendarAction::Embed => commands::calendar::embed(),
        },
        Commands::Share { action } => match action {
            ShareAction::Add { email } => commands::share::add(&email).await,
            ShareAction::List => commands::share::list().await,
        },
        Commands::Quote {
            date,
            time,
            duration,
        } => commands::quote::run(&date, &time, duration),
        Commands::Book {
            title,
            date,
            time,
            duration,
            note,
        } => commands::book::run(title, date, time, duration, note).await,
    }
}
