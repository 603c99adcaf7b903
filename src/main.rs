mod auth;
mod calendar;
mod commands;
mod config;
mod error;
mod events;
mod secret;
mod token_store;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use auth::StdinCode;
use config::Config;

#[derive(Parser)]
#[command(name = "calkeep")]
#[command(about = "Keep a dedicated Google calendar and register events into it")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List upcoming events, then register an event into the dedicated calendar
    Run,
    /// Authorize against Google Calendar and store the credentials
    Auth,
    /// List upcoming events only
    List {
        /// Calendar to list (defaults to the account's primary calendar)
        #[arg(short, long, default_value = "primary")]
        calendar: String,

        /// How many events to list (defaults to the configured value)
        #[arg(short, long)]
        max: Option<i64>,
    },
    /// Register an event into the dedicated calendar, creating it if needed
    Add,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let codes = StdinCode;

    match cli.command {
        Commands::Run => commands::run::run(&config, &codes).await,
        Commands::Auth => commands::auth::run(&config, &codes).await,
        Commands::List { calendar, max } => {
            commands::list::run(&config, &codes, &calendar, max).await
        }
        Commands::Add => commands::add::run(&config, &codes).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_accepts_calendar_and_max() {
        let cli = Cli::try_parse_from(["calkeep", "list", "--calendar", "work", "--max", "5"])
            .unwrap();

        match cli.command {
            Commands::List { calendar, max } => {
                assert_eq!(calendar, "work");
                assert_eq!(max, Some(5));
            }
            _ => panic!("expected the list subcommand"),
        }
    }

    #[test]
    fn list_max_defaults_to_config() {
        let cli = Cli::try_parse_from(["calkeep", "list"]).unwrap();

        match cli.command {
            Commands::List { calendar, max } => {
                assert_eq!(calendar, "primary");
                assert_eq!(max, None);
            }
            _ => panic!("expected the list subcommand"),
        }
    }
}
