//! pay - paytrack command-line client
//!
//! Talks to the paytrack backend, keeps the login session refreshed, and
//! renders the dashboard as JSON.
//!
//! # Examples
//!
//! ```bash
//! # Log in (password from the environment)
//! PT_PASSWORD=secret pay auth login --email asha@example.com
//!
//! # Last 30 days of debits
//! pay dashboard --filter debit --last-days 30 --pretty
//!
//! # Pay beneficiary 7
//! pay payment send --beneficiary 7 --amount 250.50 --description "Dinner"
//! ```

mod app_error;
mod auth_commands;
mod beneficiary_commands;
mod cli;
mod cli_listener;
mod commands;
mod dashboard_commands;
mod logger;
mod output;
mod payment_commands;
mod session_commands;

use crate::{
    app_error::Result as AppResult, cli::Cli, cli_listener::CliSessionListener,
    commands::Commands, output::Output,
};

use pt_cli::Client;
use pt_config::{Config, LogLevel};

use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;

use clap::Parser;
use log::{debug, error};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let fallback = cli.command.failure_message();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {}", e.user_message(fallback));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    let mut config = Config::load()?;
    if let Some(server) = cli.server {
        config.api.base_url = server;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = LogLevel::from_str(&level).unwrap_or_default();
    }
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    config.log_summary();

    let listener = Arc::new(CliSessionListener::new());
    let expired = listener.expired();
    let client = Client::from_config(&config, listener)?;

    if let Some(user) = client.session().resume()? {
        debug!("Using cached session for {}", user.email);
    }

    let output = Output::new(cli.pretty);

    let value = match cli.command {
        Commands::Auth { action } => action.execute(&client).await?,
        Commands::Beneficiary { action } => action.execute(&client).await?,
        Commands::Payment { action } => action.execute(&client).await?,
        Commands::Dashboard(args) => args.execute(&client, &config.dashboard, output).await?,
        Commands::Session { action } => action.execute(&client, expired).await?,
    };

    output.print(&value)
}
