//! Workforce Hub library root.
//! Exposes the work-session tracker, its collaborators (attendance
//! service client, SQLite state store) and the CLI dispatcher.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod service;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Status { .. } | Commands::Sync => {
            cli::commands::status::handle(&cli.command, cfg)
        }
        Commands::ClockIn { .. } | Commands::ClockOut { .. } => {
            cli::commands::clock::handle(&cli.command, cfg)
        }
        Commands::Break { .. } => cli::commands::break_cmd::handle(&cli.command, cfg),
        Commands::Watch { .. } => cli::commands::watch::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }
    if let Some(url) = &cli.api_url {
        cfg.api_base_url = url.clone();
    }

    dispatch(&cli, &cfg)
}
