use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::load_log;
use crate::db::session_store::SqliteSessionStore;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

/// ANSI color for an operation name
fn color_for_operation(op: &str) -> &'static str {
    match op {
        "clock_in" => GREEN,
        "clock_out" => RED,
        "break_start" | "break_end" => YELLOW,
        "migration_applied" | "init" | "sync" => CYAN,
        _ => RESET,
    }
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Log { print } = cmd
        && *print
    {
        let store = SqliteSessionStore::open(cfg.database_path())?;
        let entries = load_log(&store.pool().conn)?;

        if entries.is_empty() {
            println!("Log is empty.");
            return Ok(());
        }

        for e in entries {
            let date = chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(e.date);

            let op_target = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };

            println!(
                "{:>4}  {}  {}{:<40}{}  {}",
                e.id,
                date,
                color_for_operation(&e.operation),
                op_target,
                RESET,
                e.message
            );
        }
    }

    Ok(())
}
