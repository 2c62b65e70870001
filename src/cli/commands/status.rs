use super::{audit, build_tracker, finish, print_view};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// `status` and `sync`: optionally reconcile with the server, run one tick
/// so the displays are current, then print the session.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let (json, offline, is_sync) = match cmd {
        Commands::Status { json, offline } => (*json, *offline, false),
        Commands::Sync => (false, false, true),
        _ => return Ok(()),
    };

    let mut tracker = build_tracker(cfg, None)?;

    if !offline {
        tracker.check_today_attendance();
        if is_sync && tracker.error().is_none() {
            audit(
                &tracker,
                "sync",
                tracker.phase().as_str(),
                "Reconciled with today's attendance record",
            );
        }
    }
    tracker.tick();

    let view = tracker.view();
    if json {
        let out = serde_json::to_string_pretty(&view).map_err(|e| AppError::Other(e.to_string()))?;
        println!("{}", out);
    } else {
        print_view(&view);
    }

    finish(&mut tracker)
}
