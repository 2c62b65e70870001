//! Command handlers. Each one restores the tracker from the state
//! database, runs a single operation, reports and persists.

pub mod break_cmd;
pub mod clock;
pub mod config;
pub mod init;
pub mod log;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::core::{SystemClock, TrackerSettings, TrackerView, WorkSessionTracker};
use crate::db::log::ttlog;
use crate::db::session_store::SqliteSessionStore;
use crate::errors::{AppError, AppResult};
use crate::service::HttpAttendanceService;
use crate::ui::messages::{header, notify};
use crate::utils::colors::{RESET, color_for_phase, colorize_optional};

pub type CliTracker = WorkSessionTracker<HttpAttendanceService, SqliteSessionStore, SystemClock>;

/// Build a tracker on top of the configured state database and service.
pub fn build_tracker(cfg: &Config, remarks: Option<String>) -> AppResult<CliTracker> {
    let service = HttpAttendanceService::from_config(cfg)?;
    let store = SqliteSessionStore::open(cfg.database_path())?;

    let mut settings = TrackerSettings::from(cfg);
    if remarks.is_some() {
        settings.remarks = remarks;
    }

    Ok(WorkSessionTracker::new(service, store, SystemClock, settings))
}

/// Write an audit row; a failure here never fails the command.
pub fn audit(tracker: &CliTracker, operation: &str, target: &str, message: &str) {
    if let Err(e) = ttlog(&tracker.store().pool().conn, operation, target, message) {
        tracing::warn!(error = %e, "failed to write internal log");
    }
}

/// Print any pending notification, flush the session and turn a tracker
/// error into the command's result.
pub fn finish(tracker: &mut CliTracker) -> AppResult<()> {
    if let Some(n) = tracker.notification() {
        notify(n);
    }
    tracker.dismiss_notification();

    let result = match tracker.error() {
        Some(msg) => Err(AppError::Tracker(msg.to_string())),
        None => Ok(()),
    };

    tracker.shutdown();
    result
}

pub fn print_view(view: &TrackerView) {
    header("Work session");

    let color = color_for_phase(view.phase);
    println!("State      : {}{}{}", color, view.phase.as_str(), RESET);
    println!("Clock-in   : {}", colorize_optional(&view.clock_in_time));
    println!("Worked     : {}", colorize_optional(&view.hours_worked));

    match view.active_break {
        Some(b) => println!("Break      : {} {}", b.label(), view.break_time),
        None => println!("Break      : {}", colorize_optional("--:--:--")),
    }

    if let Some(id) = &view.attendance_record_id {
        println!("Record     : {}", id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;

    #[test]
    fn unusable_api_token_fails_as_service_error() {
        let cfg = Config {
            api_token: Some("line\nbreak".into()),
            ..Config::default()
        };

        let result = build_tracker(&cfg, None);
        assert!(matches!(
            result,
            Err(AppError::Service(ServiceError::Transport(_)))
        ));
    }
}
