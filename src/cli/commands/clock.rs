use super::{audit, build_tracker, finish, print_view};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::ClockIn { remarks } => {
            let mut tracker = build_tracker(cfg, remarks.clone())?;
            let was_clocked_in = tracker.session().is_clocked_in;

            tracker.clock_in();

            if tracker.error().is_none() && tracker.session().is_clocked_in && !was_clocked_in {
                audit(
                    &tracker,
                    "clock_in",
                    tracker.session().attendance_record_id.as_deref().unwrap_or(""),
                    &format!("Clocked in at {}", tracker.session().clock_in_display),
                );
                print_view(&tracker.view());
            }
            finish(&mut tracker)
        }
        Commands::ClockOut { remarks } => {
            let mut tracker = build_tracker(cfg, remarks.clone())?;
            // settle a countdown that ran out since the last invocation
            tracker.tick();
            let record = tracker.session().attendance_record_id.clone();

            tracker.clock_out();

            if tracker.error().is_none() {
                audit(
                    &tracker,
                    "clock_out",
                    record.as_deref().unwrap_or(""),
                    &format!("Total worked {}", tracker.session().hours_worked_display),
                );
            }
            finish(&mut tracker)
        }
        _ => Ok(()),
    }
}
