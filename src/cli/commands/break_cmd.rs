use super::{audit, build_tracker, finish};
use crate::cli::parser::{BreakAction, Commands};
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::break_type::BreakType;
use crate::ui::messages::{info, success, warning};
use crate::utils::time::format_hms;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Break { action } = cmd {
        let mut tracker = build_tracker(cfg, None)?;
        // fold a countdown that ran out while no process was running
        tracker.tick();

        match action {
            BreakAction::Start { kind } => {
                let break_type = BreakType::from_label(kind);

                if tracker.start_break(break_type) {
                    let detail = match break_type.nominal_duration() {
                        Some(_) => format!("{} started ({} left)", break_type, tracker.session().break_display),
                        None => format!("{} started", break_type),
                    };
                    audit(&tracker, "break_start", break_type.to_db_str(), &detail);
                    success(detail);
                } else if tracker.session().is_on_break() {
                    warning("A break is already running. End it first with `break end`.");
                } else {
                    warning("Not clocked in: break not started.");
                }
            }
            BreakAction::End => {
                let before = tracker.session().total_break_ms;

                if tracker.end_break() {
                    let taken = tracker.session().total_break_ms - before;
                    let detail = format!(
                        "Break ended after {} (total today {})",
                        format_hms(taken),
                        format_hms(tracker.session().total_break_ms)
                    );
                    audit(&tracker, "break_end", "", &detail);
                    success(detail);
                } else {
                    info("No break in progress.");
                }
            }
        }

        return finish(&mut tracker);
    }

    Ok(())
}
