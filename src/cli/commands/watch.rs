use super::{build_tracker, finish};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::TrackerView;
use crate::errors::AppResult;
use crate::models::session::SessionPhase;
use crate::ui::messages::{info, notify};
use crate::utils::colors::{RESET, color_for_phase};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

fn render(view: &TrackerView) {
    let color = color_for_phase(view.phase);
    let brk = match view.active_break {
        Some(b) => format!("  {} {}", b.label(), view.break_time),
        None => String::new(),
    };
    print!(
        "\r{}{:<15}{} {}  worked {}{}   ",
        color,
        view.phase.as_str(),
        RESET,
        view.current_time,
        view.hours_worked,
        brk
    );
    let _ = io::stdout().flush();
}

/// Drive the tracker's timers in the foreground until the session ends
/// or `--seconds` elapse.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Watch { seconds, offline } = cmd {
        let mut tracker = build_tracker(cfg, None)?;
        if !*offline {
            tracker.check_today_attendance();
        }

        let updates = tracker.subscribe();
        let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
        let interval = cfg.tick_interval();

        loop {
            tracker.tick();

            if let Some(view) = updates.try_iter().last() {
                render(&view);
            }
            if let Some(n) = tracker.notification() {
                println!();
                notify(n);
                tracker.dismiss_notification();
                let _ = updates.try_iter().count();
            }

            if tracker.phase() == SessionPhase::NotClockedIn {
                println!();
                info("Not clocked in.");
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                println!();
                break;
            }

            thread::sleep(interval);
        }

        return finish(&mut tracker);
    }

    Ok(())
}
