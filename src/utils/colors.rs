//! ANSI color helper utilities for terminal output.

use crate::models::session::SessionPhase;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Working → green, on break → yellow, clocked out → grey.
pub fn color_for_phase(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Working => GREEN,
        SessionPhase::OnBreak => YELLOW,
        SessionPhase::NotClockedIn => GREY,
    }
}

/// Greys out placeholder values ("--:--:--", "00:00:00").
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--:--:--" || value.trim() == "00:00:00" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
