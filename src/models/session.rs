use super::break_type::BreakType;
use crate::utils::time::ZERO_HMS;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    NotClockedIn,
    Working,
    OnBreak,
}

impl SessionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionPhase::NotClockedIn => "not clocked in",
            SessionPhase::Working => "working",
            SessionPhase::OnBreak => "on break",
        }
    }
}

/// Persisted state of the current work session.
///
/// Saved as a whole after every mutation, so a restart picks up exactly
/// where the previous process stopped. Timestamps are epoch millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSessionState {
    pub is_clocked_in: bool,
    pub clock_in_at_ms: Option<i64>,
    pub attendance_record_id: Option<String>,
    pub total_break_ms: i64,
    pub active_break: Option<BreakType>,
    pub break_started_at_ms: Option<i64>,

    // display values, recomputed on every tick
    pub clock_in_display: String,
    pub current_time_display: String,
    pub hours_worked_display: String,
    pub break_display: String,
}

impl Default for WorkSessionState {
    fn default() -> Self {
        Self {
            is_clocked_in: false,
            clock_in_at_ms: None,
            attendance_record_id: None,
            total_break_ms: 0,
            active_break: None,
            break_started_at_ms: None,
            clock_in_display: "--:--:--".to_string(),
            current_time_display: "--:--:--".to_string(),
            hours_worked_display: ZERO_HMS.to_string(),
            break_display: ZERO_HMS.to_string(),
        }
    }
}

impl WorkSessionState {
    pub fn phase(&self) -> SessionPhase {
        if !self.is_clocked_in {
            SessionPhase::NotClockedIn
        } else if self.active_break.is_some() && self.break_started_at_ms.is_some() {
            SessionPhase::OnBreak
        } else {
            SessionPhase::Working
        }
    }

    pub fn is_on_break(&self) -> bool {
        self.phase() == SessionPhase::OnBreak
    }

    /// Net worked time at `now_ms`: wall time since clock-in minus breaks,
    /// never negative. Zero when not clocked in.
    pub fn worked_millis(&self, now_ms: i64) -> i64 {
        match (self.is_clocked_in, self.clock_in_at_ms) {
            (true, Some(start)) => (now_ms - start - self.total_break_ms).max(0),
            _ => 0,
        }
    }

    /// Drop break fields that cannot stand on their own (a break type
    /// without a start instant, or any break while not clocked in).
    pub fn normalize(mut self) -> Self {
        if !self.is_clocked_in {
            self.active_break = None;
            self.break_started_at_ms = None;
        }
        if self.active_break.is_none() || self.break_started_at_ms.is_none() {
            self.active_break = None;
            self.break_started_at_ms = None;
        }
        if self.total_break_ms < 0 {
            self.total_break_ms = 0;
        }
        self
    }

    /// Clear everything tied to the finished session. Displays that carry
    /// the final totals are left for the caller to set.
    pub fn close(&mut self) {
        self.is_clocked_in = false;
        self.clock_in_at_ms = None;
        self.attendance_record_id = None;
        self.total_break_ms = 0;
        self.active_break = None;
        self.break_started_at_ms = None;
        self.break_display = ZERO_HMS.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_clocked_in() {
        let s = WorkSessionState::default();
        assert_eq!(s.phase(), SessionPhase::NotClockedIn);
        assert_eq!(s.worked_millis(1_000_000), 0);
    }

    #[test]
    fn worked_time_excludes_breaks_and_clamps() {
        let s = WorkSessionState {
            is_clocked_in: true,
            clock_in_at_ms: Some(1_000),
            total_break_ms: 5_000,
            ..Default::default()
        };
        assert_eq!(s.worked_millis(11_000), 5_000);
        assert_eq!(s.worked_millis(2_000), 0);
    }

    #[test]
    fn normalize_drops_orphan_break_fields() {
        let s = WorkSessionState {
            is_clocked_in: false,
            active_break: Some(BreakType::LunchBreak),
            break_started_at_ms: Some(10),
            ..Default::default()
        }
        .normalize();
        assert_eq!(s.active_break, None);
        assert_eq!(s.break_started_at_ms, None);

        let s = WorkSessionState {
            is_clocked_in: true,
            clock_in_at_ms: Some(0),
            active_break: Some(BreakType::LunchBreak),
            break_started_at_ms: None,
            ..Default::default()
        }
        .normalize();
        assert_eq!(s.phase(), SessionPhase::Working);
    }
}
