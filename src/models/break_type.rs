use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Kind of break taken during a work session.
///
/// Timed breaks carry their nominal duration and count down to zero.
/// `Other` has no fixed end and counts up: free-form labels used to fall
/// back to a 15 minute countdown, but with a closed set of kinds `Other` is
/// the only open-ended break left, so it carries no duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakType {
    MorningBreak,
    LunchBreak,
    AfternoonBreak,
    Other,
}

impl BreakType {
    pub const ALL: [BreakType; 4] = [
        BreakType::MorningBreak,
        BreakType::LunchBreak,
        BreakType::AfternoonBreak,
        BreakType::Other,
    ];

    pub fn nominal_duration(&self) -> Option<Duration> {
        match self {
            BreakType::MorningBreak => Some(Duration::from_secs(15 * 60)),
            BreakType::LunchBreak => Some(Duration::from_secs(60 * 60)),
            BreakType::AfternoonBreak => Some(Duration::from_secs(60 * 60)),
            BreakType::Other => None,
        }
    }

    /// Nominal duration in milliseconds, if the break counts down.
    pub fn nominal_millis(&self) -> Option<i64> {
        self.nominal_duration().map(|d| d.as_millis() as i64)
    }

    pub fn is_countdown(&self) -> bool {
        self.nominal_duration().is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            BreakType::MorningBreak => "Morning Break",
            BreakType::LunchBreak => "Lunch Break",
            BreakType::AfternoonBreak => "Afternoon Break",
            BreakType::Other => "Other",
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            BreakType::MorningBreak => "morning",
            BreakType::LunchBreak => "lunch",
            BreakType::AfternoonBreak => "afternoon",
            BreakType::Other => "other",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(BreakType::MorningBreak),
            "lunch" => Some(BreakType::LunchBreak),
            "afternoon" => Some(BreakType::AfternoonBreak),
            "other" => Some(BreakType::Other),
            _ => None,
        }
    }

    /// Map a free-form label from the CLI or the server ("Lunch Break",
    /// "lunch", "morning-break", ...). Anything unrecognised is `Other`.
    pub fn from_label(label: &str) -> Self {
        let normalized: String = label
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.trim_end_matches("break") {
            "morning" => BreakType::MorningBreak,
            "lunch" => BreakType::LunchBreak,
            "afternoon" => BreakType::AfternoonBreak,
            _ => BreakType::Other,
        }
    }
}

impl fmt::Display for BreakType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
