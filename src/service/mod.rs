//! Attendance service seam.
//!
//! The tracker only talks to the backend through `AttendanceService`, so
//! tests can hand it a fake and the CLI hands it the HTTP client.

pub mod http;

use crate::models::attendance::{AttendanceRecord, ClockRequest, EmployeeProfile};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

pub use http::HttpAttendanceService;

static ALREADY_CLOCKED_IN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)already\s+clocked[\s-]*in").expect("static regex is valid")
});

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// The backend refuses a second clock-in for today either with a 400
    /// whose body says so, or with an error message carrying the phrase.
    pub fn is_already_clocked_in(&self) -> bool {
        match self {
            ServiceError::Status { status: 400, body } => ALREADY_CLOCKED_IN.is_match(body),
            other => ALREADY_CLOCKED_IN.is_match(&other.to_string()),
        }
    }

    /// Message suitable for the tracker's `error` observable.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Transport(msg) => format!("Network error: {msg}"),
            ServiceError::Status { status, body } if body.trim().is_empty() => {
                format!("Request failed with status {status}")
            }
            ServiceError::Status { status, body } => {
                format!("Request failed with status {status}: {}", body.trim())
            }
            ServiceError::Decode(msg) => format!("Unexpected response from server: {msg}"),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub trait AttendanceService {
    /// Profile of the signed-in employee; needed for the employee id.
    fn profile(&self) -> ServiceResult<EmployeeProfile>;

    /// Today's record, `None` when the employee has not clocked in today.
    fn today_attendance(&self) -> ServiceResult<Option<AttendanceRecord>>;

    fn clock_in(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord>;

    fn clock_out(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord>;
}
