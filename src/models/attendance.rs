use serde::{Deserialize, Serialize};

/// Today's attendance record as reported by the attendance service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(alias = "id")]
    pub record_id: String,
    #[serde(default)]
    pub clock_in_time: Option<String>, // "HH:mm:ss", server local time
    #[serde(default)]
    pub clock_out_time: Option<String>,
    #[serde(default)]
    pub total_hours: Option<f64>,
}

impl AttendanceRecord {
    /// Clocked in on the server and not yet clocked out.
    pub fn is_open(&self) -> bool {
        self.clock_in_time.is_some() && self.clock_out_time.is_none()
    }

    pub fn is_closed(&self) -> bool {
        self.clock_out_time.is_some()
    }

    pub fn total_millis(&self) -> i64 {
        self.total_hours
            .map(|h| (h.max(0.0) * 3_600_000.0).round() as i64)
            .unwrap_or(0)
    }
}

/// Body of the clock-in / clock-out calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockRequest {
    pub employee_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    #[serde(alias = "id")]
    pub employee_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub id_number: Option<String>,
}
