#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, TimeZone};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;
use workforce_hub::core::{ManualClock, MemoryStore, TrackerSettings, WorkSessionTracker};
use workforce_hub::models::attendance::{AttendanceRecord, ClockRequest, EmployeeProfile};
use workforce_hub::service::{AttendanceService, ServiceError, ServiceResult};

/// Port nothing listens on; any request fails fast with a transport error.
pub const DEAD_API: &str = "http://127.0.0.1:9/api";

pub fn whub(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("workforce-hub");
    cmd.env("HOME", home)
        .env_remove("WORKFORCE_HUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

/// Isolated HOME plus a state database path inside it.
pub fn sandbox() -> (TempDir, String) {
    let home = tempfile::tempdir().expect("tempdir");
    let db: PathBuf = home.path().join("state.sqlite");
    (home, db.to_string_lossy().to_string())
}

/// Wall-clock instant on a fixed, DST-free day.
pub fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(2025, 6, 10, h, m, s).unwrap()
}

pub fn open_record(id: &str, clock_in: &str) -> AttendanceRecord {
    AttendanceRecord {
        record_id: id.to_string(),
        clock_in_time: Some(clock_in.to_string()),
        clock_out_time: None,
        total_hours: Some(0.0),
    }
}

pub fn closed_record(id: &str, hours: f64) -> AttendanceRecord {
    AttendanceRecord {
        record_id: id.to_string(),
        clock_in_time: Some("09:00:00".to_string()),
        clock_out_time: Some("17:00:00".to_string()),
        total_hours: Some(hours),
    }
}

pub struct FakeState {
    pub profile: ServiceResult<EmployeeProfile>,
    pub today: ServiceResult<Option<AttendanceRecord>>,
    pub clock_in: ServiceResult<AttendanceRecord>,
    pub clock_out: ServiceResult<AttendanceRecord>,
    pub calls: Vec<&'static str>,
    pub requests: Vec<ClockRequest>,
}

/// Scripted attendance service. Clones share state so the test can keep
/// a handle after moving one into the tracker.
#[derive(Clone)]
pub struct FakeService {
    state: Rc<RefCell<FakeState>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeState {
                profile: Ok(EmployeeProfile {
                    employee_id: "E-1".into(),
                    first_name: "Dana".into(),
                    last_name: "Reyes".into(),
                    id_number: Some("ID-77".into()),
                }),
                today: Ok(None),
                clock_in: Ok(open_record("att-1", "09:00:00")),
                clock_out: Ok(closed_record("att-1", 8.0)),
                calls: Vec::new(),
                requests: Vec::new(),
            })),
        }
    }
}

impl FakeService {
    pub fn set_today(&self, r: ServiceResult<Option<AttendanceRecord>>) {
        self.state.borrow_mut().today = r;
    }

    pub fn set_clock_in(&self, r: ServiceResult<AttendanceRecord>) {
        self.state.borrow_mut().clock_in = r;
    }

    pub fn set_clock_out(&self, r: ServiceResult<AttendanceRecord>) {
        self.state.borrow_mut().clock_out = r;
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.state.borrow().calls.clone()
    }

    pub fn requests(&self) -> Vec<ClockRequest> {
        self.state.borrow().requests.clone()
    }
}

impl AttendanceService for FakeService {
    fn profile(&self) -> ServiceResult<EmployeeProfile> {
        let mut s = self.state.borrow_mut();
        s.calls.push("profile");
        s.profile.clone()
    }

    fn today_attendance(&self) -> ServiceResult<Option<AttendanceRecord>> {
        let mut s = self.state.borrow_mut();
        s.calls.push("today");
        s.today.clone()
    }

    fn clock_in(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord> {
        let mut s = self.state.borrow_mut();
        s.calls.push("clock_in");
        s.requests.push(request.clone());
        s.clock_in.clone()
    }

    fn clock_out(&self, request: &ClockRequest) -> ServiceResult<AttendanceRecord> {
        let mut s = self.state.borrow_mut();
        s.calls.push("clock_out");
        s.requests.push(request.clone());
        s.clock_out.clone()
    }
}

pub type TestTracker = WorkSessionTracker<FakeService, MemoryStore, ManualClock>;

pub fn tracker_with(service: &FakeService, store: &MemoryStore, clock: &ManualClock) -> TestTracker {
    WorkSessionTracker::new(
        service.clone(),
        store.clone(),
        clock.clone(),
        TrackerSettings::default(),
    )
}

pub fn transport_error() -> ServiceError {
    ServiceError::Transport("connection refused".into())
}
