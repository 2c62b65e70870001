//! Work-session tracker.
//!
//! Single owner of the clock-in / break state. Every operation re-derives
//! the displayed durations from the absolute timestamps in
//! `WorkSessionState`, persists the whole state, then publishes a fresh
//! `TrackerView` to subscribers. Failures never escape: they end up in
//! the `error` field (or as a warning notification for the
//! "already clocked in" conflict).

use super::clock::Clock;
use super::store::SessionStore;
use super::timer::{TimerHandle, TimerKind, TimerSet};
use crate::config::Config;
use crate::errors::AppError;
use crate::models::attendance::{AttendanceRecord, ClockRequest, EmployeeProfile};
use crate::models::break_type::BreakType;
use crate::models::notification::Notification;
use crate::models::session::{SessionPhase, WorkSessionState};
use crate::service::AttendanceService;
use crate::utils::time::{ZERO_HMS, format_clock, format_hms, resolve_server_clock_in};
use serde::Serialize;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Knobs the tracker takes from configuration.
#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub tick_interval: Duration,
    pub remarks: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            remarks: None,
            latitude: None,
            longitude: None,
        }
    }
}

impl From<&Config> for TrackerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            tick_interval: cfg.tick_interval(),
            remarks: cfg.default_remarks.clone(),
            latitude: cfg.latitude,
            longitude: cfg.longitude,
        }
    }
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerView {
    pub phase: SessionPhase,
    pub is_clocked_in: bool,
    pub clock_in_time: String,
    pub current_time: String,
    pub hours_worked: String,
    pub break_time: String,
    pub active_break: Option<BreakType>,
    pub attendance_record_id: Option<String>,
    pub total_break_ms: i64,
    pub is_loading: bool,
    pub error: Option<String>,
    pub notification: Option<Notification>,
}

pub struct WorkSessionTracker<A, S, C>
where
    A: AttendanceService,
    S: SessionStore,
    C: Clock,
{
    service: A,
    store: S,
    clock: C,
    settings: TrackerSettings,
    session: WorkSessionState,
    timers: TimerSet,
    work_timer: Option<TimerHandle>,
    break_timer: Option<TimerHandle>,
    is_loading: bool,
    error: Option<String>,
    notification: Option<Notification>,
    subscribers: Vec<Sender<TrackerView>>,
}

impl<A, S, C> WorkSessionTracker<A, S, C>
where
    A: AttendanceService,
    S: SessionStore,
    C: Clock,
{
    /// Restore the persisted session and resume whichever timer matches it.
    pub fn new(service: A, store: S, clock: C, settings: TrackerSettings) -> Self {
        let (session, restore_error) = match store.load() {
            Ok(s) => (s.normalize(), None),
            Err(e) => {
                error!(error = %e, "failed to restore work session");
                (
                    WorkSessionState::default(),
                    Some(format!("Could not restore session: {e}")),
                )
            }
        };

        let timers = TimerSet::new(settings.tick_interval);
        let mut tracker = Self {
            service,
            store,
            clock,
            settings,
            session,
            timers,
            work_timer: None,
            break_timer: None,
            is_loading: false,
            error: restore_error,
            notification: None,
            subscribers: Vec::new(),
        };

        debug!(phase = tracker.phase().as_str(), "work session restored");
        tracker.resume_timers();
        tracker.expire_elapsed_countdown();
        tracker
    }

    // ------------------------------------------------
    // Accessors
    // ------------------------------------------------

    pub fn session(&self) -> &WorkSessionState {
        &self.session
    }

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn service(&self) -> &A {
        &self.service
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_timer_running(&self, kind: TimerKind) -> bool {
        self.timers.is_running(kind)
    }

    pub fn view(&self) -> TrackerView {
        TrackerView {
            phase: self.session.phase(),
            is_clocked_in: self.session.is_clocked_in,
            clock_in_time: self.session.clock_in_display.clone(),
            current_time: self.session.current_time_display.clone(),
            hours_worked: self.session.hours_worked_display.clone(),
            break_time: self.session.break_display.clone(),
            active_break: self.session.active_break,
            attendance_record_id: self.session.attendance_record_id.clone(),
            total_break_ms: self.session.total_break_ms,
            is_loading: self.is_loading,
            error: self.error.clone(),
            notification: self.notification.clone(),
        }
    }

    /// Receive a `TrackerView` after every change, starting with the
    /// current one. Dropped receivers are pruned on the next publish.
    pub fn subscribe(&mut self) -> Receiver<TrackerView> {
        let (tx, rx) = mpsc::channel();
        if tx.send(self.view()).is_ok() {
            self.subscribers.push(tx);
        }
        rx
    }

    // ------------------------------------------------
    // Remote operations
    // ------------------------------------------------

    /// Reconcile with today's record on the server.
    pub fn check_today_attendance(&mut self) {
        self.error = None;
        self.set_loading(true);
        let outcome = self.service.today_attendance();
        self.set_loading(false);

        match outcome {
            Ok(Some(record)) if record.is_closed() => {
                info!(record = %record.record_id, "today's attendance already closed");
                self.cancel_timers();
                self.session.close();
                self.session.hours_worked_display = format_hms(record.total_millis());
                self.persist();
            }
            Ok(Some(record)) if record.is_open() => self.adopt_open_record(record),
            Ok(_) => {
                if self.session.is_clocked_in {
                    warn!("server has no open record for today, closing local session");
                }
                self.cancel_timers();
                self.session.close();
                self.session.hours_worked_display = ZERO_HMS.to_string();
                self.persist();
            }
            Err(e) => {
                warn!(error = %e, "attendance reconciliation failed");
                self.error = Some(e.user_message());
            }
        }

        self.publish();
    }

    pub fn clock_in(&mut self) {
        self.error = None;
        self.set_loading(true);
        let outcome = self
            .service
            .profile()
            .and_then(|p| self.service.clock_in(&self.clock_request(&p)));
        self.set_loading(false);

        match outcome {
            Ok(record) => {
                let now = self.clock.now_millis();
                self.cancel_timers();

                self.session.is_clocked_in = true;
                self.session.clock_in_at_ms = Some(now);
                self.session.attendance_record_id = Some(record.record_id.clone());
                self.session.total_break_ms = 0;
                self.session.active_break = None;
                self.session.break_started_at_ms = None;
                self.session.clock_in_display = format_clock(now);
                self.session.hours_worked_display = ZERO_HMS.to_string();
                self.session.break_display = ZERO_HMS.to_string();

                self.start_timer(TimerKind::Work);
                self.persist();

                info!(record = %record.record_id, "clocked in");
                self.notification = Some(Notification::success(
                    "Clocked In",
                    format!("Clocked in at {}", self.session.clock_in_display),
                ));
            }
            Err(e) if e.is_already_clocked_in() => {
                warn!("clock-in rejected: already clocked in");
                self.notification = Some(Notification::warning(
                    "Already Clocked In",
                    "You have already clocked in today.",
                ));
            }
            Err(e) => {
                warn!(error = %e, "clock-in failed");
                self.error = Some(e.user_message());
            }
        }

        self.publish();
    }

    pub fn clock_out(&mut self) {
        self.error = None;

        if self.session.attendance_record_id.is_none() {
            debug!("clock-out without an active attendance record");
            self.error = Some(AppError::NoActiveRecord.to_string());
            self.publish();
            return;
        }

        let now = self.clock.now_millis();
        self.cancel_timers();
        if self.session.is_on_break() {
            self.finish_break(now);
        }
        self.session.hours_worked_display = format_hms(self.session.worked_millis(now));
        self.persist();

        self.set_loading(true);
        let outcome = self
            .service
            .profile()
            .and_then(|p| self.service.clock_out(&self.clock_request(&p)));
        self.set_loading(false);

        match outcome {
            Ok(record) => {
                info!(record = %record.record_id, hours = ?record.total_hours, "clocked out");
                self.session.close();
                self.session.hours_worked_display = format_hms(record.total_millis());
                self.persist();
                self.notification = Some(Notification::success(
                    "Clocked Out",
                    format!("Total worked: {}", self.session.hours_worked_display),
                ));
            }
            Err(e) => {
                warn!(error = %e, "clock-out failed, resuming work timer");
                self.error = Some(e.user_message());
                if self.session.is_clocked_in {
                    self.start_timer(TimerKind::Work);
                }
            }
        }

        self.publish();
    }

    // ------------------------------------------------
    // Local operations
    // ------------------------------------------------

    /// Start a break. Returns false (and changes nothing) unless the
    /// session is currently `Working`.
    pub fn start_break(&mut self, break_type: BreakType) -> bool {
        if self.phase() != SessionPhase::Working {
            debug!(phase = self.phase().as_str(), "start_break ignored");
            return false;
        }

        let now = self.clock.now_millis();
        self.stop_timer(TimerKind::Work);

        self.session.active_break = Some(break_type);
        self.session.break_started_at_ms = Some(now);
        self.session.break_display = format_hms(break_type.nominal_millis().unwrap_or(0));

        self.start_timer(TimerKind::Break);
        self.persist();
        info!(break_type = break_type.label(), "break started");

        self.publish();
        true
    }

    /// End the current break. Returns false when no break is active.
    pub fn end_break(&mut self) -> bool {
        if !self.session.is_on_break() {
            return false;
        }

        let now = self.clock.now_millis();
        self.finish_break(now);
        self.resume_work(now);
        self.persist();

        self.publish();
        true
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.publish();
    }

    /// Cancel both timers and flush the session. Call before dropping the
    /// tracker at shutdown.
    pub fn shutdown(&mut self) {
        self.cancel_timers();
        self.persist();
    }

    // ------------------------------------------------
    // Timers
    // ------------------------------------------------

    /// Run whichever timer ticks are due. Drive this from the host loop
    /// at least once per tick interval.
    pub fn tick(&mut self) {
        let now = self.clock.now_millis();
        let due = self.timers.due(now);
        if due.is_empty() {
            return;
        }

        for kind in due {
            // an earlier tick in this batch may have cancelled this one
            if !self.handle_for(kind).is_some_and(|h| self.timers.is_active(h)) {
                continue;
            }
            match kind {
                TimerKind::Work => self.on_work_tick(now),
                TimerKind::Break => self.on_break_tick(now),
            }
        }

        self.persist();
        self.publish();
    }

    fn on_work_tick(&mut self, now: i64) {
        self.session.current_time_display = format_clock(now);
        self.session.hours_worked_display = format_hms(self.session.worked_millis(now));
    }

    fn on_break_tick(&mut self, now: i64) {
        let (Some(break_type), Some(started)) =
            (self.session.active_break, self.session.break_started_at_ms)
        else {
            self.stop_timer(TimerKind::Break);
            return;
        };

        self.session.current_time_display = format_clock(now);

        match break_type.nominal_millis() {
            Some(nominal) => {
                let remaining = started + nominal - now;
                if remaining <= 0 {
                    self.session.break_display = ZERO_HMS.to_string();
                    self.publish();

                    info!(break_type = break_type.label(), "break countdown elapsed");
                    self.finish_break(started + nominal);
                    self.resume_work(now);
                } else {
                    self.session.break_display = format_hms(remaining);
                }
            }
            None => {
                self.session.break_display = format_hms(now - started);
            }
        }
    }

    fn handle_for(&self, kind: TimerKind) -> Option<TimerHandle> {
        match kind {
            TimerKind::Work => self.work_timer,
            TimerKind::Break => self.break_timer,
        }
    }

    fn handle_slot(&mut self, kind: TimerKind) -> &mut Option<TimerHandle> {
        match kind {
            TimerKind::Work => &mut self.work_timer,
            TimerKind::Break => &mut self.break_timer,
        }
    }

    fn start_timer(&mut self, kind: TimerKind) {
        self.stop_timer(kind);
        let handle = self.timers.start(kind, self.clock.now_millis());
        *self.handle_slot(handle.kind()) = Some(handle);
    }

    fn stop_timer(&mut self, kind: TimerKind) {
        if let Some(h) = self.handle_slot(kind).take() {
            self.timers.cancel(h);
        }
    }

    fn cancel_timers(&mut self) {
        self.timers.cancel_all();
        self.work_timer = None;
        self.break_timer = None;
    }

    /// Start the timer that matches the current phase and stop the other.
    fn resume_timers(&mut self) {
        match self.phase() {
            SessionPhase::NotClockedIn => self.cancel_timers(),
            SessionPhase::Working => {
                self.stop_timer(TimerKind::Break);
                self.start_timer(TimerKind::Work);
            }
            SessionPhase::OnBreak => {
                self.stop_timer(TimerKind::Work);
                self.start_timer(TimerKind::Break);
            }
        }
    }

    // ------------------------------------------------
    // State helpers
    // ------------------------------------------------

    /// Instant a running countdown break runs out, if the break counts down.
    fn countdown_end_ms(&self) -> Option<i64> {
        let break_type = self.session.active_break.filter(BreakType::is_countdown)?;
        Some(self.session.break_started_at_ms? + break_type.nominal_millis()?)
    }

    /// A countdown that ran out while no process was ticking is closed at
    /// its nominal end, as if the tick had fired on time.
    fn expire_elapsed_countdown(&mut self) {
        let now = self.clock.now_millis();
        let Some(end) = self.countdown_end_ms().filter(|end| *end <= now) else {
            return;
        };

        info!(
            overrun_ms = now - end,
            "countdown break expired while stopped, closing it at its nominal end"
        );
        self.finish_break(end);
        self.resume_work(now);
        self.persist();
    }

    /// Fold the running break, ended at `end_ms`, into the break total. A
    /// countdown break never counts past its nominal end.
    fn finish_break(&mut self, end_ms: i64) {
        let Some(started) = self.session.break_started_at_ms else {
            return;
        };
        let end_ms = self.countdown_end_ms().map_or(end_ms, |end| end_ms.min(end));

        let elapsed = (end_ms - started).max(0);
        self.session.total_break_ms += elapsed;
        self.session.active_break = None;
        self.session.break_started_at_ms = None;
        self.session.break_display = ZERO_HMS.to_string();
        self.stop_timer(TimerKind::Break);

        info!(elapsed_ms = elapsed, total_break_ms = self.session.total_break_ms, "break ended");
    }

    fn resume_work(&mut self, now: i64) {
        if self.session.is_clocked_in {
            self.start_timer(TimerKind::Work);
            self.on_work_tick(now);
        }
    }

    fn adopt_open_record(&mut self, record: AttendanceRecord) {
        let now = self.clock.now();
        let started = record
            .clock_in_time
            .as_deref()
            .and_then(|t| resolve_server_clock_in(t, now))
            .unwrap_or_else(|| {
                warn!(clock_in = ?record.clock_in_time, "unparseable server clock-in time, using now");
                now
            });

        let same_session = self.session.is_clocked_in
            && self
                .session
                .attendance_record_id
                .as_deref()
                .is_none_or(|id| id == record.record_id);
        if !same_session {
            self.session.total_break_ms = 0;
            self.session.active_break = None;
            self.session.break_started_at_ms = None;
            self.session.break_display = ZERO_HMS.to_string();
        }

        let started_ms = started.timestamp_millis();
        self.session.is_clocked_in = true;
        self.session.clock_in_at_ms = Some(started_ms);
        self.session.clock_in_display = format_clock(started_ms);
        self.session.attendance_record_id = Some(record.record_id.clone());

        info!(
            record = %record.record_id,
            clock_in = %self.session.clock_in_display,
            phase = self.phase().as_str(),
            "adopted open attendance record"
        );

        self.resume_timers();
        if self.phase() == SessionPhase::Working {
            self.on_work_tick(now.timestamp_millis());
        }
        self.persist();
    }

    fn clock_request(&self, profile: &EmployeeProfile) -> ClockRequest {
        ClockRequest {
            employee_id: profile.employee_id.clone(),
            remarks: self.settings.remarks.clone(),
            latitude: self.settings.latitude,
            longitude: self.settings.longitude,
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
        self.publish();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.session) {
            error!(error = %e, "failed to persist work session");
            self.error = Some(format!("Could not save session: {e}"));
        }
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let view = self.view();
        self.subscribers.retain(|tx| tx.send(view.clone()).is_ok());
    }
}
