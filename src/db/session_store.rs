//! SQLite-backed `SessionStore`: one row, written with a single UPSERT.

use crate::core::store::SessionStore;
use crate::db::initialize::init_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::break_type::BreakType;
use crate::models::session::WorkSessionState;
use chrono::Local;
use rusqlite::{OptionalExtension, params};
use std::path::Path;
use tracing::debug;

pub struct SqliteSessionStore {
    pool: DbPool,
}

struct SessionRow {
    is_clocked_in: bool,
    clock_in_at_ms: Option<i64>,
    attendance_record_id: Option<String>,
    total_break_ms: i64,
    active_break: Option<String>,
    break_started_at_ms: Option<i64>,
    clock_in_display: String,
    current_time_display: String,
    hours_worked_display: String,
    break_display: String,
}

impl SqliteSessionStore {
    /// Open (and migrate) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let pool = DbPool::new(path)?;
        Self::from_pool(pool)
    }

    pub fn from_pool(pool: DbPool) -> AppResult<Self> {
        init_db(&pool.conn)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    fn into_state(row: SessionRow) -> AppResult<WorkSessionState> {
        let active_break = match row.active_break {
            Some(code) => Some(BreakType::from_db_str(&code).ok_or(
                AppError::InvalidStoredValue {
                    field: "active_break",
                    value: code,
                },
            )?),
            None => None,
        };

        Ok(WorkSessionState {
            is_clocked_in: row.is_clocked_in,
            clock_in_at_ms: row.clock_in_at_ms,
            attendance_record_id: row.attendance_record_id,
            total_break_ms: row.total_break_ms,
            active_break,
            break_started_at_ms: row.break_started_at_ms,
            clock_in_display: row.clock_in_display,
            current_time_display: row.current_time_display,
            hours_worked_display: row.hours_worked_display,
            break_display: row.break_display,
        })
    }
}

impl SessionStore for SqliteSessionStore {
    fn load(&self) -> AppResult<WorkSessionState> {
        let row = self
            .pool
            .conn
            .query_row(
                "SELECT is_clocked_in, clock_in_at_ms, attendance_record_id, total_break_ms,
                        active_break, break_started_at_ms, clock_in_display,
                        current_time_display, hours_worked_display, break_display
                 FROM work_session WHERE id = 1",
                [],
                |r| {
                    Ok(SessionRow {
                        is_clocked_in: r.get::<_, i64>(0)? != 0,
                        clock_in_at_ms: r.get(1)?,
                        attendance_record_id: r.get(2)?,
                        total_break_ms: r.get(3)?,
                        active_break: r.get(4)?,
                        break_started_at_ms: r.get(5)?,
                        clock_in_display: r.get(6)?,
                        current_time_display: r.get(7)?,
                        hours_worked_display: r.get(8)?,
                        break_display: r.get(9)?,
                    })
                },
            )
            .optional()?;

        match row {
            Some(row) => Self::into_state(row),
            None => {
                debug!("no persisted work session, starting clocked out");
                Ok(WorkSessionState::default())
            }
        }
    }

    fn save(&mut self, state: &WorkSessionState) -> AppResult<()> {
        let mut stmt = self.pool.conn.prepare_cached(
            "INSERT INTO work_session (
                id, is_clocked_in, clock_in_at_ms, attendance_record_id, total_break_ms,
                active_break, break_started_at_ms, clock_in_display, current_time_display,
                hours_worked_display, break_display, updated_at
             ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
             ON CONFLICT(id) DO UPDATE SET
                is_clocked_in = excluded.is_clocked_in,
                clock_in_at_ms = excluded.clock_in_at_ms,
                attendance_record_id = excluded.attendance_record_id,
                total_break_ms = excluded.total_break_ms,
                active_break = excluded.active_break,
                break_started_at_ms = excluded.break_started_at_ms,
                clock_in_display = excluded.clock_in_display,
                current_time_display = excluded.current_time_display,
                hours_worked_display = excluded.hours_worked_display,
                break_display = excluded.break_display,
                updated_at = excluded.updated_at",
        )?;

        stmt.execute(params![
            state.is_clocked_in as i64,
            state.clock_in_at_ms,
            state.attendance_record_id,
            state.total_break_ms,
            state.active_break.map(|b| b.to_db_str()),
            state.break_started_at_ms,
            state.clock_in_display,
            state.current_time_display,
            state.hours_worked_display,
            state.break_display,
            Local::now().to_rfc3339(),
        ])?;

        Ok(())
    }
}
