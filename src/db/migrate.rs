use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    info!(version, "migration applied");
    Ok(())
}

/// Single-row table holding the persisted work session (id is always 1).
fn migrate_create_work_session(conn: &Connection) -> Result<()> {
    let version = "20251016_0001_create_work_session";
    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        BEGIN;

        CREATE TABLE IF NOT EXISTS work_session (
            id                    INTEGER PRIMARY KEY CHECK (id = 1),
            is_clocked_in         INTEGER NOT NULL DEFAULT 0,
            clock_in_at_ms        INTEGER,
            attendance_record_id  TEXT,
            total_break_ms        INTEGER NOT NULL DEFAULT 0,
            active_break          TEXT CHECK (active_break IN ('morning','lunch','afternoon','other')),
            break_started_at_ms   INTEGER,
            clock_in_display      TEXT NOT NULL DEFAULT '--:--:--',
            current_time_display  TEXT NOT NULL DEFAULT '--:--:--',
            hours_worked_display  TEXT NOT NULL DEFAULT '00:00:00',
            break_display         TEXT NOT NULL DEFAULT '00:00:00',
            updated_at            TEXT NOT NULL
        );

        COMMIT;
        "#,
    )?;

    mark_applied(conn, version, "Created work_session table")
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    migrate_create_work_session(conn)?;
    Ok(())
}
