//! Time utilities: HH:MM:SS formatting of durations, parsing of the
//! server's wall-clock strings, epoch-millis conversions.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};

pub const ZERO_HMS: &str = "00:00:00";

/// Render a duration as `HH:MM:SS`. Hours are not capped, sub-second
/// remainders are truncated and negative inputs render as zero.
pub fn format_hms(millis: i64) -> String {
    let total_secs = millis.max(0) / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Wall-clock `HH:MM:SS` of an instant, in local time.
pub fn format_clock(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}

pub fn parse_server_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}

/// How far ahead of the local clock a server time may be and still count
/// as clock skew rather than a clock-in from the previous day.
pub const MAX_SERVER_SKEW_HOURS: i64 = 12;

/// Resolve a server `HH:mm:ss` clock-in string against the local date of
/// `now`. A time slightly ahead of `now` is server clock skew and clamps to
/// `now`; one more than `MAX_SERVER_SKEW_HOURS` ahead is taken from the previous
/// day (clock-in before midnight, reconciled after it). Returns `None` when
/// the string does not parse or does not exist locally (DST gap).
pub fn resolve_server_clock_in(t: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let time = parse_server_time(t)?;
    let today = now.date_naive().and_time(time);
    let candidate = Local.from_local_datetime(&today).earliest()?;

    if candidate - now > Duration::hours(MAX_SERVER_SKEW_HOURS) {
        let yesterday = today - Duration::days(1);
        Local.from_local_datetime(&yesterday).earliest()
    } else {
        Some(candidate.min(now))
    }
}
