//! Time utilities: local wall-clock timestamps for a configured time zone.

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

const LOCAL_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current wall-clock time in an IANA tz like "America/Chicago".
pub fn local_now(tz: &str) -> Result<NaiveDateTime> {
    to_local(Utc::now(), tz)
}

/// Convert a UTC instant to wall-clock time in `tz`.
pub fn to_local(instant: DateTime<Utc>, tz: &str) -> Result<NaiveDateTime> {
    let tz: Tz = tz
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))?;
    Ok(instant.with_timezone(&tz).naive_local())
}

/// Parse a local timestamp like "2026-02-20 23:59".
pub fn parse_local(local: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(local, LOCAL_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))
}

pub fn format_local(dt: NaiveDateTime) -> String {
    dt.format(LOCAL_FORMAT).to_string()
}

/// Signed whole hours from `now` until `due`, truncated toward zero.
pub fn hours_until(now: NaiveDateTime, due: NaiveDateTime) -> i64 {
    (due - now).num_hours()
}
