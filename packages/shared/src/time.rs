//! Time-related utilities with clock abstraction for testability.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Local, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_current_timestamp()
    }
}

/// Manually driven clock for testing time windows.
///
/// Starts at the given timestamp and only moves when `advance` is called,
/// so tests can step across slow-mode intervals, escalation windows
/// and idle thresholds without sleeping.
#[derive(Debug)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward by `millis`.
    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_current_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Format a timestamp as a wall-clock time (`h:mm:ss AM/PM`) in the server's local time zone.
pub fn timestamp_to_clock_time(timestamp_millis: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => format_clock_time(&dt),
        None => String::new(),
    }
}

/// Convert Unix timestamp (milliseconds) to RFC 3339 format in the server's local time zone
pub fn timestamp_to_rfc3339(timestamp_millis: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_millis).single() {
        Some(dt) => dt.to_rfc3339(),
        None => String::new(),
    }
}

fn format_clock_time<Tz: TimeZone>(dt: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    dt.format("%-I:%M:%S %p").to_string()
}
