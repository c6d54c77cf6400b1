//! # Temporal Types — UTC-Only Timestamps and the Injectable Clock
//!
//! Defines `Timestamp`, a UTC-only timestamp truncated to seconds
//! precision, plus the date arithmetic the renewal logic runs on:
//! day offsets for the reminder window, calendar-month offsets for
//! duration-based due dates, and ceiling day-distance for priority
//! bucketing.
//!
//! ## The Clock
//!
//! "Today" is never ambient. Every component that compares dates receives
//! a [`Clock`], so the 30-day window and defer-expiry checks are
//! deterministic under test. Production code uses [`SystemClock`]; tests
//! use [`FixedClock`] and advance it explicitly.

use std::sync::Mutex;

use chrono::{DateTime, Months, TimeDelta, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ComplyError;

/// Seconds in a civil day, used for ceiling day-distance computation.
const SECS_PER_DAY: i64 = 86_400;

/// A UTC-only timestamp, truncated to seconds precision.
///
/// All dates in the system — filing dates, expiration dates, due dates,
/// defer deadlines — are instances of this type, so comparisons never mix
/// timezones or sub-second noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp from the current UTC time, truncated to seconds.
    pub fn now() -> Self {
        Self(truncate_to_seconds(Utc::now()))
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-seconds.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(truncate_to_seconds(dt))
    }

    /// Create a timestamp at midnight UTC on the given calendar date.
    ///
    /// # Errors
    ///
    /// Returns an error if the year/month/day triple is not a valid date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, ComplyError> {
        Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
            .single()
            .map(Self)
            .ok_or_else(|| {
                ComplyError::Validation(format!("invalid calendar date: {year}-{month}-{day}"))
            })
    }

    /// Parse a timestamp from an RFC 3339 string, converting any offset
    /// to UTC and truncating to seconds.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid RFC 3339.
    pub fn parse(s: &str) -> Result<Self, ComplyError> {
        let dt = DateTime::parse_from_rfc3339(s).map_err(|e| {
            ComplyError::Validation(format!("invalid RFC 3339 timestamp {s:?}: {e}"))
        })?;
        Ok(Self(truncate_to_seconds(dt.with_timezone(&Utc))))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Offset by a signed number of whole days.
    pub fn add_days(&self, days: i64) -> Self {
        self.0
            .checked_add_signed(TimeDelta::days(days))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Offset forward by whole calendar months, clamping the day of month
    /// where the target month is shorter (Jan 31 + 1 month = Feb 28/29).
    pub fn add_months(&self, months: u32) -> Self {
        self.0
            .checked_add_months(Months::new(months))
            .map(Self)
            .unwrap_or(*self)
    }

    /// Whole days from `self` until `later`, rounded up.
    ///
    /// A deadline any fraction of a day away still counts as one day out;
    /// this is the distance the priority buckets are measured in. Negative
    /// results mean `later` is in the past.
    pub fn days_until(&self, later: &Timestamp) -> i64 {
        // Ceiling division (i64::div_ceil is unavailable on this toolchain):
        // truncating division rounds toward zero, so bump by one only when
        // there is a positive remainder.
        let secs = (later.0 - self.0).num_seconds();
        let quotient = secs / SECS_PER_DAY;
        if secs % SECS_PER_DAY > 0 {
            quotient + 1
        } else {
            quotient
        }
    }

    /// Render as ISO8601 with Z suffix (e.g., `2025-01-15T00:00:00Z`).
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

/// Truncate a `DateTime<Utc>` to seconds precision (discard nanoseconds).
fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

// ─── Clock ───────────────────────────────────────────────────────────

/// Source of "now" for all date comparisons.
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Test clock pinned to an explicit instant, advanced by hand.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Timestamp>,
}

impl FixedClock {
    /// Create a clock pinned at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock to a new instant.
    pub fn set(&self, now: Timestamp) {
        if let Ok(mut guard) = self.now.lock() {
            *guard = now;
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now
            .lock()
            .map(|guard| *guard)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }
}
