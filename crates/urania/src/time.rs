//! Continuous astronomical day count and sidereal time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::zodiac::normalize_degrees;

/// Julian Day of the Unix epoch
const UNIX_EPOCH_JD: f64 = 2_440_587.5;
/// Julian Day of J2000.0 (2000-01-01 12:00 TT)
pub const J2000: f64 = 2_451_545.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// An instant on the UT Julian Day scale
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JulianDay(pub f64);

impl JulianDay {
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let seconds = dt.timestamp() as f64 + f64::from(dt.timestamp_subsec_nanos()) * 1e-9;
        JulianDay(seconds / SECONDS_PER_DAY + UNIX_EPOCH_JD)
    }

    /// Date and time read as UTC
    pub fn from_naive_utc(naive: NaiveDateTime) -> Self {
        Self::from_utc(naive.and_utc())
    }

    /// 12:00 UTC on the given date
    pub fn noon(date: NaiveDate) -> Self {
        Self::from_naive_utc(date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default()))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn add_days(&self, days: f64) -> Self {
        JulianDay(self.0 + days)
    }

    /// Julian centuries since J2000.0
    pub fn centuries(&self) -> f64 {
        (self.0 - J2000) / DAYS_PER_CENTURY
    }

    /// Days since J2000.0
    pub fn days_since_j2000(&self) -> f64 {
        self.0 - J2000
    }
}

/// Greenwich mean sidereal time in degrees
pub fn gmst_degrees(jd: JulianDay) -> f64 {
    let d = jd.days_since_j2000();
    let t = jd.centuries();
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t - t * t * t / 38_710_000.0,
    )
}

/// Local sidereal time (RAMC) in degrees, east longitude positive
pub fn local_sidereal_degrees(jd: JulianDay, longitude: f64) -> f64 {
    normalize_degrees(gmst_degrees(jd) + longitude)
}

/// Mean obliquity of the ecliptic in degrees
pub fn mean_obliquity_degrees(jd: JulianDay) -> f64 {
    23.439_291 - 0.013_004_2 * jd.centuries()
}
