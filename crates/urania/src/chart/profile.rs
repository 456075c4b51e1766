use std::fmt;

use chrono::{
    DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ephemeris::GeoLocation;
use crate::error::{ForecastError, Result};
use crate::time::JulianDay;

/// Largest offset in use anywhere (UTC+14:00)
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

lazy_static! {
    static ref UTC_OFFSET: Regex =
        Regex::new(r"^([+-])(\d{1,2})(?::?(\d{2}))?$").expect("Invalid UTC offset regex");
}

/// How the birth clock time maps onto UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BirthTimezone {
    /// Fixed offset east of UTC, in minutes
    Offset { minutes: i32 },
    /// IANA zone; daylight saving and historical rule changes apply
    Named { zone: Tz },
}

impl BirthTimezone {
    fn validate(&self) -> Result<()> {
        match self {
            BirthTimezone::Offset { minutes } if minutes.abs() > MAX_OFFSET_MINUTES => Err(
                ForecastError::InvalidUtcOffset(format!("{minutes} minutes")),
            ),
            _ => Ok(()),
        }
    }

    /// The UTC instant of a local clock reading.
    ///
    /// A repeated hour resolves to standard time (the later instant), and a
    /// clock reading skipped by a forward jump is read with the offset in force
    /// just before the jump.
    pub fn to_utc(&self, local: NaiveDateTime) -> Result<DateTime<Utc>> {
        match *self {
            BirthTimezone::Offset { minutes } => {
                let offset = FixedOffset::east_opt(minutes * 60)
                    .ok_or_else(|| ForecastError::InvalidUtcOffset(format!("{minutes} minutes")))?;
                fixed_to_utc(offset, local)
            }
            BirthTimezone::Named { zone } => match zone.from_local_datetime(&local) {
                LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(first, second) => {
                    Ok(std::cmp::max(first, second).with_timezone(&Utc))
                }
                LocalResult::None => {
                    let before = local
                        .checked_sub_signed(Duration::days(1))
                        .and_then(|earlier| zone.from_local_datetime(&earlier).earliest())
                        .ok_or_else(|| ForecastError::InvalidDate(format!("{local} {zone}")))?;
                    log::debug!(
                        "{} does not exist in {}, reading it as {}",
                        local,
                        zone,
                        before.offset().fix()
                    );
                    fixed_to_utc(before.offset().fix(), local)
                }
            },
        }
    }
}

fn fixed_to_utc(offset: FixedOffset, local: NaiveDateTime) -> Result<DateTime<Utc>> {
    offset
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ForecastError::InvalidDate(format!("{local} {offset}")))
}

impl fmt::Display for BirthTimezone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BirthTimezone::Offset { minutes } => {
                let sign = if *minutes < 0 { '-' } else { '+' };
                write!(f, "UTC{}{:02}:{:02}", sign, minutes.abs() / 60, minutes.abs() % 60)
            }
            BirthTimezone::Named { zone } => f.write_str(zone.name()),
        }
    }
}

/// Birth data for one person. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthProfile {
    pub birth_date: NaiveDate,
    /// Local clock time at the birth place
    pub birth_time: NaiveTime,
    pub location: GeoLocation,
    pub timezone: BirthTimezone,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_name: Option<String>,
}

impl BirthProfile {
    /// Birth data with a fixed UTC offset in minutes
    pub fn new(
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        location: GeoLocation,
        utc_offset_minutes: i32,
    ) -> Result<Self> {
        Self::with_timezone(
            birth_date,
            birth_time,
            location,
            BirthTimezone::Offset {
                minutes: utc_offset_minutes,
            },
        )
    }

    /// Birth data whose clock time is read in an IANA zone
    pub fn in_zone(
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        location: GeoLocation,
        zone: Tz,
    ) -> Result<Self> {
        Self::with_timezone(birth_date, birth_time, location, BirthTimezone::Named { zone })
    }

    pub fn with_timezone(
        birth_date: NaiveDate,
        birth_time: NaiveTime,
        location: GeoLocation,
        timezone: BirthTimezone,
    ) -> Result<Self> {
        location.validate()?;
        timezone.validate()?;
        Ok(Self {
            birth_date,
            birth_time,
            location,
            timezone,
            place_name: None,
        })
    }

    pub fn with_place_name(mut self, name: impl Into<String>) -> Self {
        self.place_name = Some(name.into());
        self
    }

    /// Birth instant in UTC
    pub fn birth_instant(&self) -> Result<DateTime<Utc>> {
        self.timezone
            .to_utc(NaiveDateTime::new(self.birth_date, self.birth_time))
    }

    /// Offset from UTC in force at the birth instant, in minutes
    pub fn utc_offset_minutes(&self) -> Result<i32> {
        let local = NaiveDateTime::new(self.birth_date, self.birth_time);
        let utc = self.birth_instant()?.naive_utc();
        Ok((local - utc).num_minutes() as i32)
    }

    pub fn birth_jd(&self) -> Result<JulianDay> {
        Ok(JulianDay::from_utc(self.birth_instant()?))
    }
}

/// Parse "+03:00", "-0530", "+5" or "Z" into minutes east of UTC
pub fn parse_utc_offset(text: &str) -> Result<i32> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("z") || text.eq_ignore_ascii_case("utc") {
        return Ok(0);
    }
    let caps = UTC_OFFSET
        .captures(text)
        .ok_or_else(|| ForecastError::InvalidUtcOffset(text.to_string()))?;

    let hours: i32 = caps[2]
        .parse()
        .map_err(|_| ForecastError::InvalidUtcOffset(text.to_string()))?;
    let minutes: i32 = match caps.get(3) {
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| ForecastError::InvalidUtcOffset(text.to_string()))?,
        None => 0,
    };
    if minutes >= 60 {
        return Err(ForecastError::InvalidUtcOffset(text.to_string()));
    }

    let total = hours * 60 + minutes;
    if total > MAX_OFFSET_MINUTES {
        return Err(ForecastError::InvalidUtcOffset(text.to_string()));
    }
    Ok(if &caps[1] == "-" { -total } else { total })
}

/// Parse either a UTC offset ("+03:00") or an IANA zone name ("Europe/Moscow")
pub fn parse_timezone(text: &str) -> Result<BirthTimezone> {
    let text = text.trim();
    if let Ok(minutes) = parse_utc_offset(text) {
        return Ok(BirthTimezone::Offset { minutes });
    }
    text.parse::<Tz>()
        .map(|zone| BirthTimezone::Named { zone })
        .map_err(|_| ForecastError::UnknownTimezone(text.to_string()))
}

/// Parse a birth date as "YYYY-MM-DD" or "DD.MM.YYYY"
pub fn parse_birth_date(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%d.%m.%Y"))
        .map_err(|e| ForecastError::InvalidDate(format!("{text}: {e}")))
}

/// Parse a birth time as "HH:MM" or "HH:MM:SS"
pub fn parse_birth_time(text: &str) -> Result<NaiveTime> {
    let text = text.trim();
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|e| ForecastError::InvalidDate(format!("{text}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(parse_utc_offset("+03:00").unwrap(), 180);
        assert_eq!(parse_utc_offset("-05:30").unwrap(), -330);
        assert_eq!(parse_utc_offset("+0545").unwrap(), 345);
        assert_eq!(parse_utc_offset("+5").unwrap(), 300);
        assert_eq!(parse_utc_offset("Z").unwrap(), 0);
        assert!(parse_utc_offset("+03:75").is_err());
        assert!(parse_utc_offset("+15:00").is_err());
        assert!(parse_utc_offset("three").is_err());
    }

    #[test]
    fn test_birth_instant_applies_offset() {
        let profile = BirthProfile::new(
            NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            NaiveTime::from_hms_opt(1, 30, 0).unwrap(),
            GeoLocation::new(55.7558, 37.6173, 156.0),
            180,
        )
        .unwrap();
        let utc = profile.birth_instant().unwrap();
        assert_eq!(utc.date_naive(), NaiveDate::from_ymd_opt(1990, 5, 14).unwrap());
        assert_eq!(utc.hour(), 22);
        assert_eq!(utc.minute(), 30);
    }

    #[test]
    fn test_profile_rejects_bad_input() {
        let date = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(BirthProfile::new(date, time, GeoLocation::new(95.0, 0.0, 0.0), 0).is_err());
        assert!(BirthProfile::new(date, time, GeoLocation::new(0.0, 0.0, 0.0), 15 * 60).is_err());
    }

    #[test]
    fn test_parse_birth_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        assert_eq!(parse_birth_date("1990-05-15").unwrap(), expected);
        assert_eq!(parse_birth_date("15.05.1990").unwrap(), expected);
        assert!(parse_birth_date("1990-02-30").is_err());
        assert_eq!(
            parse_birth_time("07:45").unwrap(),
            NaiveTime::from_hms_opt(7, 45, 0).unwrap()
        );
    }

    fn moscow() -> GeoLocation {
        GeoLocation::new(55.7558, 37.6173, 156.0)
    }

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> (NaiveDate, NaiveTime) {
        (
            NaiveDate::from_ymd_opt(y, mo, d).unwrap(),
            NaiveTime::from_hms_opt(h, mi, 0).unwrap(),
        )
    }

    #[test]
    fn test_named_zone_applies_summer_time() {
        // Moscow kept summer time (UTC+4) in May 1990
        let (date, time) = local(1990, 5, 15, 14, 30);
        let zoned = BirthProfile::in_zone(date, time, moscow(), chrono_tz::Europe::Moscow).unwrap();
        let utc = zoned.birth_instant().unwrap();
        assert_eq!(utc.hour(), 10);
        assert_eq!(utc.minute(), 30);
        assert_eq!(zoned.utc_offset_minutes().unwrap(), 240);

        let fixed = BirthProfile::new(date, time, moscow(), 180).unwrap();
        assert_eq!((fixed.birth_instant().unwrap() - utc).num_minutes(), 60);
        assert_ne!(fixed.birth_jd().unwrap(), zoned.birth_jd().unwrap());

        let winter = BirthProfile::in_zone(
            NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            time,
            moscow(),
            chrono_tz::Europe::Moscow,
        )
        .unwrap();
        assert_eq!(winter.utc_offset_minutes().unwrap(), 180);
    }

    #[test]
    fn test_named_zone_clock_changes() {
        // 1990-09-30 02:30 happened twice; standard time is the later one
        let (date, time) = local(1990, 9, 30, 2, 30);
        let repeated = BirthProfile::in_zone(date, time, moscow(), chrono_tz::Europe::Moscow).unwrap();
        let utc = repeated.birth_instant().unwrap();
        assert_eq!(utc.date_naive(), NaiveDate::from_ymd_opt(1990, 9, 29).unwrap());
        assert_eq!(utc.hour(), 23);
        assert_eq!(utc.minute(), 30);

        // 1990-03-25 02:30 was skipped by the jump to summer time
        let (date, time) = local(1990, 3, 25, 2, 30);
        let skipped = BirthProfile::in_zone(date, time, moscow(), chrono_tz::Europe::Moscow).unwrap();
        let utc = skipped.birth_instant().unwrap();
        assert_eq!(utc.date_naive(), NaiveDate::from_ymd_opt(1990, 3, 24).unwrap());
        assert_eq!(utc.hour(), 23);
        assert_eq!(utc.minute(), 30);
    }

    #[test]
    fn test_parse_timezone() {
        assert_eq!(
            parse_timezone("+03:00").unwrap(),
            BirthTimezone::Offset { minutes: 180 }
        );
        assert_eq!(
            parse_timezone(" Europe/Moscow ").unwrap(),
            BirthTimezone::Named {
                zone: chrono_tz::Europe::Moscow
            }
        );
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(ForecastError::UnknownTimezone(_))
        ));
        assert_eq!(
            BirthTimezone::Offset { minutes: -330 }.to_string(),
            "UTC-05:30"
        );
        assert_eq!(
            parse_timezone("Asia/Novosibirsk").unwrap().to_string(),
            "Asia/Novosibirsk"
        );
    }

    #[test]
    fn test_timezone_serializes_by_kind() {
        let (date, time) = local(1990, 5, 15, 14, 30);
        let profile = BirthProfile::in_zone(date, time, moscow(), chrono_tz::Europe::Moscow).unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["timezone"]["kind"], "named");
        assert_eq!(json["timezone"]["zone"], "Europe/Moscow");
        let back: BirthProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
