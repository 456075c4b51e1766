use chrono::NaiveDate;
use thiserror::Error;

use crate::ephemeris::CelestialBody;

/// Errors raised by an ephemeris data source
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("Ephemeris path not found: {path}. {message}")]
    FileNotFound { path: String, message: String },
    #[error("Body {body} is not supported by the {source_name} ephemeris")]
    UnsupportedBody {
        body: CelestialBody,
        source_name: String,
    },
    #[error("Failed to calculate position for {body} at JD {jd}: {message}")]
    CalculationFailed {
        body: CelestialBody,
        jd: f64,
        message: String,
    },
    #[error("House calculation failed: {message}")]
    HouseCalculationFailed { message: String },
}

/// Errors raised by the forecast engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    #[error("Target date {target} is before birth date {birth}")]
    TargetBeforeBirth { birth: NaiveDate, target: NaiveDate },
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid location: {0}")]
    InvalidLocation(String),
    #[error("Invalid UTC offset: {0}")]
    InvalidUtcOffset(String),
    #[error("Unknown time zone: {0}")]
    UnknownTimezone(String),
    #[error("Invalid orb for {kind}: {orb}")]
    InvalidOrb { kind: String, orb: f64 },
    #[error("No positions could be resolved: {0}")]
    NoPositions(String),
    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

pub type Result<T> = std::result::Result<T, ForecastError>;
