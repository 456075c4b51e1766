//! Urania: the numeric core of the daily forecast.
//!
//! Natal charts, transits, biorhythm cycles and the numerology matrix are
//! computed here as plain, synchronous functions of their inputs. Presentation,
//! persistence and geocoding live outside this crate.

pub mod error;
pub mod time;
pub mod zodiac;

pub mod ephemeris;
pub mod houses;
pub mod aspects;
pub mod chart;

pub mod biorhythm;
pub mod numerology;
pub mod lunar;

pub mod report;
pub mod engine;

pub use engine::{EngineSettings, ForecastEngine};
pub use error::{EphemerisError, ForecastError};
