use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ForecastError;
use crate::zodiac::{normalize_degrees, SignPlacement, ZodiacSign};

/// Bodies the engine knows how to track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CelestialBody {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
}

/// Bodies placed in a natal chart
pub const NATAL_BODIES: &[CelestialBody] = &[
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Uranus,
    CelestialBody::Neptune,
    CelestialBody::Pluto,
    CelestialBody::NorthNode,
];

/// Bodies followed for daily transits (no lunar node)
pub const TRANSIT_BODIES: &[CelestialBody] = &[
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Uranus,
    CelestialBody::Neptune,
    CelestialBody::Pluto,
];

impl CelestialBody {
    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "sun",
            CelestialBody::Moon => "moon",
            CelestialBody::Mercury => "mercury",
            CelestialBody::Venus => "venus",
            CelestialBody::Mars => "mars",
            CelestialBody::Jupiter => "jupiter",
            CelestialBody::Saturn => "saturn",
            CelestialBody::Uranus => "uranus",
            CelestialBody::Neptune => "neptune",
            CelestialBody::Pluto => "pluto",
            CelestialBody::NorthNode => "north_node",
        }
    }

    /// Display label, e.g. "North Node"
    pub fn label(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
            CelestialBody::NorthNode => "North Node",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        NATAL_BODIES
            .iter()
            .copied()
            .find(|body| body.name() == name.to_lowercase())
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Geographic location for house calculations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Latitude in degrees (-90 to 90), north positive
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180), east positive
    pub longitude: f64,
    /// Elevation above sea level in meters
    #[serde(default)]
    pub elevation: f64,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation,
        }
    }

    pub fn validate(&self) -> Result<(), ForecastError> {
        if !self.latitude.is_finite() || self.latitude.abs() > 90.0 {
            return Err(ForecastError::InvalidLocation(format!(
                "latitude {} outside [-90, 90]",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || self.longitude.abs() > 180.0 {
            return Err(ForecastError::InvalidLocation(format!(
                "longitude {} outside [-180, 180]",
                self.longitude
            )));
        }
        if !self.elevation.is_finite() {
            return Err(ForecastError::InvalidLocation(
                "elevation is not a finite number".to_string(),
            ));
        }
        Ok(())
    }
}

/// Longitude and daily motion as returned by an ephemeris source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPosition {
    /// Ecliptic longitude in degrees, any range
    pub longitude: f64,
    /// Daily motion in longitude (degrees/day)
    pub speed: f64,
}

/// Resolved position of a body at one instant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPosition {
    pub body: CelestialBody,
    /// Ecliptic longitude in [0, 360)
    pub longitude: f64,
    pub sign: ZodiacSign,
    /// floor(longitude / 30)
    pub sign_index: usize,
    /// longitude mod 30
    pub position_in_sign: f64,
    /// Apparent backward motion (speed < 0)
    pub retrograde: bool,
    /// Daily motion in longitude (degrees/day)
    pub speed: f64,
}

impl BodyPosition {
    pub fn from_raw(body: CelestialBody, raw: RawPosition) -> Self {
        let longitude = normalize_degrees(raw.longitude);
        let placement = SignPlacement::from_longitude(longitude);
        Self {
            body,
            longitude,
            sign: placement.sign,
            sign_index: placement.sign_index,
            position_in_sign: placement.position_in_sign,
            retrograde: raw.speed < 0.0,
            speed: raw.speed,
        }
    }
}

/// House cusps and angles as returned by an ephemeris source
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawHouses {
    /// Cusp longitudes for houses 1..=12
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}
