use std::env;
use std::path::{Path, PathBuf};

use swisseph::swe::{calc_ut, houses_ex, set_ephe_path};
use swisseph::{AscMc, Cusp};

use crate::error::EphemerisError;
use crate::ephemeris::source::EphemerisSource;
use crate::ephemeris::types::{CelestialBody, GeoLocation, RawHouses, RawPosition};
use crate::time::{mean_obliquity_degrees, JulianDay};

// Swiss Ephemeris body codes; the node is TRUE_NODE
const BODY_CODES: &[(CelestialBody, u32)] = &[
    (CelestialBody::Sun, 0),
    (CelestialBody::Moon, 1),
    (CelestialBody::Mercury, 2),
    (CelestialBody::Venus, 3),
    (CelestialBody::Mars, 4),
    (CelestialBody::Jupiter, 5),
    (CelestialBody::Saturn, 6),
    (CelestialBody::Uranus, 7),
    (CelestialBody::Neptune, 8),
    (CelestialBody::Pluto, 9),
    (CelestialBody::NorthNode, 11),
];

const FLG_SWIEPH: u32 = 2;
const FLG_MOSEPH: u32 = 4;
const FLG_SPEED: u32 = 256;
const PLACIDUS: i32 = b'P' as i32;

/// Swiss Ephemeris backed source
pub struct SwissEphemeris {
    ephemeris_path: Option<PathBuf>,
    flags: u32,
}

impl SwissEphemeris {
    /// Create a source reading data files from `ephemeris_path`, falling back to
    /// `SWISS_EPHEMERIS_PATH`. With neither set, the library's built-in Moshier
    /// ephemeris is used and no files are read.
    pub fn new(ephemeris_path: Option<PathBuf>) -> Result<Self, EphemerisError> {
        let path = ephemeris_path.or_else(|| env::var_os("SWISS_EPHEMERIS_PATH").map(PathBuf::from));

        let Some(path) = path else {
            log::info!("No Swiss Ephemeris data path configured, using the built-in Moshier ephemeris");
            return Ok(Self {
                ephemeris_path: None,
                flags: FLG_MOSEPH | FLG_SPEED,
            });
        };

        if !path.exists() {
            return Err(EphemerisError::FileNotFound {
                path: path.display().to_string(),
                message: "Install the Swiss Ephemeris data files or leave the path unset."
                    .to_string(),
            });
        }
        let path_str = path.to_str().ok_or_else(|| EphemerisError::FileNotFound {
            path: path.display().to_string(),
            message: "Ephemeris path is not valid UTF-8".to_string(),
        })?;
        set_ephe_path(path_str);

        log::info!("Swiss Ephemeris data at {}", path.display());
        Ok(Self {
            ephemeris_path: Some(path),
            flags: FLG_SWIEPH | FLG_SPEED,
        })
    }

    /// Data directory handed to the library; `None` in Moshier mode
    pub fn ephemeris_path(&self) -> Option<&Path> {
        self.ephemeris_path.as_deref()
    }

    pub fn uses_data_files(&self) -> bool {
        self.flags & FLG_SWIEPH != 0
    }
}

impl EphemerisSource for SwissEphemeris {
    fn name(&self) -> &str {
        "swiss"
    }

    fn resolve(&self, jd: JulianDay, body: CelestialBody) -> Result<RawPosition, EphemerisError> {
        let code = BODY_CODES
            .iter()
            .find(|(b, _)| *b == body)
            .map(|(_, code)| *code)
            .ok_or_else(|| EphemerisError::UnsupportedBody {
                body,
                source_name: self.name().to_string(),
            })?;

        let result = calc_ut(jd.value(), code, self.flags).map_err(|e| {
            EphemerisError::CalculationFailed {
                body,
                jd: jd.value(),
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(RawPosition {
            longitude: out[0],
            speed: out[3],
        })
    }

    fn houses(&self, jd: JulianDay, location: &GeoLocation) -> Result<RawHouses, EphemerisError> {
        // swisseph silently switches to Porphyry inside the polar circles
        if location.latitude.abs() >= 90.0 - mean_obliquity_degrees(jd) {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!(
                    "latitude {:.4} is inside the polar circle",
                    location.latitude
                ),
            });
        }
        let (c, a) = houses_ex(
            jd.value(),
            self.flags as i32,
            location.latitude,
            location.longitude,
            PLACIDUS,
        );
        let cusps = Cusp::from_array(c);
        let ascmc = AscMc::from_array(a);

        let values = [
            cusps.first,
            cusps.second,
            cusps.third,
            cusps.fourth,
            cusps.fifth,
            cusps.sixth,
            cusps.seventh,
            cusps.eighth,
            cusps.ninth,
            cusps.tenth,
            cusps.eleventh,
            cusps.twelfth,
        ];
        if values.iter().any(|v| !v.is_finite()) || !ascmc.ascendant.is_finite() {
            return Err(EphemerisError::HouseCalculationFailed {
                message: format!("non-finite cusps at latitude {}", location.latitude),
            });
        }

        Ok(RawHouses {
            cusps: values,
            ascendant: ascmc.ascendant,
            midheaven: ascmc.mc,
        })
    }
}
