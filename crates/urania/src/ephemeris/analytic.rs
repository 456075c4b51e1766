//! Built-in low-precision ephemeris.
//!
//! Planets come from mean Keplerian elements (J2000 ecliptic, valid 1800-2050) with
//! a general-precession correction to the equinox of date. The Moon uses the
//! leading periodic terms of its longitude series and the node is the mean node.
//!
//! Sources: E. M. Standish, "Keplerian Elements for Approximate Positions of the
//! Major Planets" (JPL), Table 1; Meeus, *Astronomical Algorithms* (2nd ed),
//! Chapter 47 for the lunar longitude terms and the mean node polynomial.
//!
//! Precision limits:
//! - Heliocentric errors of the element table are below 1' for Mercury through
//!   Mars, Uranus and Neptune, and up to about 10' for Jupiter and Saturn.
//!   Geocentric errors grow for Mercury, Venus and Mars near inferior
//!   conjunction or opposition, staying under about 0.3°.
//! - Pluto's elements are a fit over 1800-2050 and degrade quickly outside it.
//! - The 19 lunar terms leave about 0.05° of truncation error.
//! - Time is UT throughout; Delta T, nutation and aberration are ignored
//!   (together under 0.02° for the Sun and planets).
//! - Outside 1800-2050 the errors grow without bound.
//!
//! This is well inside the smallest orb. For arc-second work use the
//! `swiss` feature.

use std::f64::consts::PI;

use crate::error::EphemerisError;
use crate::ephemeris::source::EphemerisSource;
use crate::ephemeris::types::{CelestialBody, RawPosition};
use crate::time::JulianDay;
use crate::zodiac::{normalize_degrees, signed_difference};

/// Half-width of the central difference used for daily motion (days)
const SPEED_STEP: f64 = 0.5;
/// General precession in longitude, degrees per Julian century
const PRECESSION_PER_CENTURY: f64 = 1.396_971_3;
const KEPLER_TOLERANCE: f64 = 1e-12;
const KEPLER_MAX_ITERATIONS: usize = 30;

/// Mean orbital elements and their rates per Julian century
#[derive(Debug, Clone, Copy)]
struct OrbitalElements {
    /// Semi-major axis (au)
    a: (f64, f64),
    /// Eccentricity
    e: (f64, f64),
    /// Inclination (deg)
    i: (f64, f64),
    /// Mean longitude (deg)
    l: (f64, f64),
    /// Longitude of perihelion (deg)
    perihelion: (f64, f64),
    /// Longitude of ascending node (deg)
    node: (f64, f64),
}

const MERCURY: OrbitalElements = OrbitalElements {
    a: (0.387_099_27, 0.000_000_37),
    e: (0.205_635_93, 0.000_019_06),
    i: (7.004_979_02, -0.005_947_49),
    l: (252.250_323_50, 149_472.674_111_75),
    perihelion: (77.457_796_28, 0.160_476_89),
    node: (48.330_765_93, -0.125_340_81),
};

const VENUS: OrbitalElements = OrbitalElements {
    a: (0.723_335_66, 0.000_003_90),
    e: (0.006_776_72, -0.000_041_07),
    i: (3.394_676_05, -0.000_788_90),
    l: (181.979_099_50, 58_517.815_387_29),
    perihelion: (131.602_467_18, 0.002_683_29),
    node: (76.679_842_55, -0.277_694_18),
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    a: (1.000_002_61, 0.000_005_62),
    e: (0.016_711_23, -0.000_043_92),
    i: (-0.000_015_31, -0.012_946_68),
    l: (100.464_571_66, 35_999.372_449_81),
    perihelion: (102.937_681_93, 0.323_273_64),
    node: (0.0, 0.0),
};

const MARS: OrbitalElements = OrbitalElements {
    a: (1.523_710_34, 0.000_018_47),
    e: (0.093_394_10, 0.000_078_82),
    i: (1.849_691_42, -0.008_131_31),
    l: (-4.553_432_05, 19_140.302_684_99),
    perihelion: (-23.943_629_59, 0.444_410_88),
    node: (49.559_538_91, -0.292_573_43),
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: (5.202_887_00, -0.000_116_07),
    e: (0.048_386_24, -0.000_132_53),
    i: (1.304_396_95, -0.001_837_14),
    l: (34.396_440_51, 3_034.746_127_75),
    perihelion: (14.728_479_83, 0.212_526_68),
    node: (100.473_909_09, 0.204_691_06),
};

const SATURN: OrbitalElements = OrbitalElements {
    a: (9.536_675_94, -0.001_250_60),
    e: (0.053_861_79, -0.000_509_91),
    i: (2.485_991_87, 0.001_936_09),
    l: (49.954_244_23, 1_222.493_622_01),
    perihelion: (92.598_878_31, -0.418_972_16),
    node: (113.662_424_48, -0.288_677_94),
};

const URANUS: OrbitalElements = OrbitalElements {
    a: (19.189_164_64, -0.001_961_76),
    e: (0.047_257_44, -0.000_043_97),
    i: (0.772_637_83, -0.002_429_39),
    l: (313.238_104_51, 428.482_027_85),
    perihelion: (170.954_276_30, 0.408_052_81),
    node: (74.016_925_03, 0.042_405_89),
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: (30.069_922_76, 0.000_262_91),
    e: (0.008_590_48, 0.000_051_05),
    i: (1.770_043_47, 0.000_353_72),
    l: (-55.120_029_69, 218.459_453_25),
    perihelion: (44.964_762_27, -0.322_414_64),
    node: (131.784_225_74, -0.005_086_64),
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: (39.482_116_75, -0.000_315_96),
    e: (0.248_827_30, 0.000_051_70),
    i: (17.140_012_06, 0.000_048_18),
    l: (238.929_038_33, 145.207_805_15),
    perihelion: (224.068_916_29, -0.040_629_42),
    node: (110.303_936_84, -0.011_834_82),
};

/// (amplitude, D, M, M', F) terms of the lunar longitude series
const MOON_LONGITUDE_TERMS: &[(f64, f64, f64, f64, f64)] = &[
    (6.288_774, 0.0, 0.0, 1.0, 0.0),
    (1.274_027, 2.0, 0.0, -1.0, 0.0),
    (0.658_314, 2.0, 0.0, 0.0, 0.0),
    (0.213_618, 0.0, 0.0, 2.0, 0.0),
    (-0.185_116, 0.0, 1.0, 0.0, 0.0),
    (-0.114_332, 0.0, 0.0, 0.0, 2.0),
    (0.058_793, 2.0, 0.0, -2.0, 0.0),
    (0.057_066, 2.0, -1.0, -1.0, 0.0),
    (0.053_322, 2.0, 0.0, 1.0, 0.0),
    (0.045_758, 2.0, -1.0, 0.0, 0.0),
    (-0.040_923, 0.0, 1.0, -1.0, 0.0),
    (-0.034_720, 1.0, 0.0, 0.0, 0.0),
    (-0.030_383, 0.0, 1.0, 1.0, 0.0),
    (0.015_327, 2.0, 0.0, 0.0, -2.0),
    (-0.012_528, 0.0, 0.0, 1.0, 2.0),
    (0.010_980, 0.0, 0.0, 1.0, -2.0),
    (0.010_675, 4.0, 0.0, -1.0, 0.0),
    (0.010_034, 0.0, 0.0, 3.0, 0.0),
    (0.008_548, 4.0, 0.0, -2.0, 0.0),
];

/// Pure-Rust ephemeris that needs no data files
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticEphemeris;

impl AnalyticEphemeris {
    pub fn new() -> Self {
        Self
    }

    /// Geocentric ecliptic longitude (equinox of date) in degrees
    pub fn longitude(&self, jd: JulianDay, body: CelestialBody) -> Result<f64, EphemerisError> {
        let t = jd.centuries();
        let lon = match body {
            CelestialBody::Sun => {
                let (x, y, _) = heliocentric(&EARTH_MOON_BARYCENTER, t)
                    .ok_or_else(|| kepler_failure(body, jd))?;
                (-y).atan2(-x).to_degrees() + PRECESSION_PER_CENTURY * t
            }
            CelestialBody::Moon => moon_longitude(t),
            CelestialBody::NorthNode => 125.044_547_9 - 1_934.136_289_1 * t,
            planet => {
                let elements = planet_elements(planet).ok_or_else(|| {
                    EphemerisError::UnsupportedBody {
                        body: planet,
                        source_name: self.name().to_string(),
                    }
                })?;
                let (xe, ye, _) = heliocentric(&EARTH_MOON_BARYCENTER, t)
                    .ok_or_else(|| kepler_failure(body, jd))?;
                let (xp, yp, _) =
                    heliocentric(&elements, t).ok_or_else(|| kepler_failure(body, jd))?;
                (yp - ye).atan2(xp - xe).to_degrees() + PRECESSION_PER_CENTURY * t
            }
        };

        if !lon.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                body,
                jd: jd.value(),
                message: "longitude is not finite".to_string(),
            });
        }
        Ok(normalize_degrees(lon))
    }
}

impl EphemerisSource for AnalyticEphemeris {
    fn name(&self) -> &str {
        "analytic"
    }

    fn resolve(&self, jd: JulianDay, body: CelestialBody) -> Result<RawPosition, EphemerisError> {
        let longitude = self.longitude(jd, body)?;
        let before = self.longitude(jd.add_days(-SPEED_STEP), body)?;
        let after = self.longitude(jd.add_days(SPEED_STEP), body)?;
        let speed = signed_difference(after - before) / (2.0 * SPEED_STEP);
        Ok(RawPosition { longitude, speed })
    }
}

fn planet_elements(body: CelestialBody) -> Option<OrbitalElements> {
    match body {
        CelestialBody::Mercury => Some(MERCURY),
        CelestialBody::Venus => Some(VENUS),
        CelestialBody::Mars => Some(MARS),
        CelestialBody::Jupiter => Some(JUPITER),
        CelestialBody::Saturn => Some(SATURN),
        CelestialBody::Uranus => Some(URANUS),
        CelestialBody::Neptune => Some(NEPTUNE),
        CelestialBody::Pluto => Some(PLUTO),
        _ => None,
    }
}

/// Heliocentric J2000 ecliptic coordinates (au)
fn heliocentric(el: &OrbitalElements, t: f64) -> Option<(f64, f64, f64)> {
    let at = |(base, rate): (f64, f64)| base + rate * t;

    let a = at(el.a);
    let e = at(el.e);
    let incl = at(el.i).to_radians();
    let mean_lon = at(el.l);
    let perihelion = at(el.perihelion);
    let node = at(el.node);

    let arg_perihelion = (perihelion - node).to_radians();
    let mean_anomaly = signed_difference(mean_lon - perihelion).to_radians();
    let ecc_anomaly = solve_kepler(mean_anomaly, e)?;

    let x_orb = a * (ecc_anomaly.cos() - e);
    let y_orb = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

    let (sin_w, cos_w) = arg_perihelion.sin_cos();
    let (sin_n, cos_n) = node.to_radians().sin_cos();
    let (sin_i, cos_i) = incl.sin_cos();

    let x = (cos_w * cos_n - sin_w * sin_n * cos_i) * x_orb
        + (-sin_w * cos_n - cos_w * sin_n * cos_i) * y_orb;
    let y = (cos_w * sin_n + sin_w * cos_n * cos_i) * x_orb
        + (-sin_w * sin_n + cos_w * cos_n * cos_i) * y_orb;
    let z = (sin_w * sin_i) * x_orb + (cos_w * sin_i) * y_orb;

    Some((x, y, z))
}

/// Newton iteration on E - e sin E = M (radians)
fn solve_kepler(mean_anomaly: f64, e: f64) -> Option<f64> {
    let mut ecc = if e < 0.8 { mean_anomaly } else { PI };
    for _ in 0..KEPLER_MAX_ITERATIONS {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < KEPLER_TOLERANCE {
            return Some(ecc);
        }
    }
    None
}

fn kepler_failure(body: CelestialBody, jd: JulianDay) -> EphemerisError {
    EphemerisError::CalculationFailed {
        body,
        jd: jd.value(),
        message: "Kepler equation did not converge".to_string(),
    }
}

fn moon_longitude(t: f64) -> f64 {
    let mean_lon = 218.316_447_7 + 481_267.881_234_21 * t;
    let elongation = (297.850_192_1 + 445_267.111_403_4 * t).to_radians();
    let sun_anomaly = (357.529_109_2 + 35_999.050_290_9 * t).to_radians();
    let moon_anomaly = (134.963_396_4 + 477_198.867_505_5 * t).to_radians();
    let latitude_arg = (93.272_095_0 + 483_202.017_523_3 * t).to_radians();

    let periodic: f64 = MOON_LONGITUDE_TERMS
        .iter()
        .map(|&(amp, d, m, mp, f)| {
            amp * (d * elongation + m * sun_anomaly + mp * moon_anomaly + f * latitude_arg).sin()
        })
        .sum();

    mean_lon + periodic
}
