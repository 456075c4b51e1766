//! Placidus cusps by semi-arc trisection.
//!
//! Intermediate cusps are found by fixed-point iteration on right ascension: a
//! cusp's RA depends on its declination through the diurnal (or nocturnal)
//! semi-arc, and the declination depends on the RA through the ecliptic.

use std::f64::consts::PI;

use crate::error::EphemerisError;
use crate::ephemeris::RawHouses;
use crate::zodiac::normalize_degrees;

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE: f64 = 1e-9;

/// Cusps and angles for a sidereal time, latitude and obliquity (all degrees)
pub fn placidus_houses(
    ramc: f64,
    latitude: f64,
    obliquity: f64,
) -> Result<RawHouses, EphemerisError> {
    if !ramc.is_finite() || !latitude.is_finite() || !obliquity.is_finite() {
        return Err(failure("non-finite input".to_string()));
    }
    if latitude.abs() >= 90.0 - obliquity {
        return Err(failure(format!(
            "latitude {latitude:.4} is inside the polar circle"
        )));
    }

    let ramc_r = ramc.to_radians();
    let phi = latitude.to_radians();
    let eps = obliquity.to_radians();

    let ascendant = ascendant(ramc_r, phi, eps);
    let midheaven = midheaven(ramc_r, eps);

    let c11 = intermediate_cusp(ramc_r, phi, eps, Quadrant::Upper(1.0 / 3.0))?;
    let c12 = intermediate_cusp(ramc_r, phi, eps, Quadrant::Upper(2.0 / 3.0))?;
    let c2 = intermediate_cusp(ramc_r, phi, eps, Quadrant::Lower(2.0 / 3.0))?;
    let c3 = intermediate_cusp(ramc_r, phi, eps, Quadrant::Lower(1.0 / 3.0))?;

    let opposite = |lon: f64| normalize_degrees(lon + 180.0);
    let cusps = [
        ascendant,
        c2,
        c3,
        opposite(midheaven),
        opposite(c11),
        opposite(c12),
        opposite(ascendant),
        opposite(c2),
        opposite(c3),
        midheaven,
        c11,
        c12,
    ];

    if cusps.iter().any(|c| !c.is_finite()) {
        return Err(failure("non-finite cusp".to_string()));
    }

    Ok(RawHouses {
        cusps,
        ascendant,
        midheaven,
    })
}

/// Ecliptic degree rising on the eastern horizon
pub fn ascendant(ramc: f64, phi: f64, eps: f64) -> f64 {
    let y = ramc.cos();
    let x = -(ramc.sin() * eps.cos() + phi.tan() * eps.sin());
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Ecliptic degree culminating on the meridian
pub fn midheaven(ramc: f64, eps: f64) -> f64 {
    normalize_degrees(ramc.sin().atan2(ramc.cos() * eps.cos()).to_degrees())
}

#[derive(Debug, Clone, Copy)]
enum Quadrant {
    /// Fraction of the diurnal semi-arc east of the MC (cusps 11, 12)
    Upper(f64),
    /// Fraction of the nocturnal semi-arc west of the IC (cusps 3, 2)
    Lower(f64),
}

fn intermediate_cusp(
    ramc: f64,
    phi: f64,
    eps: f64,
    quadrant: Quadrant,
) -> Result<f64, EphemerisError> {
    let target = |dsa: f64| match quadrant {
        Quadrant::Upper(f) => ramc + f * dsa,
        Quadrant::Lower(f) => ramc + PI - f * (PI - dsa),
    };

    let mut ra = target(PI / 2.0);
    for _ in 0..MAX_ITERATIONS {
        let declination = (eps.tan() * ra.sin()).atan();
        let dsa = diurnal_semi_arc(phi, declination)?;
        let next = target(dsa);
        if (next - ra).abs() < CONVERGENCE {
            return Ok(normalize_degrees(ecliptic_from_ra(next, eps).to_degrees()));
        }
        if !next.is_finite() {
            break;
        }
        ra = next;
    }
    Err(failure("cusp iteration did not converge".to_string()))
}

/// Ecliptic longitude (radians) of the point with right ascension `ra`
fn ecliptic_from_ra(ra: f64, eps: f64) -> f64 {
    ra.sin().atan2(ra.cos() * eps.cos())
}

fn diurnal_semi_arc(phi: f64, declination: f64) -> Result<f64, EphemerisError> {
    let cos_h = -phi.tan() * declination.tan();
    if !(-1.0..=1.0).contains(&cos_h) {
        return Err(failure(format!(
            "circumpolar cusp degree (cos H = {cos_h:.6})"
        )));
    }
    Ok(cos_h.acos())
}

fn failure(message: String) -> EphemerisError {
    EphemerisError::HouseCalculationFailed { message }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBLIQUITY: f64 = 23.4392911;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d) < tol
    }

    #[test]
    fn test_equator_at_zero_sidereal_time() {
        let houses = placidus_houses(0.0, 0.0, OBLIQUITY).unwrap();
        assert!(close(houses.midheaven, 0.0, 1e-9));
        assert!(close(houses.ascendant, 90.0, 1e-9));
        let expected = [90.0, 117.9, 147.8, 180.0, 212.2, 242.1, 270.0, 297.9, 327.8, 0.0, 32.2, 62.1];
        for (cusp, want) in houses.cusps.iter().zip(expected) {
            assert!(close(*cusp, want, 0.1), "cusp {cusp} expected {want}");
        }
    }

    #[test]
    fn test_angles_are_cusps() {
        let houses = placidus_houses(123.4, 51.5, OBLIQUITY).unwrap();
        assert_eq!(houses.cusps[0], houses.ascendant);
        assert_eq!(houses.cusps[9], houses.midheaven);
        assert!(close(houses.cusps[3], houses.midheaven + 180.0, 1e-9));
        assert!(close(houses.cusps[6], houses.ascendant + 180.0, 1e-9));
    }

    #[test]
    fn test_cusps_in_zodiac_order() {
        for &lat in &[-45.0, -10.0, 0.0, 30.0, 55.75] {
            for step in 0..24 {
                let ramc = step as f64 * 15.0;
                let houses = placidus_houses(ramc, lat, OBLIQUITY).unwrap();
                let mut total = 0.0;
                for i in 0..12 {
                    let span = (houses.cusps[(i + 1) % 12] - houses.cusps[i]).rem_euclid(360.0);
                    assert!(span > 0.0 && span < 180.0, "lat {lat} ramc {ramc} house {}", i + 1);
                    total += span;
                }
                assert!((total - 360.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_polar_latitude_fails() {
        assert!(placidus_houses(10.0, 70.0, OBLIQUITY).is_err());
        assert!(placidus_houses(10.0, -89.0, OBLIQUITY).is_err());
    }
}
