//! House cusps, angles and planet placement.

pub mod placement;
pub mod placidus;
pub mod types;

pub use placement::house_for_longitude;
pub use types::{HouseCusp, HouseStatus, HouseSystem};

use crate::ephemeris::{EphemerisSource, GeoLocation};
use crate::time::JulianDay;

/// Computes a house system, degrading to the fallback layout on failure
pub struct HouseCalculator<'a> {
    source: &'a dyn EphemerisSource,
}

impl<'a> HouseCalculator<'a> {
    pub fn new(source: &'a dyn EphemerisSource) -> Self {
        Self { source }
    }

    pub fn calculate(&self, jd: JulianDay, location: &GeoLocation) -> HouseSystem {
        match self.source.houses(jd, location) {
            Ok(raw) => HouseSystem::from_raw(HouseSystem::PLACIDUS, &raw),
            Err(e) => {
                log::warn!(
                    "House calculation failed at lat {:.4}, using default layout: {}",
                    location.latitude,
                    e
                );
                HouseSystem::fallback(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::AnalyticEphemeris;

    #[test]
    fn test_high_latitude_degrades() {
        let source = AnalyticEphemeris::new();
        let houses = HouseCalculator::new(&source)
            .calculate(JulianDay(2_451_545.0), &GeoLocation::new(78.2, 15.6, 0.0));
        assert!(houses.is_degraded());
        assert_eq!(houses.ascendant, 0.0);
        assert_eq!(houses.cusps[3].longitude, 90.0);
    }

    #[test]
    fn test_moscow_is_computed() {
        let source = AnalyticEphemeris::new();
        let houses = HouseCalculator::new(&source)
            .calculate(JulianDay(2_451_545.0), &GeoLocation::new(55.7558, 37.6173, 156.0));
        assert_eq!(houses.status, HouseStatus::Computed);
        assert_eq!(houses.cusps.len(), 12);
        assert_eq!(houses.cusps[0].longitude, houses.ascendant);
    }
}
