use crate::error::EphemerisError;
use crate::ephemeris::types::{CelestialBody, GeoLocation, RawHouses, RawPosition};
use crate::houses::placidus;
use crate::time::{local_sidereal_degrees, mean_obliquity_degrees, JulianDay};

/// Read-only ephemeris data source.
///
/// Implementations must tolerate concurrent reads; the engine shares one source
/// across every calculation.
pub trait EphemerisSource: Send + Sync {
    /// Short identifier used in logs and errors
    fn name(&self) -> &str;

    /// Raw longitude and daily motion of one body
    fn resolve(&self, jd: JulianDay, body: CelestialBody) -> Result<RawPosition, EphemerisError>;

    /// Placidus cusps and angles for an instant and place
    fn houses(&self, jd: JulianDay, location: &GeoLocation) -> Result<RawHouses, EphemerisError> {
        placidus::placidus_houses(
            local_sidereal_degrees(jd, location.longitude),
            location.latitude,
            mean_obliquity_degrees(jd),
        )
    }
}
