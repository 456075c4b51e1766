pub mod analytic;
pub mod resolver;
pub mod source;
#[cfg(feature = "swiss")]
pub mod swiss;
pub mod types;

pub use analytic::AnalyticEphemeris;
pub use resolver::{PositionResolver, ResolvedPositions, SkippedBody};
pub use source::EphemerisSource;
#[cfg(feature = "swiss")]
pub use swiss::SwissEphemeris;
pub use types::{
    BodyPosition, CelestialBody, GeoLocation, RawHouses, RawPosition, NATAL_BODIES,
    TRANSIT_BODIES,
};
