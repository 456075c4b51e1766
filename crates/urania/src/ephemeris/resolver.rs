use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ephemeris::source::EphemerisSource;
use crate::ephemeris::types::{BodyPosition, CelestialBody};
use crate::time::JulianDay;

/// A body the source could not resolve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedBody {
    pub body: CelestialBody,
    pub reason: String,
}

/// Positions for one instant; partial when some lookups failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPositions {
    pub jd: JulianDay,
    pub positions: BTreeMap<CelestialBody, BodyPosition>,
    pub skipped: Vec<SkippedBody>,
}

impl ResolvedPositions {
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn get(&self, body: CelestialBody) -> Option<&BodyPosition> {
        self.positions.get(&body)
    }

    /// Bodies in apparent backward motion, in body order
    pub fn retrograde_bodies(&self) -> Vec<CelestialBody> {
        self.positions
            .values()
            .filter(|p| p.retrograde)
            .map(|p| p.body)
            .collect()
    }
}

/// Resolves a batch of bodies against an ephemeris source
pub struct PositionResolver<'a> {
    source: &'a dyn EphemerisSource,
}

impl<'a> PositionResolver<'a> {
    pub fn new(source: &'a dyn EphemerisSource) -> Self {
        Self { source }
    }

    /// Resolve every body; a failed lookup skips that body only
    pub fn resolve(&self, jd: JulianDay, bodies: &[CelestialBody]) -> ResolvedPositions {
        let mut positions = BTreeMap::new();
        let mut skipped = Vec::new();

        for &body in bodies {
            match self.source.resolve(jd, body) {
                Ok(raw) if raw.longitude.is_finite() && raw.speed.is_finite() => {
                    positions.insert(body, BodyPosition::from_raw(body, raw));
                }
                Ok(_) => {
                    log::warn!(
                        "{} ephemeris returned a non-finite position for {} at JD {}",
                        self.source.name(),
                        body,
                        jd.value()
                    );
                    skipped.push(SkippedBody {
                        body,
                        reason: "non-finite position".to_string(),
                    });
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", body, e);
                    skipped.push(SkippedBody {
                        body,
                        reason: e.to_string(),
                    });
                }
            }
        }

        ResolvedPositions {
            jd,
            positions,
            skipped,
        }
    }
}
