use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aspects::{
    AspectDetector, AspectKind, AspectPoint, AspectRecord, ChartAngle, ChartPoint, OrbTable,
    PointRef,
};
use crate::chart::profile::BirthProfile;
use crate::ephemeris::{
    BodyPosition, CelestialBody, EphemerisSource, PositionResolver, SkippedBody, NATAL_BODIES,
};
use crate::error::{ForecastError, Result};
use crate::houses::{house_for_longitude, HouseCalculator, HouseSystem};
use crate::zodiac::{Element, ZodiacSign};

/// Aggregates derived from a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFeatures {
    /// Bodies per sign; every sign is present
    pub sign_distribution: BTreeMap<ZodiacSign, u32>,
    /// Bodies per element; every element is present
    pub element_balance: BTreeMap<Element, u32>,
    /// Aspects per kind; major kinds are always present
    pub aspect_patterns: BTreeMap<AspectKind, u32>,
}

impl ChartFeatures {
    pub fn derive<'a>(
        positions: impl IntoIterator<Item = &'a BodyPosition>,
        aspects: &[AspectRecord],
    ) -> Self {
        let mut sign_distribution: BTreeMap<ZodiacSign, u32> =
            ZodiacSign::ALL.iter().map(|&s| (s, 0)).collect();
        let mut element_balance: BTreeMap<Element, u32> =
            Element::ALL.iter().map(|&e| (e, 0)).collect();
        for pos in positions {
            *sign_distribution.entry(pos.sign).or_insert(0) += 1;
            *element_balance.entry(pos.sign.element()).or_insert(0) += 1;
        }

        let mut aspect_patterns: BTreeMap<AspectKind, u32> =
            AspectKind::MAJOR.iter().map(|&k| (k, 0)).collect();
        for aspect in aspects {
            *aspect_patterns.entry(aspect.kind).or_insert(0) += 1;
        }

        Self {
            sign_distribution,
            element_balance,
            aspect_patterns,
        }
    }

    /// Element holding the most bodies; ties go to the earlier element
    pub fn dominant_element(&self) -> Option<Element> {
        let mut best: Option<(Element, u32)> = None;
        for (&element, &count) in &self.element_balance {
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((element, count));
            }
        }
        best.map(|(element, _)| element)
    }
}

/// A natal chart, built once per birth profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    pub profile: BirthProfile,
    pub positions: BTreeMap<CelestialBody, BodyPosition>,
    /// Bodies the ephemeris could not resolve
    #[serde(default)]
    pub skipped: Vec<SkippedBody>,
    pub houses: HouseSystem,
    pub house_placements: BTreeMap<CelestialBody, u8>,
    pub aspects: Vec<AspectRecord>,
    pub features: ChartFeatures,
}

impl NatalChart {
    /// Houses come from the fallback layout rather than a real computation
    pub fn is_degraded(&self) -> bool {
        self.houses.is_degraded()
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty()
    }

    pub fn position(&self, body: CelestialBody) -> Option<&BodyPosition> {
        self.positions.get(&body)
    }

    pub fn house_of(&self, body: CelestialBody) -> Option<u8> {
        self.house_placements.get(&body).copied()
    }

    /// Bodies, then Ascendant and Midheaven, as natal aspect points
    pub fn aspect_points(&self) -> Vec<AspectPoint> {
        natal_points(&self.positions, &self.houses)
    }
}

fn natal_points(
    positions: &BTreeMap<CelestialBody, BodyPosition>,
    houses: &HouseSystem,
) -> Vec<AspectPoint> {
    let mut points: Vec<AspectPoint> = positions
        .values()
        .map(|pos| AspectPoint {
            reference: PointRef::natal(ChartPoint::Body(pos.body)),
            longitude: pos.longitude,
            speed: Some(pos.speed),
        })
        .collect();
    points.push(AspectPoint {
        reference: PointRef::natal(ChartPoint::Angle(ChartAngle::Ascendant)),
        longitude: houses.ascendant,
        speed: None,
    });
    points.push(AspectPoint {
        reference: PointRef::natal(ChartPoint::Angle(ChartAngle::Midheaven)),
        longitude: houses.midheaven,
        speed: None,
    });
    points
}

/// Builds natal charts from birth profiles
#[derive(Debug, Clone)]
pub struct NatalChartAssembler {
    detector: AspectDetector,
    bodies: Vec<CelestialBody>,
}

impl NatalChartAssembler {
    pub fn new(orbs: OrbTable, bodies: Vec<CelestialBody>) -> Self {
        Self {
            detector: AspectDetector::new(orbs),
            bodies,
        }
    }

    pub fn assemble(
        &self,
        source: &dyn EphemerisSource,
        profile: &BirthProfile,
    ) -> Result<NatalChart> {
        profile.location.validate()?;
        let jd = profile.birth_jd()?;

        let resolved = PositionResolver::new(source).resolve(jd, &self.bodies);
        if resolved.is_empty() {
            return Err(ForecastError::NoPositions(format!(
                "{} ephemeris resolved none of {} bodies at JD {:.5}",
                source.name(),
                self.bodies.len(),
                jd.value()
            )));
        }

        let houses = HouseCalculator::new(source).calculate(jd, &profile.location);
        let cusps = houses.cusp_longitudes();
        let house_placements = resolved
            .positions
            .values()
            .map(|pos| (pos.body, house_for_longitude(&cusps, pos.longitude)))
            .collect();

        let aspects = self
            .detector
            .detect_within(&natal_points(&resolved.positions, &houses));
        let features = ChartFeatures::derive(resolved.positions.values(), &aspects);

        log::debug!(
            "Natal chart for {}: {} bodies, {} aspects, degraded houses: {}",
            profile.birth_date,
            resolved.positions.len(),
            aspects.len(),
            houses.is_degraded()
        );

        Ok(NatalChart {
            profile: profile.clone(),
            positions: resolved.positions,
            skipped: resolved.skipped,
            houses,
            house_placements,
            aspects,
            features,
        })
    }
}

impl Default for NatalChartAssembler {
    fn default() -> Self {
        Self::new(OrbTable::major(), NATAL_BODIES.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::RawPosition;

    fn position(body: CelestialBody, longitude: f64) -> BodyPosition {
        BodyPosition::from_raw(body, RawPosition { longitude, speed: 1.0 })
    }

    #[test]
    fn test_features_cover_all_signs_and_elements() {
        let positions = vec![
            position(CelestialBody::Sun, 10.0),
            position(CelestialBody::Moon, 130.0),
            position(CelestialBody::Mars, 250.0),
            position(CelestialBody::Venus, 40.0),
        ];
        let features = ChartFeatures::derive(positions.iter(), &[]);
        assert_eq!(features.sign_distribution.len(), 12);
        assert_eq!(features.sign_distribution[&ZodiacSign::Aries], 1);
        assert_eq!(features.sign_distribution[&ZodiacSign::Gemini], 0);
        assert_eq!(features.element_balance[&Element::Fire], 3);
        assert_eq!(features.element_balance[&Element::Earth], 1);
        assert_eq!(features.element_balance[&Element::Water], 0);
        assert_eq!(features.dominant_element(), Some(Element::Fire));
        assert_eq!(features.aspect_patterns[&AspectKind::Trine], 0);
    }

    #[test]
    fn test_dominant_element_empty() {
        let features = ChartFeatures::derive(std::iter::empty::<&BodyPosition>(), &[]);
        assert_eq!(features.dominant_element(), None);
    }
}
