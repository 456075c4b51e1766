use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aspects::{AspectDetector, AspectPoint, AspectRecord, ChartPoint, OrbTable, PointRef};
use crate::chart::natal::NatalChart;
use crate::ephemeris::{
    BodyPosition, CelestialBody, EphemerisSource, PositionResolver, SkippedBody, TRANSIT_BODIES,
};
use crate::error::{ForecastError, Result};
use crate::time::JulianDay;

/// Strength above which a transit aspect counts as strong
pub const STRONG_ASPECT_THRESHOLD: f64 = 0.7;

/// Transits to a natal chart on one date.
///
/// A report with `calculation_error = true` is the well-formed empty result of a
/// failed evaluation; zero aspects with the flag unset means none were found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitReport {
    pub target_date: NaiveDate,
    pub positions: BTreeMap<CelestialBody, BodyPosition>,
    #[serde(default)]
    pub skipped: Vec<SkippedBody>,
    /// Strongest first
    pub aspects: Vec<AspectRecord>,
    pub aspects_count: usize,
    pub strong_aspects_count: usize,
    pub retrograde_bodies: Vec<CelestialBody>,
    pub calculation_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TransitReport {
    pub fn failed(target_date: NaiveDate, message: impl Into<String>) -> Self {
        Self {
            target_date,
            positions: BTreeMap::new(),
            skipped: Vec::new(),
            aspects: Vec::new(),
            aspects_count: 0,
            strong_aspects_count: 0,
            retrograde_bodies: Vec::new(),
            calculation_error: true,
            error_message: Some(message.into()),
        }
    }

    pub fn top_aspects(&self, n: usize) -> &[AspectRecord] {
        &self.aspects[..n.min(self.aspects.len())]
    }

    pub fn strong_aspects(&self) -> impl Iterator<Item = &AspectRecord> {
        self.aspects.iter().filter(|a| a.is_strong == Some(true))
    }
}

/// Compares positions on a target date against a natal chart
#[derive(Debug, Clone)]
pub struct TransitEvaluator {
    detector: AspectDetector,
    bodies: Vec<CelestialBody>,
}

impl TransitEvaluator {
    pub fn new(orbs: OrbTable, bodies: Vec<CelestialBody>) -> Self {
        Self {
            detector: AspectDetector::new(orbs),
            bodies,
        }
    }

    /// Always returns a report; failures are flagged on it
    pub fn evaluate(
        &self,
        source: &dyn EphemerisSource,
        natal: &NatalChart,
        target_date: NaiveDate,
    ) -> TransitReport {
        match self.try_evaluate(source, natal, target_date) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Transit evaluation for {} failed: {}", target_date, e);
                TransitReport::failed(target_date, e.to_string())
            }
        }
    }

    pub fn try_evaluate(
        &self,
        source: &dyn EphemerisSource,
        natal: &NatalChart,
        target_date: NaiveDate,
    ) -> Result<TransitReport> {
        let jd = JulianDay::noon(target_date);
        let resolved = PositionResolver::new(source).resolve(jd, &self.bodies);
        if resolved.is_empty() {
            return Err(ForecastError::NoPositions(format!(
                "no transiting body resolved for {target_date}"
            )));
        }

        // natal points are fixed in time
        let natal_points: Vec<AspectPoint> = natal
            .aspect_points()
            .into_iter()
            .map(|p| AspectPoint {
                speed: Some(0.0),
                ..p
            })
            .collect();
        if natal_points.is_empty() {
            return Err(ForecastError::NoPositions(
                "natal chart has no aspect points".to_string(),
            ));
        }

        let transit_points: Vec<AspectPoint> = resolved
            .positions
            .values()
            .map(|pos| AspectPoint {
                reference: PointRef::transit(ChartPoint::Body(pos.body)),
                longitude: pos.longitude,
                speed: Some(pos.speed),
            })
            .collect();

        let aspects: Vec<AspectRecord> = self
            .detector
            .detect_between(&transit_points, &natal_points)
            .into_iter()
            .map(|mut aspect| {
                aspect.is_strong = Some(aspect.strength > STRONG_ASPECT_THRESHOLD);
                aspect
            })
            .collect();

        let strong_aspects_count = aspects
            .iter()
            .filter(|a| a.is_strong == Some(true))
            .count();
        let retrograde_bodies = resolved.retrograde_bodies();

        log::debug!(
            "Transits for {}: {} aspects ({} strong), {} retrograde",
            target_date,
            aspects.len(),
            strong_aspects_count,
            retrograde_bodies.len()
        );

        Ok(TransitReport {
            target_date,
            positions: resolved.positions,
            skipped: resolved.skipped,
            aspects_count: aspects.len(),
            strong_aspects_count,
            aspects,
            retrograde_bodies,
            calculation_error: false,
            error_message: None,
        })
    }
}

impl Default for TransitEvaluator {
    fn default() -> Self {
        Self::new(OrbTable::major(), TRANSIT_BODIES.to_vec())
    }
}
