use crate::aspects::types::{AspectMotion, AspectPoint, AspectRecord, OrbEntry, OrbTable};
use crate::zodiac::{normalize_degrees, signed_difference};

/// Look-ahead used to decide whether an aspect is applying (days)
const MOTION_STEP: f64 = 0.1;

/// Finds aspects between sets of points using one orb table
#[derive(Debug, Clone, Default)]
pub struct AspectDetector {
    table: OrbTable,
}

impl AspectDetector {
    pub fn new(table: OrbTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &OrbTable {
        &self.table
    }

    /// Aspects among the points of one set, each unordered pair once
    pub fn detect_within(&self, points: &[AspectPoint]) -> Vec<AspectRecord> {
        let mut records = Vec::new();
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                if let Some(record) = self.compare(&points[i], &points[j]) {
                    records.push(record);
                }
            }
        }
        sort_by_strength(&mut records);
        records
    }

    /// Aspects from every point of `a` to every point of `b`
    pub fn detect_between(&self, a: &[AspectPoint], b: &[AspectPoint]) -> Vec<AspectRecord> {
        let mut records = Vec::new();
        for pa in a {
            for pb in b {
                if let Some(record) = self.compare(pa, pb) {
                    records.push(record);
                }
            }
        }
        sort_by_strength(&mut records);
        records
    }

    /// Aspect between two points; `None` for a point against itself or no match
    pub fn compare(&self, a: &AspectPoint, b: &AspectPoint) -> Option<AspectRecord> {
        if a.reference == b.reference {
            return None;
        }
        let separation = angular_separation(a.longitude, b.longitude);
        let (entry, deviation) = self.classify(separation)?;
        let motion = match (a.speed, b.speed) {
            (Some(sa), Some(sb)) => aspect_motion(a.longitude, b.longitude, sa, sb, entry),
            _ => None,
        };

        Some(AspectRecord {
            from: a.reference,
            to: b.reference,
            kind: entry.kind,
            exact_angle: entry.kind.exact_angle(),
            actual_angle: separation,
            orb: deviation,
            allowed_orb: entry.orb,
            strength: 1.0 - deviation / entry.orb,
            is_strong: None,
            motion,
        })
    }

    /// First table entry whose orb contains the separation, with its deviation
    pub fn classify(&self, separation: f64) -> Option<(OrbEntry, f64)> {
        if !separation.is_finite() {
            return None;
        }
        self.table.entries().iter().find_map(|entry| {
            let deviation = (separation - entry.kind.exact_angle()).abs();
            // the orb edge itself still counts, at strength 0
            if deviation <= entry.orb {
                Some((*entry, deviation))
            } else {
                None
            }
        })
    }
}

/// Shortest arc between two longitudes, in [0, 180]
pub fn angular_separation(a: f64, b: f64) -> f64 {
    let diff = (normalize_degrees(a) - normalize_degrees(b)).abs();
    diff.min(360.0 - diff)
}

/// Stable sort, strongest first; equal strengths keep discovery order
fn sort_by_strength(records: &mut [AspectRecord]) {
    records.sort_by(|x, y| y.strength.total_cmp(&x.strength));
}

/// Applying when the separation moves toward the exact angle
fn aspect_motion(
    lon_a: f64,
    lon_b: f64,
    speed_a: f64,
    speed_b: f64,
    entry: OrbEntry,
) -> Option<AspectMotion> {
    let relative_speed = speed_a - speed_b;
    if relative_speed.abs() < 1e-9 {
        return None;
    }
    let exact = entry.kind.exact_angle();
    let now = signed_difference(lon_a - lon_b);
    let later = signed_difference(now + relative_speed * MOTION_STEP);
    let distance_now = (now.abs() - exact).abs();
    let distance_later = (later.abs() - exact).abs();

    if distance_later < distance_now {
        Some(AspectMotion::Applying)
    } else {
        Some(AspectMotion::Separating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::types::{AspectKind, ChartPoint, PointRef};
    use crate::ephemeris::CelestialBody;

    fn natal(body: CelestialBody, longitude: f64, speed: Option<f64>) -> AspectPoint {
        AspectPoint {
            reference: PointRef::natal(ChartPoint::Body(body)),
            longitude,
            speed,
        }
    }

    #[test]
    fn test_angular_separation_wraps() {
        assert_eq!(angular_separation(358.0, 2.0), 4.0);
        assert_eq!(angular_separation(2.0, 358.0), 4.0);
        assert_eq!(angular_separation(0.0, 180.0), 180.0);
        assert_eq!(angular_separation(-90.0, 90.0), 180.0);
    }

    #[test]
    fn test_orb_edge_is_inclusive() {
        let detector = AspectDetector::new(OrbTable::major());
        let (entry, deviation) = detector.classify(8.0).unwrap();
        assert_eq!(entry.kind, AspectKind::Conjunction);
        assert_eq!(deviation, 8.0);

        let (entry, deviation) = detector.classify(66.0).unwrap();
        assert_eq!(entry.kind, AspectKind::Sextile);
        assert_eq!(deviation, 6.0);

        assert!(detector.classify(8.01).is_none());
        assert!(detector.classify(66.01).is_none());
    }

    #[test]
    fn test_orb_edge_has_zero_strength() {
        let detector = AspectDetector::new(OrbTable::major());
        let record = detector
            .compare(
                &natal(CelestialBody::Sun, 0.0, None),
                &natal(CelestialBody::Moon, 66.0, None),
            )
            .unwrap();
        assert_eq!(record.kind, AspectKind::Sextile);
        assert_eq!(record.strength, 0.0);
    }

    #[test]
    fn test_lower_angle_wins_on_overlap() {
        let mut table = OrbTable::major();
        table.set_orb(AspectKind::Sextile, 20.0).unwrap();
        table.set_orb(AspectKind::Square, 20.0).unwrap();
        let detector = AspectDetector::new(table);
        let (entry, _) = detector.classify(75.0).unwrap();
        assert_eq!(entry.kind, AspectKind::Sextile);
    }

    #[test]
    fn test_applying_and_separating() {
        let detector = AspectDetector::new(OrbTable::major());
        // Moon at 85 moving toward a square with Sun at 0
        let applying = detector
            .compare(
                &natal(CelestialBody::Moon, 85.0, Some(13.0)),
                &natal(CelestialBody::Sun, 0.0, Some(1.0)),
            )
            .unwrap();
        assert_eq!(applying.motion, Some(AspectMotion::Applying));

        let separating = detector
            .compare(
                &natal(CelestialBody::Moon, 95.0, Some(13.0)),
                &natal(CelestialBody::Sun, 0.0, Some(1.0)),
            )
            .unwrap();
        assert_eq!(separating.motion, Some(AspectMotion::Separating));

        let fixed = detector
            .compare(
                &natal(CelestialBody::Moon, 95.0, None),
                &natal(CelestialBody::Sun, 0.0, Some(1.0)),
            )
            .unwrap();
        assert_eq!(fixed.motion, None);
    }
}
