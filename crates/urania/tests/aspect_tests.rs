use urania::aspects::{
    angular_separation, AspectDetector, AspectKind, AspectPoint, ChartPoint, OrbTable, PointRef,
};
use urania::ephemeris::CelestialBody;

fn natal(body: CelestialBody, longitude: f64) -> AspectPoint {
    AspectPoint {
        reference: PointRef::natal(ChartPoint::Body(body)),
        longitude,
        speed: None,
    }
}

fn transit(body: CelestialBody, longitude: f64) -> AspectPoint {
    AspectPoint {
        reference: PointRef::transit(ChartPoint::Body(body)),
        longitude,
        speed: None,
    }
}

#[test]
fn test_exact_square() {
    let detector = AspectDetector::new(OrbTable::major());
    let record = detector
        .compare(
            &natal(CelestialBody::Sun, 90.0),
            &natal(CelestialBody::Moon, 0.0),
        )
        .unwrap();
    assert_eq!(record.kind, AspectKind::Square);
    assert_eq!(record.orb, 0.0);
    assert_eq!(record.strength, 1.0);
    assert_eq!(record.describe(), "Sun square Moon");
}

#[test]
fn test_conjunction_across_zero_aries() {
    let detector = AspectDetector::new(OrbTable::major());
    let record = detector
        .compare(
            &natal(CelestialBody::Venus, 358.0),
            &natal(CelestialBody::Mars, 2.0),
        )
        .unwrap();
    assert_eq!(record.kind, AspectKind::Conjunction);
    assert!((record.actual_angle - 4.0).abs() < 1e-9);
    assert!((record.strength - 0.5).abs() < 1e-9);
}

#[test]
fn test_aspects_at_the_orb_edge() {
    let detector = AspectDetector::new(OrbTable::major());
    let conj = detector
        .compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, 8.0))
        .unwrap();
    assert_eq!(conj.kind, AspectKind::Conjunction);
    assert_eq!(conj.orb, conj.allowed_orb);
    assert_eq!(conj.strength, 0.0);

    let sextile = detector
        .compare(&transit(CelestialBody::Mars, 66.0), &natal(CelestialBody::Sun, 0.0))
        .unwrap();
    assert_eq!(sextile.kind, AspectKind::Sextile);
    assert_eq!(sextile.strength, 0.0);

    assert!(detector
        .compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, 8.5))
        .is_none());
}

#[test]
fn test_conjunction_and_opposition_extremes() {
    let detector = AspectDetector::new(OrbTable::major());
    let conj = detector
        .compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, 0.0))
        .unwrap();
    assert_eq!(conj.kind, AspectKind::Conjunction);
    let opp = detector
        .compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, 180.0))
        .unwrap();
    assert_eq!(opp.kind, AspectKind::Opposition);
    assert_eq!(opp.strength, 1.0);
}

#[test]
fn test_separation_symmetric_and_bounded() {
    let mut a = 0.0;
    while a < 360.0 {
        let mut b = 0.0;
        while b < 360.0 {
            let s = angular_separation(a, b);
            assert!((0.0..=180.0).contains(&s));
            assert_eq!(s, angular_separation(b, a));
            b += 17.5;
        }
        a += 13.25;
    }
}

#[test]
fn test_strength_always_in_unit_interval() {
    let detector = AspectDetector::new(OrbTable::with_minor());
    let mut lon = 0.0;
    while lon < 360.0 {
        if let Some(record) =
            detector.compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, lon))
        {
            assert!(record.strength >= 0.0 && record.strength <= 1.0, "{:?}", record);
            assert!(record.orb <= record.allowed_orb);
        }
        lon += 0.25;
    }
}

#[test]
fn test_no_aspect_outside_every_orb() {
    let detector = AspectDetector::new(OrbTable::major());
    // 40° is past the conjunction orb and short of the sextile orb
    assert!(detector
        .compare(&natal(CelestialBody::Sun, 0.0), &natal(CelestialBody::Moon, 40.0))
        .is_none());
}

#[test]
fn test_same_body_across_layers_is_an_aspect() {
    let detector = AspectDetector::new(OrbTable::major());
    let records = detector.detect_between(
        &[transit(CelestialBody::Saturn, 120.5)],
        &[natal(CelestialBody::Saturn, 120.0)],
    );
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].kind, AspectKind::Conjunction);
    assert_ne!(records[0].from, records[0].to);
}

#[test]
fn test_detect_within_sorted_by_strength() {
    let detector = AspectDetector::new(OrbTable::major());
    let points = vec![
        natal(CelestialBody::Sun, 10.0),
        natal(CelestialBody::Moon, 16.0),
        natal(CelestialBody::Mercury, 100.5),
        natal(CelestialBody::Venus, 250.0),
    ];
    let records = detector.detect_within(&points);
    assert!(!records.is_empty());
    for pair in records.windows(2) {
        assert!(pair[0].strength >= pair[1].strength);
    }
    // each unordered pair at most once
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            assert!(!(a.from == b.from && a.to == b.to));
            assert!(!(a.from == b.to && a.to == b.from));
        }
    }
}

#[test]
fn test_detection_is_deterministic() {
    let detector = AspectDetector::new(OrbTable::with_minor());
    let points: Vec<AspectPoint> = [
        CelestialBody::Sun,
        CelestialBody::Moon,
        CelestialBody::Mercury,
        CelestialBody::Venus,
        CelestialBody::Mars,
        CelestialBody::Jupiter,
    ]
    .iter()
    .enumerate()
    .map(|(i, &body)| natal(body, i as f64 * 47.3))
    .collect();
    assert_eq!(detector.detect_within(&points), detector.detect_within(&points));
}
