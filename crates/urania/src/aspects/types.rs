use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ephemeris::CelestialBody;
use crate::error::ForecastError;

/// Aspect kinds, ordered by exact angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    Conjunction,
    SemiSextile,
    SemiSquare,
    Sextile,
    Square,
    Trine,
    Sesquiquadrate,
    Quincunx,
    Opposition,
}

/// How an aspect is read when building advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectNature {
    Harmonious,
    Challenging,
    Minor,
}

impl AspectKind {
    pub const MAJOR: [AspectKind; 5] = [
        AspectKind::Conjunction,
        AspectKind::Sextile,
        AspectKind::Square,
        AspectKind::Trine,
        AspectKind::Opposition,
    ];

    pub const MINOR: [AspectKind; 4] = [
        AspectKind::SemiSextile,
        AspectKind::SemiSquare,
        AspectKind::Sesquiquadrate,
        AspectKind::Quincunx,
    ];

    pub fn exact_angle(&self) -> f64 {
        match self {
            AspectKind::Conjunction => 0.0,
            AspectKind::SemiSextile => 30.0,
            AspectKind::SemiSquare => 45.0,
            AspectKind::Sextile => 60.0,
            AspectKind::Square => 90.0,
            AspectKind::Trine => 120.0,
            AspectKind::Sesquiquadrate => 135.0,
            AspectKind::Quincunx => 150.0,
            AspectKind::Opposition => 180.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AspectKind::Conjunction => "conjunction",
            AspectKind::SemiSextile => "semi_sextile",
            AspectKind::SemiSquare => "semi_square",
            AspectKind::Sextile => "sextile",
            AspectKind::Square => "square",
            AspectKind::Trine => "trine",
            AspectKind::Sesquiquadrate => "sesquiquadrate",
            AspectKind::Quincunx => "quincunx",
            AspectKind::Opposition => "opposition",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase().replace('-', "_");
        Self::MAJOR
            .iter()
            .chain(Self::MINOR.iter())
            .copied()
            .find(|kind| kind.name() == name)
    }

    pub fn is_major(&self) -> bool {
        Self::MAJOR.contains(self)
    }

    pub fn nature(&self) -> AspectNature {
        match self {
            AspectKind::Conjunction | AspectKind::Sextile | AspectKind::Trine => {
                AspectNature::Harmonious
            }
            AspectKind::Square | AspectKind::Opposition => AspectNature::Challenging,
            _ => AspectNature::Minor,
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of an orb table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbEntry {
    pub kind: AspectKind,
    /// Maximum deviation from the exact angle, in degrees
    pub orb: f64,
}

/// Aspect kinds and allowed orbs, walked in ascending exact-angle order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbTable {
    entries: Vec<OrbEntry>,
}

impl OrbTable {
    /// Conjunction, sextile, square, trine, opposition
    pub fn major() -> Self {
        Self::from_entries(vec![
            OrbEntry { kind: AspectKind::Conjunction, orb: 8.0 },
            OrbEntry { kind: AspectKind::Sextile, orb: 6.0 },
            OrbEntry { kind: AspectKind::Square, orb: 8.0 },
            OrbEntry { kind: AspectKind::Trine, orb: 8.0 },
            OrbEntry { kind: AspectKind::Opposition, orb: 8.0 },
        ])
    }

    /// Major table plus the minor aspects at 3°
    pub fn with_minor() -> Self {
        let mut entries = Self::major().entries;
        entries.extend(AspectKind::MINOR.iter().map(|&kind| OrbEntry { kind, orb: 3.0 }));
        Self::from_entries(entries)
    }

    fn from_entries(mut entries: Vec<OrbEntry>) -> Self {
        entries.sort_by(|a, b| a.kind.exact_angle().total_cmp(&b.kind.exact_angle()));
        Self { entries }
    }

    /// Set the orb for a kind, adding the kind when missing
    pub fn set_orb(&mut self, kind: AspectKind, orb: f64) -> Result<(), ForecastError> {
        if !orb.is_finite() || orb <= 0.0 || orb > 30.0 {
            return Err(ForecastError::InvalidOrb {
                kind: kind.name().to_string(),
                orb,
            });
        }
        match self.entries.iter_mut().find(|e| e.kind == kind) {
            Some(entry) => entry.orb = orb,
            None => {
                self.entries.push(OrbEntry { kind, orb });
                self.entries
                    .sort_by(|a, b| a.kind.exact_angle().total_cmp(&b.kind.exact_angle()));
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[OrbEntry] {
        &self.entries
    }

    pub fn orb_for(&self, kind: AspectKind) -> Option<f64> {
        self.entries.iter().find(|e| e.kind == kind).map(|e| e.orb)
    }
}

impl Default for OrbTable {
    fn default() -> Self {
        Self::major()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartAngle {
    Ascendant,
    Midheaven,
}

impl ChartAngle {
    pub fn label(&self) -> &'static str {
        match self {
            ChartAngle::Ascendant => "Ascendant",
            ChartAngle::Midheaven => "Midheaven",
        }
    }
}

/// A body or a chart angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChartPoint {
    Body(CelestialBody),
    Angle(ChartAngle),
}

impl ChartPoint {
    pub fn label(&self) -> &'static str {
        match self {
            ChartPoint::Body(body) => body.label(),
            ChartPoint::Angle(angle) => angle.label(),
        }
    }

    pub fn body(&self) -> Option<CelestialBody> {
        match self {
            ChartPoint::Body(body) => Some(*body),
            ChartPoint::Angle(_) => None,
        }
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Natal,
    Transit,
}

/// A labelled point: the same body in two layers is two distinct points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointRef {
    pub layer: Layer,
    pub point: ChartPoint,
}

impl PointRef {
    pub fn natal(point: ChartPoint) -> Self {
        Self { layer: Layer::Natal, point }
    }

    pub fn transit(point: ChartPoint) -> Self {
        Self { layer: Layer::Transit, point }
    }
}

/// Input to the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectPoint {
    pub reference: PointRef,
    pub longitude: f64,
    /// Daily motion, when known
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectMotion {
    Applying,
    Separating,
}

/// A detected aspect between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRecord {
    pub from: PointRef,
    pub to: PointRef,
    pub kind: AspectKind,
    /// Exact angle for the kind (0, 60, 90, ...)
    pub exact_angle: f64,
    /// Measured separation, 0..=180
    pub actual_angle: f64,
    /// |actual - exact|
    pub orb: f64,
    /// Orb allowed for the kind by the table used
    pub allowed_orb: f64,
    /// 1 - orb / allowed_orb, in (0, 1]
    pub strength: f64,
    /// strength > 0.7, set for transit aspects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_strong: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion: Option<AspectMotion>,
}

impl AspectRecord {
    pub fn nature(&self) -> AspectNature {
        self.kind.nature()
    }

    /// "Sun trine Moon"
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.from.point, self.kind, self.to.point)
    }
}
