use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aspects::{AspectKind, ChartPoint};
use crate::biorhythm::{BiorhythmProfile, Cycle, EnergyLevel, PhaseLabel, TrendLabel};
use crate::chart::TransitReport;
use crate::ephemeris::CelestialBody;
use crate::lunar::LunarPhase;
use crate::report::combiner::DailyReport;

/// Aspects listed in the summary
pub const SUMMARY_TOP_ASPECTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleSummary {
    pub cycle: Cycle,
    pub percentage: f64,
    pub phase: PhaseLabel,
    pub trend: TrendLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectSummary {
    pub transit: ChartPoint,
    pub natal: ChartPoint,
    pub kind: AspectKind,
    pub strength: f64,
}

/// Stable, serialisable digest of a day for downstream text generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub target_date: NaiveDate,
    pub energy_percentage: f64,
    pub energy_level: EnergyLevel,
    pub cycles: Vec<CycleSummary>,
    pub aspects_count: usize,
    pub strong_aspects_count: usize,
    pub top_aspects: Vec<AspectSummary>,
    pub retrograde_bodies: Vec<CelestialBody>,
    pub lunar_phase: LunarPhase,
    pub critical_cycles: Vec<Cycle>,
    pub peak_cycles: Vec<Cycle>,
    pub recommendations: Vec<String>,
    pub calculation_error: bool,
}

impl ForecastSummary {
    pub fn build(report: &DailyReport, transits: &TransitReport, biorhythm: &BiorhythmProfile) -> Self {
        Self {
            target_date: report.target_date,
            energy_percentage: biorhythm.overall.percentage,
            energy_level: biorhythm.overall.level,
            cycles: biorhythm
                .cycles
                .iter()
                .map(|s| CycleSummary {
                    cycle: s.cycle,
                    percentage: s.percentage,
                    phase: s.phase,
                    trend: s.trend,
                })
                .collect(),
            aspects_count: transits.aspects_count,
            strong_aspects_count: transits.strong_aspects_count,
            top_aspects: transits
                .top_aspects(SUMMARY_TOP_ASPECTS)
                .iter()
                .map(|a| AspectSummary {
                    transit: a.from.point,
                    natal: a.to.point,
                    kind: a.kind,
                    strength: a.strength,
                })
                .collect(),
            retrograde_bodies: transits.retrograde_bodies.clone(),
            lunar_phase: report.lunar_phase,
            critical_cycles: biorhythm.critical_flags.iter().map(|f| f.cycle).collect(),
            peak_cycles: biorhythm.peak_flags.iter().map(|f| f.cycle).collect(),
            recommendations: report.recommendations.iter().map(|r| r.text.clone()).collect(),
            calculation_error: report.calculation_error,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
