use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::aspects::{AspectKind, AspectNature, AspectRecord};
use crate::biorhythm::{BiorhythmProfile, Cycle};
use crate::chart::{ChartFeatures, TransitReport, STRONG_ASPECT_THRESHOLD};
use crate::lunar::{lunar_phase, LunarPhase};
use crate::report::advice::{biorhythm_advice, transit_advice};

pub const MAX_RECOMMENDATIONS: usize = 8;
pub const MAX_CRITICAL_NOTES: usize = 4;
/// Aspects carried into the report as "significant"
pub const SIGNIFICANT_ASPECTS: usize = 5;
const TENSE_ASPECT_NOTES: usize = 2;
const WARNING_NOTES: usize = 2;

lazy_static! {
    static ref HIGH_PRIORITY: Regex = Regex::new(
        r"(?i)\b(cauti|careful|avoid|danger|critical|don't risk|do not risk|take care|retrograde)"
    )
    .expect("Invalid high priority regex");
    static ref MEDIUM_PRIORITY: Regex =
        Regex::new(r"(?i)\b(ideal|excellent|favou?rabl|use\b|high|peak)")
            .expect("Invalid medium priority regex");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Bucket a free-text line by its markers
    pub fn classify(text: &str) -> Self {
        if HIGH_PRIORITY.is_match(text) {
            Priority::High
        } else if MEDIUM_PRIORITY.is_match(text) {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySlot {
    Morning,
    Day,
    Evening,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub slot: DaySlot,
    /// Cycle driving this slot
    pub cycle: Cycle,
    pub value: f64,
    pub text: String,
}

/// The merged report for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyReport {
    pub target_date: NaiveDate,
    /// High, then medium, then low priority; at most 8
    pub recommendations: Vec<Recommendation>,
    /// Morning, day, evening
    pub schedule: Vec<ScheduleEntry>,
    /// At most 4
    pub critical_notes: Vec<String>,
    pub energy_analysis: String,
    /// Strongest transit aspects
    pub significant_aspects: Vec<AspectRecord>,
    pub lunar_phase: LunarPhase,
    pub calculation_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Merges transit and biorhythm results into a daily report
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationCombiner;

impl RecommendationCombiner {
    pub fn new() -> Self {
        Self
    }

    pub fn combine(
        &self,
        transits: &TransitReport,
        biorhythm: &BiorhythmProfile,
        natal_features: Option<&ChartFeatures>,
    ) -> DailyReport {
        let astro = transit_advice(transits, natal_features);
        let lines: Vec<String> = astro
            .recommendations
            .iter()
            .cloned()
            .chain(biorhythm_advice(biorhythm))
            .collect();
        let significant = transits.top_aspects(SIGNIFICANT_ASPECTS);

        DailyReport {
            target_date: transits.target_date,
            recommendations: self.prioritize(lines),
            schedule: self.schedule(biorhythm),
            critical_notes: self.critical_notes(significant, biorhythm, &astro.warnings),
            energy_analysis: self.energy_analysis(significant, biorhythm),
            significant_aspects: significant.to_vec(),
            lunar_phase: lunar_phase(transits.target_date),
            calculation_error: transits.calculation_error,
            error_message: transits.error_message.clone(),
        }
    }

    /// Stable bucketing by priority, truncated to 8
    pub fn prioritize(&self, lines: Vec<String>) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = lines
            .into_iter()
            .map(|text| Recommendation {
                priority: Priority::classify(&text),
                text,
            })
            .collect();
        recommendations.sort_by_key(|r| r.priority);
        recommendations.truncate(MAX_RECOMMENDATIONS);
        recommendations
    }

    pub fn schedule(&self, biorhythm: &BiorhythmProfile) -> Vec<ScheduleEntry> {
        let intellectual = biorhythm.cycles.intellectual.value;
        let morning = if intellectual > 0.3 {
            "planning and analysis"
        } else {
            "light warm-up and routine tasks"
        };

        let physical = biorhythm.cycles.physical.value;
        let day = if physical > 0.5 {
            "active work and movement"
        } else if physical > 0.0 {
            "moderate activity"
        } else {
            "calm activities"
        };

        let emotional = biorhythm.cycles.emotional.value;
        let evening = if emotional > 0.4 {
            "socializing and creative work"
        } else {
            "rest and time alone"
        };

        vec![
            slot(DaySlot::Morning, Cycle::Intellectual, intellectual, "Morning", morning),
            slot(DaySlot::Day, Cycle::Physical, physical, "Day", day),
            slot(DaySlot::Evening, Cycle::Emotional, emotional, "Evening", evening),
        ]
    }

    pub fn critical_notes(
        &self,
        significant: &[AspectRecord],
        biorhythm: &BiorhythmProfile,
        warnings: &[String],
    ) -> Vec<String> {
        let mut notes = Vec::new();

        if biorhythm.is_critical_day() {
            let cycles: Vec<&str> = biorhythm
                .critical_flags
                .iter()
                .map(|f| f.cycle.name())
                .collect();
            notes.push(format!("Critical biorhythm day: {}", cycles.join(", ")));
        }

        for aspect in significant
            .iter()
            .filter(|a| a.nature() == AspectNature::Challenging)
            .filter(|a| a.strength > STRONG_ASPECT_THRESHOLD)
            .take(TENSE_ASPECT_NOTES)
        {
            let title = if aspect.kind == AspectKind::Square {
                "Tense aspect"
            } else {
                "Difficult choice"
            };
            notes.push(format!(
                "{}: {} - {} (strength: {:.2})",
                title,
                aspect.from.point.label(),
                aspect.to.point.label(),
                aspect.strength
            ));
        }

        notes.extend(warnings.iter().take(WARNING_NOTES).cloned());
        notes.truncate(MAX_CRITICAL_NOTES);
        notes
    }

    pub fn energy_analysis(&self, significant: &[AspectRecord], biorhythm: &BiorhythmProfile) -> String {
        let strong = significant
            .iter()
            .filter(|a| a.strength > STRONG_ASPECT_THRESHOLD);
        let challenging = strong
            .clone()
            .filter(|a| a.nature() == AspectNature::Challenging)
            .count();
        let harmonious = strong
            .filter(|a| a.nature() == AspectNature::Harmonious)
            .count();
        let percentage = biorhythm.overall.percentage;

        let mut parts = vec![format!(
            "Energy level: {} ({:.1}%)",
            biorhythm.overall.level.name(),
            percentage
        )];
        if challenging > 0 {
            parts.push(format!("Challenging aspects: {challenging}"));
        }
        if harmonious > 0 {
            parts.push(format!("Harmonious aspects: {harmonious}"));
        }

        let conclusion = if percentage > 70.0 && challenging == 0 {
            "Ideal day for active pursuits"
        } else if percentage < 30.0 && challenging > 2 {
            "Stay calm and avoid overexertion"
        } else if harmonious > challenging {
            "Harmonious influences prevail"
        } else {
            "Balanced energy profile"
        };
        parts.push(conclusion.to_string());
        parts.join(" | ")
    }
}

fn slot(slot: DaySlot, cycle: Cycle, value: f64, label: &str, activity: &str) -> ScheduleEntry {
    ScheduleEntry {
        slot,
        cycle,
        value,
        text: format!("{label}: {activity} ({} cycle: {:.2})", cycle.name(), value),
    }
}
