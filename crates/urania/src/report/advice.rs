//! Advice lines derived from transit aspects and biorhythm phases.

use serde::{Deserialize, Serialize};

use crate::aspects::{AspectKind, AspectNature, AspectRecord};
use crate::biorhythm::{BiorhythmProfile, Cycle, EnergyLevel, PhaseLabel};
use crate::chart::{ChartFeatures, TransitReport};
use crate::ephemeris::CelestialBody;
use crate::zodiac::Element;

/// Strength an aspect needs to produce advice
pub const ADVICE_STRENGTH: f64 = 0.6;
/// Aspects considered for advice
const ADVICE_ASPECTS: usize = 3;
const MAX_RECOMMENDATIONS: usize = 4;
const MAX_WARNINGS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Recommendations and warnings from a transit report
pub fn transit_advice(report: &TransitReport, features: Option<&ChartFeatures>) -> Advice {
    if report.calculation_error {
        let reason = report.error_message.as_deref().unwrap_or("unknown error");
        return Advice {
            recommendations: vec![format!(
                "Calculation error: {reason}. Please contact the administrator"
            )],
            warnings: vec!["Temporary technical difficulties while calculating aspects".to_string()],
        };
    }

    let mut advice = Advice::default();
    for aspect in report
        .aspects
        .iter()
        .filter(|a| a.strength > ADVICE_STRENGTH)
        .take(ADVICE_ASPECTS)
    {
        let natal_body = aspect.to.point.body();
        let headline = format!(
            "{} {} in the area of {}",
            aspect.from.point.label(),
            aspect_meaning(aspect.kind, aspect.strength),
            influence_area(natal_body)
        );
        match aspect.nature() {
            AspectNature::Harmonious => advice.recommendations.push(format!(
                "{headline}. {} (aspect strength: {:.2})",
                harmonious_action(aspect.kind, natal_body),
                aspect.strength
            )),
            AspectNature::Challenging => advice.warnings.push(format!(
                "{headline}. {} (aspect strength: {:.2})",
                caution(natal_body),
                aspect.strength
            )),
            AspectNature::Minor => advice
                .recommendations
                .push(format!("{headline} (aspect strength: {:.2})", aspect.strength)),
        }
    }

    if !report.retrograde_bodies.is_empty() {
        let names: Vec<&str> = report.retrograde_bodies.iter().map(|b| b.label()).collect();
        advice.warnings.push(format!(
            "Retrograde {}: a time for review and analysis",
            names.join(", ")
        ));
    }

    if advice.recommendations.is_empty() && advice.warnings.is_empty() {
        advice.recommendations.push(quiet_day_note(&report.aspects));
    }

    advice.recommendations.truncate(MAX_RECOMMENDATIONS);
    advice.warnings.truncate(MAX_WARNINGS);

    if advice.recommendations.len() < MAX_RECOMMENDATIONS {
        if let Some(line) = features.and_then(element_recommendation) {
            advice.recommendations.push(line);
        }
    }
    advice
}

/// Recommendation for the chart's dominant element
pub fn element_recommendation(features: &ChartFeatures) -> Option<String> {
    let element = features.dominant_element()?;
    let count = features.element_balance.get(&element).copied().unwrap_or(0);
    let focus = match element {
        Element::Fire => "use your energy and initiative for new beginnings",
        Element::Earth => "focus on practical tasks and stability",
        Element::Air => "develop communication, learning and intellectual work",
        Element::Water => "trust your intuition and emotional sensitivity",
    };
    let name = match element {
        Element::Fire => "Fire",
        Element::Earth => "Earth",
        Element::Air => "Air",
        Element::Water => "Water",
    };
    Some(format!("{name} dominates ({count} bodies): {focus}"))
}

/// Recommendation lines from the cycles at their peak or critical phase
pub fn biorhythm_advice(profile: &BiorhythmProfile) -> Vec<String> {
    let mut lines = Vec::new();
    for state in profile.cycles.iter() {
        match state.phase {
            PhaseLabel::Peak => lines.push(format!(
                "Peak of the {} cycle ({:.0}%): use it for {}",
                state.cycle,
                state.percentage,
                cycle_focus(state.cycle)
            )),
            PhaseLabel::Critical => lines.push(format!(
                "Critical phase of the {} cycle ({:.0}%): avoid overload in {}",
                state.cycle,
                state.percentage,
                cycle_focus(state.cycle)
            )),
            _ => {}
        }
    }

    match profile.overall.level {
        EnergyLevel::High => lines.push(format!(
            "High overall energy ({:.1}%): a favorable day for demanding tasks",
            profile.overall.percentage
        )),
        EnergyLevel::Low => lines.push(format!(
            "Low overall energy ({:.1}%): be careful not to overexert yourself",
            profile.overall.percentage
        )),
        EnergyLevel::Medium => {}
    }
    lines
}

fn quiet_day_note(aspects: &[AspectRecord]) -> String {
    if aspects.is_empty() {
        return "Minimal astrological activity today: a good day for routine tasks and planning"
            .to_string();
    }
    let mean = aspects.iter().map(|a| a.strength).sum::<f64>() / aspects.len() as f64;
    format!(
        "{} aspects with mean strength {:.2}: watch for changes in the related areas",
        aspects.len(),
        mean
    )
}

fn cycle_focus(cycle: Cycle) -> &'static str {
    match cycle {
        Cycle::Physical => "sport and physical work",
        Cycle::Emotional => "relationships and creative work",
        Cycle::Intellectual => "study, analysis and planning",
        Cycle::Intuitive => "decisions that rely on intuition",
    }
}

fn influence_area(body: Option<CelestialBody>) -> &'static str {
    match body {
        Some(CelestialBody::Sun) => "personal energy, creativity and self-expression",
        Some(CelestialBody::Moon) => "emotions, intuition and home",
        Some(CelestialBody::Mercury) => "communication, learning and paperwork",
        Some(CelestialBody::Venus) => "relationships, finances and art",
        Some(CelestialBody::Mars) => "action, initiative and sport",
        Some(CelestialBody::Jupiter) => "growth, opportunities and travel",
        Some(CelestialBody::Saturn) => "responsibility, career and long-term plans",
        Some(CelestialBody::Uranus) => "change, innovation and the unexpected",
        Some(CelestialBody::Neptune) => "intuition, imagination and spirituality",
        Some(CelestialBody::Pluto) => "transformation and deep change",
        Some(CelestialBody::NorthNode) | None => "personal development",
    }
}

fn aspect_meaning(kind: AspectKind, strength: f64) -> &'static str {
    let strong = strength > 0.7;
    match (kind, strong) {
        (AspectKind::Conjunction, true) => "forms a powerful conjunction, a time for beginnings,",
        (AspectKind::Conjunction, false) => "forms a conjunction bringing new opportunities",
        (AspectKind::Opposition, true) => "forms a strong opposition calling for important decisions",
        (AspectKind::Opposition, false) => "forms an opposition that asks for balance",
        (AspectKind::Square, true) => "forms a tense square, obstacles to overcome,",
        (AspectKind::Square, false) => "forms a square that challenges you to grow",
        (AspectKind::Trine, true) => "forms a harmonious trine, a favorable time,",
        (AspectKind::Trine, false) => "forms a trine bringing support and luck",
        (AspectKind::Sextile, true) => "forms a favorable sextile with good opportunities",
        (AspectKind::Sextile, false) => "forms a sextile with chances to develop",
        _ => "has a subtle influence on your energy",
    }
}

fn harmonious_action(kind: AspectKind, body: Option<CelestialBody>) -> &'static str {
    let Some(body) = body else {
        return "Use this energy for growth";
    };
    if kind == AspectKind::Conjunction {
        match body {
            CelestialBody::Sun => "Start new projects and take the initiative",
            CelestialBody::Moon => "Trust your intuition and spend time at home",
            CelestialBody::Mercury => "Talk, learn and sign documents",
            CelestialBody::Venus => "Strengthen relationships and do creative work",
            CelestialBody::Mars => "Act decisively and do sport",
            CelestialBody::Jupiter => "Broaden your horizons and travel",
            CelestialBody::Saturn => "Make long-term plans and take responsibility",
            CelestialBody::Uranus => "Experiment and stay open to the new",
            CelestialBody::Neptune => "Develop your intuition and creativity",
            CelestialBody::Pluto => "Transform old habits",
            CelestialBody::NorthNode => "Use this energy for growth",
        }
    } else {
        match body {
            CelestialBody::Sun => "Use your energy for creative work",
            CelestialBody::Moon => "Rely on your inner sense",
            CelestialBody::Mercury => "Communicate and negotiate effectively",
            CelestialBody::Venus => "Harmonize relationships and finances",
            CelestialBody::Mars => "Carry out plans with enthusiasm",
            CelestialBody::Jupiter => "Use the widening opportunities",
            CelestialBody::Saturn => "Build a solid foundation",
            CelestialBody::Uranus => "Bring in innovative ideas",
            CelestialBody::Neptune => "Develop spiritual practices",
            CelestialBody::Pluto => "Allow deep transformation",
            CelestialBody::NorthNode => "Use this energy for growth",
        }
    }
}

fn caution(body: Option<CelestialBody>) -> &'static str {
    match body {
        Some(CelestialBody::Sun) => "Avoid conflicts and be diplomatic",
        Some(CelestialBody::Moon) => "Keep emotions in check and avoid impulsive moves",
        Some(CelestialBody::Mercury) => "Double-check information and avoid arguments",
        Some(CelestialBody::Venus) => "Be careful with relationships and money",
        Some(CelestialBody::Mars) => "Avoid risks and act deliberately",
        Some(CelestialBody::Jupiter) => "Take care not to overestimate your options",
        Some(CelestialBody::Saturn) => "Do not dodge responsibility, but avoid overload",
        Some(CelestialBody::Uranus) => "Be ready for surprises",
        Some(CelestialBody::Neptune) => "Tell illusion from reality",
        Some(CelestialBody::Pluto) => "Avoid manipulation and pressure",
        Some(CelestialBody::NorthNode) | None => "Be attentive and careful",
    }
}
