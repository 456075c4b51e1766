//! Plain-text rendering for the terminal.

use std::fmt::{self, Write};

use urania::biorhythm::{BiorhythmProfile, ForecastDay};
use urania::chart::{NatalChart, TransitReport};
use urania::houses::HouseStatus;
use urania::numerology::NumerologyMatrix;
use urania::report::{DailyReport, ForecastSummary};

fn title(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn degrees(position_in_sign: f64) -> String {
    let whole = position_in_sign.floor();
    let minutes = ((position_in_sign - whole) * 60.0).floor();
    format!("{:>2}°{:02}'", whole as u32, minutes as u32)
}

pub fn natal_chart(out: &mut impl Write, chart: &NatalChart) -> fmt::Result {
    let profile = &chart.profile;
    let offset = match profile.utc_offset_minutes() {
        Ok(minutes) => format!(", UTC{minutes:+}m"),
        Err(_) => String::new(),
    };
    writeln!(
        out,
        "Natal chart: {} {} ({}{}) at {:.4}, {:.4}{}",
        profile.birth_date,
        profile.birth_time.format("%H:%M"),
        profile.timezone,
        offset,
        profile.location.latitude,
        profile.location.longitude,
        profile
            .place_name
            .as_deref()
            .map(|p| format!(" ({p})"))
            .unwrap_or_default()
    )?;

    writeln!(out, "\nPlanets:")?;
    for pos in chart.positions.values() {
        writeln!(
            out,
            "  {:<11} {} {:<12} house {:>2}{}",
            pos.body.label(),
            degrees(pos.position_in_sign),
            title(pos.sign.name()),
            chart.house_of(pos.body).unwrap_or(1),
            if pos.retrograde { "  R" } else { "" }
        )?;
    }
    for skipped in &chart.skipped {
        writeln!(out, "  {:<11} unavailable: {}", skipped.body.label(), skipped.reason)?;
    }

    writeln!(out, "\nHouses ({}):", chart.houses.system)?;
    if let HouseStatus::Degraded { reason } = &chart.houses.status {
        writeln!(out, "  default layout in use: {reason}")?;
    }
    for cusp in &chart.houses.cusps {
        writeln!(
            out,
            "  {:>2}: {} {}",
            cusp.house,
            degrees(cusp.position_in_sign),
            title(cusp.sign.name())
        )?;
    }

    writeln!(out, "\nAspects:")?;
    for aspect in &chart.aspects {
        writeln!(
            out,
            "  {:<36} orb {:.2}°  strength {:.2}",
            aspect.describe(),
            aspect.orb,
            aspect.strength
        )?;
    }

    writeln!(out, "\nElements:")?;
    for (element, count) in &chart.features.element_balance {
        writeln!(out, "  {:<6} {}", title(element.name()), count)?;
    }
    Ok(())
}

pub fn transit_report(out: &mut impl Write, report: &TransitReport) -> fmt::Result {
    writeln!(out, "Transits for {}", report.target_date)?;
    if report.calculation_error {
        return writeln!(
            out,
            "  calculation failed: {}",
            report.error_message.as_deref().unwrap_or("unknown error")
        );
    }
    writeln!(
        out,
        "  {} aspects, {} strong",
        report.aspects_count, report.strong_aspects_count
    )?;
    for aspect in &report.aspects {
        let motion = match aspect.motion {
            Some(m) => format!(" {m:?}").to_lowercase(),
            None => String::new(),
        };
        writeln!(
            out,
            "  {}{:<36} strength {:.2}{}",
            if aspect.is_strong == Some(true) { "*" } else { " " },
            aspect.describe(),
            aspect.strength,
            motion
        )?;
    }
    if !report.retrograde_bodies.is_empty() {
        let names: Vec<&str> = report.retrograde_bodies.iter().map(|b| b.label()).collect();
        writeln!(out, "  Retrograde: {}", names.join(", "))?;
    }
    Ok(())
}

pub fn biorhythm(out: &mut impl Write, profile: &BiorhythmProfile) -> fmt::Result {
    writeln!(
        out,
        "Biorhythms for {} (day {} of life)",
        profile.calculation_date, profile.days_lived
    )?;
    for state in profile.cycles.iter() {
        writeln!(
            out,
            "  {:<12} {:>5.1}%  {:<8} {:<7} day {}/{}",
            title(state.cycle.name()),
            state.percentage,
            state.phase.name(),
            state.trend.name(),
            state.day_in_cycle,
            state.cycle.period()
        )?;
    }
    writeln!(
        out,
        "  Overall      {:>5.1}%  {} energy, {}",
        profile.overall.percentage,
        profile.overall.level.name(),
        profile.overall.trend.name()
    )?;
    if profile.is_critical_day() {
        writeln!(out, "  Critical day")?;
    }
    Ok(())
}

pub fn biorhythm_forecast(out: &mut impl Write, days: &[ForecastDay]) -> fmt::Result {
    writeln!(out, "Date        Overall  Phys  Emot  Intl  Intu")?;
    for day in days {
        writeln!(
            out,
            "{}  {:>5.1}%  {:>4.0}  {:>4.0}  {:>4.0}  {:>4.0}{}{}",
            day.date,
            day.overall_percentage,
            day.physical,
            day.emotional,
            day.intellectual,
            day.intuitive,
            if day.critical { "  critical" } else { "" },
            if day.peak { "  peak" } else { "" }
        )?;
    }
    Ok(())
}

pub fn numerology(out: &mut impl Write, matrix: &NumerologyMatrix) -> fmt::Result {
    writeln!(out, "Numerology matrix for {}", matrix.birth_date)?;
    writeln!(
        out,
        "  Working numbers: {}, {}, {}, {}",
        matrix.first, matrix.second, matrix.third, matrix.fourth
    )?;
    for row in matrix.grid() {
        writeln!(out, "  {:<8}{:<8}{:<8}", row[0], row[1], row[2])?;
    }
    Ok(())
}

pub fn daily_report(out: &mut impl Write, report: &DailyReport) -> fmt::Result {
    writeln!(out, "Forecast for {} ({})", report.target_date, report.lunar_phase)?;
    if report.calculation_error {
        writeln!(
            out,
            "  Transits unavailable: {}",
            report.error_message.as_deref().unwrap_or("unknown error")
        )?;
    }
    writeln!(out, "\n{}", report.energy_analysis)?;

    writeln!(out, "\nRecommendations:")?;
    for rec in &report.recommendations {
        writeln!(out, "  [{:?}] {}", rec.priority, rec.text)?;
    }
    writeln!(out, "\nSchedule:")?;
    for entry in &report.schedule {
        writeln!(out, "  {}", entry.text)?;
    }
    if !report.critical_notes.is_empty() {
        writeln!(out, "\nAttention:")?;
        for note in &report.critical_notes {
            writeln!(out, "  {note}")?;
        }
    }
    Ok(())
}

pub fn summary(out: &mut impl Write, summary: &ForecastSummary) -> fmt::Result {
    writeln!(
        out,
        "{}: energy {:.1}% ({}), {} aspects ({} strong), {}",
        summary.target_date,
        summary.energy_percentage,
        summary.energy_level.name(),
        summary.aspects_count,
        summary.strong_aspects_count,
        summary.lunar_phase
    )?;
    for aspect in &summary.top_aspects {
        writeln!(
            out,
            "  {} {} {} ({:.2})",
            aspect.transit, aspect.kind, aspect.natal, aspect.strength
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use urania::biorhythm::BiorhythmCalculator;

    /// Accepts a fixed number of bytes, then fails
    struct Limited {
        left: usize,
    }

    impl Write for Limited {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if s.len() > self.left {
                return Err(fmt::Error);
            }
            self.left -= s.len();
            Ok(())
        }
    }

    #[test]
    fn test_degrees_format() {
        assert_eq!(degrees(12.5), "12°30'");
        assert_eq!(degrees(0.0), " 0°00'");
    }

    #[test]
    fn test_title() {
        assert_eq!(title("taurus"), "Taurus");
        assert_eq!(title(""), "");
    }

    #[test]
    fn test_numerology_text() {
        let matrix = NumerologyMatrix::calculate(NaiveDate::from_ymd_opt(1990, 5, 15).unwrap());
        let mut out = String::new();
        numerology(&mut out, &matrix).unwrap();
        assert!(out.starts_with("Numerology matrix for 1990-05-15"));
        assert!(out.contains("Working numbers: 30, 3, 28, 10"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn test_write_errors_propagate() {
        let days = BiorhythmCalculator::new()
            .forecast(
                NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                3,
            )
            .unwrap();

        let mut full = String::new();
        biorhythm_forecast(&mut full, &days).unwrap();
        assert_eq!(full.lines().count(), 4);

        let mut short = Limited { left: 60 };
        assert!(biorhythm_forecast(&mut short, &days).is_err());
    }
}
