use chrono::{Duration, NaiveDate};
use urania::biorhythm::{BiorhythmCalculator, Cycle, EnergyLevel, PhaseLabel, TrendLabel};
use urania::ForecastError;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_physical_cycle_restarts_after_23_days() {
    let calc = BiorhythmCalculator::new();
    let profile = calc.calculate(date(1990, 5, 15), date(1990, 6, 7)).unwrap();
    let physical = profile.cycles.physical;

    assert_eq!(profile.days_lived, 23);
    assert_eq!(physical.day_in_cycle, 0);
    assert!(physical.value.abs() < 1e-12);
    assert_eq!(physical.percentage, 50.0);
    assert_eq!(physical.trend, TrendLabel::Rising);
}

#[test]
fn test_day_before_restart_is_negative_and_rising() {
    let calc = BiorhythmCalculator::new();
    let profile = calc.calculate(date(1990, 5, 15), date(1990, 6, 6)).unwrap();
    let physical = profile.cycles.physical;
    assert_eq!(physical.day_in_cycle, 22);
    assert!(physical.value < 0.0);
    assert_eq!(physical.trend, TrendLabel::Rising);
}

#[test]
fn test_trend_turns_near_quarter_cycle() {
    let calc = BiorhythmCalculator::new();
    let birth = date(2000, 1, 1);
    let trend = |offset: i64| {
        calc.calculate(birth, birth + Duration::days(offset))
            .unwrap()
            .cycles
            .physical
            .trend
    };
    assert_eq!(trend(5), TrendLabel::Rising);
    assert_eq!(trend(6), TrendLabel::Stable);
    assert_eq!(trend(7), TrendLabel::Falling);
}

#[test]
fn test_cycles_are_periodic() {
    let calc = BiorhythmCalculator::new();
    let birth = date(1984, 2, 29);
    let base = calc.calculate(birth, date(2010, 8, 17)).unwrap();
    for cycle in Cycle::ALL {
        let later = calc
            .calculate(birth, date(2010, 8, 17) + Duration::days(i64::from(cycle.period()) * 7))
            .unwrap();
        assert_eq!(later.cycles.get(cycle).value, base.cycles.get(cycle).value);
        assert_eq!(later.cycles.get(cycle).day_in_cycle, base.cycles.get(cycle).day_in_cycle);
    }
}

#[test]
fn test_day_in_cycle_matches_modulo() {
    let calc = BiorhythmCalculator::new();
    let birth = date(1971, 11, 3);
    for offset in [0_i64, 1, 22, 23, 100, 9999, 20_000] {
        let profile = calc.calculate(birth, birth + Duration::days(offset)).unwrap();
        for state in profile.cycles.iter() {
            assert_eq!(
                i64::from(state.day_in_cycle),
                offset % i64::from(state.cycle.period())
            );
            assert!((-1.0..=1.0).contains(&state.value));
            assert!((0.0..=100.0).contains(&state.percentage));
        }
    }
}

#[test]
fn test_target_before_birth_is_rejected() {
    let calc = BiorhythmCalculator::new();
    let result = calc.calculate(date(1990, 5, 15), date(1990, 5, 14));
    assert!(matches!(result, Err(ForecastError::TargetBeforeBirth { .. })));
}

#[test]
fn test_birth_day_is_all_zero() {
    let calc = BiorhythmCalculator::new();
    let profile = calc.calculate(date(1990, 5, 15), date(1990, 5, 15)).unwrap();
    assert_eq!(profile.days_lived, 0);
    for state in profile.cycles.iter() {
        assert_eq!(state.value, 0.0);
        assert_eq!(state.phase, PhaseLabel::Neutral);
    }
    assert_eq!(profile.overall.level, EnergyLevel::Medium);
    assert!(!profile.is_critical_day());
}

#[test]
fn test_overall_is_weighted_sum() {
    let calc = BiorhythmCalculator::new();
    let profile = calc.calculate(date(1965, 7, 1), date(2023, 3, 12)).unwrap();
    let expected = 0.30 * profile.cycles.physical.value
        + 0.25 * profile.cycles.emotional.value
        + 0.25 * profile.cycles.intellectual.value
        + 0.20 * profile.cycles.intuitive.value;
    assert!((profile.overall.value - expected).abs() < 1e-12);
    assert_eq!(
        profile.overall.level,
        EnergyLevel::from_percentage(profile.overall.percentage)
    );
}

#[test]
fn test_forecast_matches_single_day_calculation() {
    let calc = BiorhythmCalculator::new();
    let birth = date(1992, 10, 20);
    let start = date(2024, 12, 28);
    let forecast = calc.forecast(birth, start, 7).unwrap();
    assert_eq!(forecast.len(), 7);
    for (i, day) in forecast.iter().enumerate() {
        let single = calc.calculate(birth, start + Duration::days(i as i64)).unwrap();
        assert_eq!(day.date, single.calculation_date);
        assert_eq!(day.overall_percentage, single.overall.percentage);
        assert_eq!(day.physical, single.cycles.physical.percentage);
        assert_eq!(day.critical, single.is_critical_day());
    }
}
