use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::biorhythm::cycle::{
    to_percentage, Cycle, CycleState, EnergyLevel, PhaseLabel, TrendLabel,
};
use crate::error::{ForecastError, Result};

/// |value| above which a cycle marks a critical day
pub const CRITICAL_THRESHOLD: f64 = 0.9;
/// value above which a cycle marks a peak day
pub const PEAK_THRESHOLD: f64 = 0.8;

/// The four cycle states of one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleSet {
    pub physical: CycleState,
    pub emotional: CycleState,
    pub intellectual: CycleState,
    pub intuitive: CycleState,
}

impl CycleSet {
    pub fn compute(days_lived: i64) -> Self {
        Self {
            physical: CycleState::compute(Cycle::Physical, days_lived),
            emotional: CycleState::compute(Cycle::Emotional, days_lived),
            intellectual: CycleState::compute(Cycle::Intellectual, days_lived),
            intuitive: CycleState::compute(Cycle::Intuitive, days_lived),
        }
    }

    pub fn get(&self, cycle: Cycle) -> &CycleState {
        match cycle {
            Cycle::Physical => &self.physical,
            Cycle::Emotional => &self.emotional,
            Cycle::Intellectual => &self.intellectual,
            Cycle::Intuitive => &self.intuitive,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CycleState> {
        [&self.physical, &self.emotional, &self.intellectual, &self.intuitive].into_iter()
    }
}

/// Weighted combination of the four cycles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallEnergy {
    pub value: f64,
    pub percentage: f64,
    pub phase: PhaseLabel,
    pub trend: TrendLabel,
    pub level: EnergyLevel,
}

impl OverallEnergy {
    pub fn compute(cycles: &CycleSet, days_lived: i64) -> Self {
        let value: f64 = cycles.iter().map(|s| s.cycle.weight() * s.value).sum();
        let slope: f64 = cycles
            .iter()
            .map(|s| s.cycle.weight() * s.cycle.phase_angle(days_lived).cos())
            .sum();
        let percentage = to_percentage(value);
        Self {
            value,
            percentage,
            phase: PhaseLabel::from_value(value),
            trend: TrendLabel::from_slope(slope),
            level: EnergyLevel::from_percentage(percentage),
        }
    }
}

/// A cycle that crossed the critical or peak threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleFlag {
    pub cycle: Cycle,
    pub value: f64,
}

/// Biorhythm state for one (birth date, target date) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiorhythmProfile {
    pub birth_date: NaiveDate,
    pub calculation_date: NaiveDate,
    pub days_lived: i64,
    pub cycles: CycleSet,
    pub overall: OverallEnergy,
    /// Cycles with |value| > 0.9
    pub critical_flags: Vec<CycleFlag>,
    /// Cycles with value > 0.8
    pub peak_flags: Vec<CycleFlag>,
}

impl BiorhythmProfile {
    pub fn is_critical_day(&self) -> bool {
        !self.critical_flags.is_empty()
    }

    pub fn is_peak_day(&self) -> bool {
        !self.peak_flags.is_empty()
    }
}

/// Compact per-day entry of a multi-day forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub days_lived: i64,
    pub overall_percentage: f64,
    pub energy_level: EnergyLevel,
    pub physical: f64,
    pub emotional: f64,
    pub intellectual: f64,
    pub intuitive: f64,
    pub critical: bool,
    pub peak: bool,
}

impl From<&BiorhythmProfile> for ForecastDay {
    fn from(profile: &BiorhythmProfile) -> Self {
        Self {
            date: profile.calculation_date,
            days_lived: profile.days_lived,
            overall_percentage: profile.overall.percentage,
            energy_level: profile.overall.level,
            physical: profile.cycles.physical.percentage,
            emotional: profile.cycles.emotional.percentage,
            intellectual: profile.cycles.intellectual.percentage,
            intuitive: profile.cycles.intuitive.percentage,
            critical: profile.is_critical_day(),
            peak: profile.is_peak_day(),
        }
    }
}

/// Stateless biorhythm calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct BiorhythmCalculator;

impl BiorhythmCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Days from birth to target; rejects a target before birth
    pub fn days_lived(&self, birth_date: NaiveDate, target_date: NaiveDate) -> Result<i64> {
        let days = (target_date - birth_date).num_days();
        if days < 0 {
            return Err(ForecastError::TargetBeforeBirth {
                birth: birth_date,
                target: target_date,
            });
        }
        Ok(days)
    }

    pub fn calculate(
        &self,
        birth_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Result<BiorhythmProfile> {
        let days_lived = self.days_lived(birth_date, target_date)?;
        let profile = self.at_days_lived(birth_date, target_date, days_lived);
        log::debug!(
            "Biorhythm for {}: day {}, energy {:.1}%",
            target_date,
            days_lived,
            profile.overall.percentage
        );
        Ok(profile)
    }

    fn at_days_lived(
        &self,
        birth_date: NaiveDate,
        calculation_date: NaiveDate,
        days_lived: i64,
    ) -> BiorhythmProfile {
        let cycles = CycleSet::compute(days_lived);
        let overall = OverallEnergy::compute(&cycles, days_lived);

        let critical_flags = cycles
            .iter()
            .filter(|s| s.value.abs() > CRITICAL_THRESHOLD)
            .map(|s| CycleFlag { cycle: s.cycle, value: s.value })
            .collect();
        let peak_flags = cycles
            .iter()
            .filter(|s| s.value > PEAK_THRESHOLD)
            .map(|s| CycleFlag { cycle: s.cycle, value: s.value })
            .collect();

        BiorhythmProfile {
            birth_date,
            calculation_date,
            days_lived,
            cycles,
            overall,
            critical_flags,
            peak_flags,
        }
    }

    /// `days` consecutive days starting at `start`, each computed on its own
    pub fn forecast(
        &self,
        birth_date: NaiveDate,
        start: NaiveDate,
        days: u32,
    ) -> Result<Vec<ForecastDay>> {
        let first = self.days_lived(birth_date, start)?;
        let forecast = (0..days)
            .map(|offset| {
                let offset = i64::from(offset);
                let date = start.checked_add_signed(Duration::days(offset)).ok_or_else(|| {
                    ForecastError::InvalidDate(format!(
                        "{start} + {offset} days is past the supported calendar"
                    ))
                })?;
                let profile = self.at_days_lived(birth_date, date, first + offset);
                Ok(ForecastDay::from(&profile))
            })
            .collect::<Result<Vec<_>>>()?;
        log::info!("Biorhythm forecast: {} days from {}", days, start);
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_overall_energy_weights() {
        let cycles = CycleSet::compute(0);
        let overall = OverallEnergy::compute(&cycles, 0);
        assert_eq!(overall.value, 0.0);
        assert_eq!(overall.percentage, 50.0);
        assert_eq!(overall.level, EnergyLevel::Medium);
        // all cosines are 1 at birth: slope = sum of weights
        assert_eq!(overall.trend, TrendLabel::Rising);
    }

    #[test]
    fn test_flags_name_their_cycles() {
        let calc = BiorhythmCalculator::new();
        // physical day 6 of 23: sin(2π·6/23) ≈ 0.998
        let profile = calc.calculate(date(2000, 1, 1), date(2000, 1, 7)).unwrap();
        assert_eq!(profile.cycles.physical.day_in_cycle, 6);
        assert!(profile.critical_flags.iter().any(|f| f.cycle == Cycle::Physical));
        assert!(profile.peak_flags.iter().any(|f| f.cycle == Cycle::Physical));
        assert!(profile.is_critical_day());
    }

    #[test]
    fn test_forecast_rejects_start_before_birth() {
        let calc = BiorhythmCalculator::new();
        assert!(calc.forecast(date(2000, 1, 10), date(2000, 1, 1), 7).is_err());
        assert!(calc.forecast(date(2000, 1, 1), date(2000, 1, 1), 0).unwrap().is_empty());
    }

    #[test]
    fn test_forecast_past_calendar_end_is_an_error() {
        let calculator = BiorhythmCalculator::new();
        let result = calculator.forecast(date(2000, 1, 1), NaiveDate::MAX, 2);
        assert!(matches!(result, Err(ForecastError::InvalidDate(_))));

        let last = calculator.forecast(date(2000, 1, 1), NaiveDate::MAX, 1).unwrap();
        assert_eq!(last.len(), 1);
    }
}
