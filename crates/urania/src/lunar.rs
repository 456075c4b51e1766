//! Approximate lunar phase for a calendar date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of a lunation elapsed at 2001-01-01
const REFERENCE_LUNATION: f64 = 0.204_397_31;
/// Lunations per day (1 / 29.530588853)
const LUNATIONS_PER_DAY: f64 = 0.033_863_192_69;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LunarPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl LunarPhase {
    const ALL: [LunarPhase; 8] = [
        LunarPhase::NewMoon,
        LunarPhase::WaxingCrescent,
        LunarPhase::FirstQuarter,
        LunarPhase::WaxingGibbous,
        LunarPhase::FullMoon,
        LunarPhase::WaningGibbous,
        LunarPhase::LastQuarter,
        LunarPhase::WaningCrescent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LunarPhase::NewMoon => "New Moon",
            LunarPhase::WaxingCrescent => "Waxing Crescent",
            LunarPhase::FirstQuarter => "First Quarter",
            LunarPhase::WaxingGibbous => "Waxing Gibbous",
            LunarPhase::FullMoon => "Full Moon",
            LunarPhase::WaningGibbous => "Waning Gibbous",
            LunarPhase::LastQuarter => "Last Quarter",
            LunarPhase::WaningCrescent => "Waning Crescent",
        }
    }
}

impl fmt::Display for LunarPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fraction of the current lunation elapsed, in [0, 1)
pub fn lunation_fraction(date: NaiveDate) -> f64 {
    let reference = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap_or(NaiveDate::MIN);
    let days = (date - reference).num_days() as f64;
    (REFERENCE_LUNATION + days * LUNATIONS_PER_DAY).rem_euclid(1.0)
}

pub fn lunar_phase(date: NaiveDate) -> LunarPhase {
    let index = ((lunation_fraction(date) * 8.0 + 0.5) as usize) & 7;
    LunarPhase::ALL[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_phases() {
        // full moon of 2000-01-21, new moon of 2000-01-06
        assert_eq!(
            lunar_phase(NaiveDate::from_ymd_opt(2000, 1, 21).unwrap()),
            LunarPhase::FullMoon
        );
        assert_eq!(
            lunar_phase(NaiveDate::from_ymd_opt(2000, 1, 6).unwrap()),
            LunarPhase::NewMoon
        );
    }

    #[test]
    fn test_fraction_range() {
        let mut date = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
        for _ in 0..400 {
            let f = lunation_fraction(date);
            assert!((0.0..1.0).contains(&f));
            date = date.succ_opt().unwrap();
        }
    }
}
