use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cycle {
    Physical,
    Emotional,
    Intellectual,
    Intuitive,
}

impl Cycle {
    pub const ALL: [Cycle; 4] = [
        Cycle::Physical,
        Cycle::Emotional,
        Cycle::Intellectual,
        Cycle::Intuitive,
    ];

    /// Period in days
    pub fn period(&self) -> u32 {
        match self {
            Cycle::Physical => 23,
            Cycle::Emotional => 28,
            Cycle::Intellectual => 33,
            Cycle::Intuitive => 38,
        }
    }

    /// Weight in the overall energy score
    pub fn weight(&self) -> f64 {
        match self {
            Cycle::Physical => 0.30,
            Cycle::Emotional => 0.25,
            Cycle::Intellectual => 0.25,
            Cycle::Intuitive => 0.20,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Cycle::Physical => "physical",
            Cycle::Emotional => "emotional",
            Cycle::Intellectual => "intellectual",
            Cycle::Intuitive => "intuitive",
        }
    }

    /// Position in the cycle for a day count, in [0, period)
    pub fn day_in_cycle(&self, days_lived: i64) -> u32 {
        days_lived.rem_euclid(i64::from(self.period())) as u32
    }

    /// Phase angle in radians; reduced by the period first so equal days in cycle
    /// give bit-identical values
    pub fn phase_angle(&self, days_lived: i64) -> f64 {
        TAU * f64::from(self.day_in_cycle(days_lived)) / f64::from(self.period())
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseLabel {
    Peak,
    High,
    Neutral,
    Low,
    Critical,
}

impl PhaseLabel {
    pub fn from_value(value: f64) -> Self {
        if value >= 0.7 {
            PhaseLabel::Peak
        } else if value >= 0.3 {
            PhaseLabel::High
        } else if value >= -0.3 {
            PhaseLabel::Neutral
        } else if value >= -0.7 {
            PhaseLabel::Low
        } else {
            PhaseLabel::Critical
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PhaseLabel::Peak => "peak",
            PhaseLabel::High => "high",
            PhaseLabel::Neutral => "neutral",
            PhaseLabel::Low => "low",
            PhaseLabel::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Rising,
    Falling,
    Stable,
}

impl TrendLabel {
    /// From the derivative of the sine (cos of the phase)
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.1 {
            TrendLabel::Rising
        } else if slope < -0.1 {
            TrendLabel::Falling
        } else {
            TrendLabel::Stable
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TrendLabel::Rising => "rising",
            TrendLabel::Falling => "falling",
            TrendLabel::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

impl EnergyLevel {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 70.0 {
            EnergyLevel::High
        } else if percentage < 30.0 {
            EnergyLevel::Low
        } else {
            EnergyLevel::Medium
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnergyLevel::High => "high",
            EnergyLevel::Medium => "medium",
            EnergyLevel::Low => "low",
        }
    }
}

/// Rescale a value in [-1, 1] to a percentage
pub fn to_percentage(value: f64) -> f64 {
    (value + 1.0) / 2.0 * 100.0
}

/// One cycle on one day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleState {
    pub cycle: Cycle,
    /// sin(phase), in [-1, 1]
    pub value: f64,
    pub percentage: f64,
    pub day_in_cycle: u32,
    pub phase: PhaseLabel,
    pub trend: TrendLabel,
}

impl CycleState {
    pub fn compute(cycle: Cycle, days_lived: i64) -> Self {
        let angle = cycle.phase_angle(days_lived);
        let value = angle.sin();
        Self {
            cycle,
            value,
            percentage: to_percentage(value),
            day_in_cycle: cycle.day_in_cycle(days_lived),
            phase: PhaseLabel::from_value(value),
            trend: TrendLabel::from_slope(angle.cos()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_thresholds() {
        assert_eq!(PhaseLabel::from_value(0.7), PhaseLabel::Peak);
        assert_eq!(PhaseLabel::from_value(0.69), PhaseLabel::High);
        assert_eq!(PhaseLabel::from_value(0.3), PhaseLabel::High);
        assert_eq!(PhaseLabel::from_value(-0.3), PhaseLabel::Neutral);
        assert_eq!(PhaseLabel::from_value(-0.7), PhaseLabel::Low);
        assert_eq!(PhaseLabel::from_value(-0.71), PhaseLabel::Critical);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(TrendLabel::from_slope(0.11), TrendLabel::Rising);
        assert_eq!(TrendLabel::from_slope(0.1), TrendLabel::Stable);
        assert_eq!(TrendLabel::from_slope(-0.1), TrendLabel::Stable);
        assert_eq!(TrendLabel::from_slope(-0.11), TrendLabel::Falling);
    }

    #[test]
    fn test_energy_levels() {
        assert_eq!(EnergyLevel::from_percentage(70.0), EnergyLevel::Medium);
        assert_eq!(EnergyLevel::from_percentage(70.1), EnergyLevel::High);
        assert_eq!(EnergyLevel::from_percentage(29.9), EnergyLevel::Low);
    }

    #[test]
    fn test_cycle_start_is_zero() {
        for cycle in Cycle::ALL {
            let state = CycleState::compute(cycle, i64::from(cycle.period()) * 3);
            assert_eq!(state.day_in_cycle, 0);
            assert_eq!(state.value, 0.0);
            assert_eq!(state.percentage, 50.0);
            assert_eq!(state.trend, TrendLabel::Rising);
        }
    }
}
