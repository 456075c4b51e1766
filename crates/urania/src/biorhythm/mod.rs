//! Biorhythm cycles: fixed-period sine waves counted from the birth date.

pub mod calculator;
pub mod cycle;

pub use calculator::{
    BiorhythmCalculator, BiorhythmProfile, CycleFlag, CycleSet, ForecastDay, OverallEnergy,
    CRITICAL_THRESHOLD, PEAK_THRESHOLD,
};
pub use cycle::{Cycle, CycleState, EnergyLevel, PhaseLabel, TrendLabel};
