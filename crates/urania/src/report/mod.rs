//! Turning numeric results into a prioritised daily report.

pub mod advice;
pub mod combiner;
pub mod summary;

pub use advice::{biorhythm_advice, element_recommendation, transit_advice, Advice};
pub use combiner::{
    DailyReport, DaySlot, Priority, Recommendation, RecommendationCombiner, ScheduleEntry,
    MAX_CRITICAL_NOTES, MAX_RECOMMENDATIONS, SIGNIFICANT_ASPECTS,
};
pub use summary::{AspectSummary, CycleSummary, ForecastSummary};
