pub mod natal;
pub mod profile;
pub mod transit;

pub use natal::{ChartFeatures, NatalChart, NatalChartAssembler};
pub use profile::{
    parse_birth_date, parse_birth_time, parse_timezone, parse_utc_offset, BirthProfile,
    BirthTimezone,
};
pub use transit::{TransitEvaluator, TransitReport, STRONG_ASPECT_THRESHOLD};
