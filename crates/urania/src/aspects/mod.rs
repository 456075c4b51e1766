pub mod calculator;
pub mod types;

pub use calculator::{angular_separation, AspectDetector};
pub use types::{
    AspectKind, AspectMotion, AspectNature, AspectPoint, AspectRecord, ChartAngle, ChartPoint,
    Layer, OrbEntry, OrbTable, PointRef,
};
