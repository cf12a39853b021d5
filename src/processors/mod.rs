pub mod integrity_checker;
pub mod view_filter;

pub use integrity_checker::{
    IntegrityChecker, IntegrityReport, ReadingViolation, StationStatistics, ViolationType,
};
pub use view_filter::FilterField;
