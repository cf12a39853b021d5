pub mod constants;
pub mod filename;
pub mod progress;
pub mod timestamp;

pub use constants::*;
pub use filename::{default_export_filename, ensure_extension};
pub use progress::ProgressReporter;
pub use timestamp::parse_timestamp;
