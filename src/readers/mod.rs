pub mod aqi_reader;
pub mod dataset_cache;

pub use aqi_reader::AqiReader;
pub use dataset_cache::{DatasetCache, SourceKey};
