pub mod category;
pub mod dataset;
pub mod record;

pub use category::AqiCategory;
pub use dataset::{Dataset, DatasetView};
pub use record::{AqiRecord, AqiRecordBuilder};
