pub mod aggregation;
pub mod geo;
pub mod summary;

pub use aggregation::{
    AggregationEngine, CategoryDistribution, CorrelationMatrix, GroupMean, MissingCount,
};
pub use geo::{
    geographic_bounds, heat_points, map_center, station_markers, GeographicBounds, HeatPoint,
    StationMarker,
};
pub use summary::{numeric_columns, ColumnStats, DatasetSummary};
