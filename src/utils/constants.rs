/// AQI category upper bounds (inclusive)
pub const AQI_GOOD_MAX: f64 = 50.0;
pub const AQI_MODERATE_MAX: f64 = 100.0;
pub const AQI_UNHEALTHY_SENSITIVE_MAX: f64 = 150.0;
pub const AQI_UNHEALTHY_MAX: f64 = 200.0;

/// Alert banner fires when the highest average is strictly above this
pub const DEFAULT_ALERT_THRESHOLD: f64 = AQI_UNHEALTHY_MAX;

/// Source column names
pub const COL_STATION: &str = "station";
pub const COL_CITY: &str = "city";
pub const COL_STATE: &str = "state";
pub const COL_LATITUDE: &str = "latitude";
pub const COL_LONGITUDE: &str = "longitude";
pub const COL_POLLUTANT_ID: &str = "pollutant_id";
pub const COL_POLLUTANT_MIN: &str = "pollutant_min";
pub const COL_POLLUTANT_MAX: &str = "pollutant_max";
pub const COL_POLLUTANT_AVG: &str = "pollutant_avg";
pub const COL_LAST_UPDATE: &str = "last_update";
pub const COL_AQI_CATEGORY: &str = "aqi_category";

pub const REQUIRED_COLUMNS: [&str; 10] = [
    COL_STATION,
    COL_CITY,
    COL_STATE,
    COL_LATITUDE,
    COL_LONGITUDE,
    COL_POLLUTANT_ID,
    COL_POLLUTANT_MIN,
    COL_POLLUTANT_MAX,
    COL_POLLUTANT_AVG,
    COL_LAST_UPDATE,
];

/// Cell values treated as missing numbers
pub const MISSING_MARKERS: [&str; 6] = ["", "na", "n/a", "nan", "none", "null"];

/// File names
pub const DEFAULT_DATA_FILE: &str = "AQI.csv";
pub const DEFAULT_REPORT_FILE: &str = "Air_Quality_Report.pdf";
pub const DEFAULT_EXPORT_FILE: &str = "AQI_filtered_data.csv";
pub const DEFAULT_CONFIG_FILE: &str = "aqi-processor.toml";
pub const CONFIG_ENV_PREFIX: &str = "AQI";

/// Presentation defaults
pub const DEFAULT_CLEANEST_LIMIT: usize = 5;
pub const DEFAULT_HEAD_ROWS: usize = 5;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;

/// Export timestamp layout
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
