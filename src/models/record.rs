use chrono::NaiveDateTime;
use serde::Serialize;
use validator::Validate;

use crate::error::Result;
use crate::models::AqiCategory;

/// One monitoring observation. The AQI category is derived from
/// `pollutant_avg` when the record is built and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct AqiRecord {
    #[validate(length(min = 1))]
    pub station: String,

    pub city: Option<String>,

    pub state: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub pollutant_id: Option<String>,

    #[validate(range(min = 0.0))]
    pub pollutant_min: Option<f64>,

    #[validate(range(min = 0.0))]
    pub pollutant_max: Option<f64>,

    #[validate(range(min = 0.0))]
    pub pollutant_avg: Option<f64>,

    pub last_update: NaiveDateTime,

    aqi_category: Option<AqiCategory>,
}

impl AqiRecord {
    pub fn builder(station: impl Into<String>, last_update: NaiveDateTime) -> AqiRecordBuilder {
        AqiRecordBuilder::new(station, last_update)
    }

    /// `None` when the average reading is missing
    pub fn aqi_category(&self) -> Option<AqiCategory> {
        self.aqi_category
    }

    pub fn is_categorized(&self) -> bool {
        self.aqi_category.is_some()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    pub fn reading_range(&self) -> Option<f64> {
        self.pollutant_max
            .zip(self.pollutant_min)
            .map(|(max, min)| max - min)
    }
}

pub struct AqiRecordBuilder {
    station: String,
    city: Option<String>,
    state: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    pollutant_id: Option<String>,
    pollutant_min: Option<f64>,
    pollutant_max: Option<f64>,
    pollutant_avg: Option<f64>,
    last_update: NaiveDateTime,
}

impl AqiRecordBuilder {
    pub fn new(station: impl Into<String>, last_update: NaiveDateTime) -> Self {
        Self {
            station: station.into(),
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            pollutant_id: None,
            pollutant_min: None,
            pollutant_max: None,
            pollutant_avg: None,
            last_update,
        }
    }

    pub fn city(mut self, city: Option<String>) -> Self {
        self.city = city;
        self
    }

    pub fn state(mut self, state: Option<String>) -> Self {
        self.state = state;
        self
    }

    pub fn location(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    pub fn pollutant_id(mut self, pollutant_id: Option<String>) -> Self {
        self.pollutant_id = pollutant_id;
        self
    }

    pub fn readings(mut self, min: Option<f64>, max: Option<f64>, avg: Option<f64>) -> Self {
        // NaN carries no reading; keep it out of means and categories
        self.pollutant_min = min.filter(|v| !v.is_nan());
        self.pollutant_max = max.filter(|v| !v.is_nan());
        self.pollutant_avg = avg.filter(|v| !v.is_nan());
        self
    }

    /// Validate ranges and derive the AQI category
    pub fn build(self) -> Result<AqiRecord> {
        let record = AqiRecord {
            aqi_category: self.pollutant_avg.and_then(AqiCategory::classify),
            station: self.station,
            city: self.city,
            state: self.state,
            latitude: self.latitude,
            longitude: self.longitude,
            pollutant_id: self.pollutant_id,
            pollutant_min: self.pollutant_min,
            pollutant_max: self.pollutant_max,
            pollutant_avg: self.pollutant_avg,
            last_update: self.last_update,
        };

        record.validate()?;
        Ok(record)
    }
}
