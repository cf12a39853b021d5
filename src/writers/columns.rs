use crate::error::{AqiError, Result};
use crate::models::AqiRecord;
use crate::utils::constants::*;
use std::str::FromStr;

/// Exportable record columns, in source order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportColumn {
    Station,
    City,
    State,
    Latitude,
    Longitude,
    PollutantId,
    PollutantMin,
    PollutantMax,
    PollutantAvg,
    LastUpdate,
    AqiCategory,
}

impl ExportColumn {
    pub const ALL: [ExportColumn; 11] = [
        ExportColumn::Station,
        ExportColumn::City,
        ExportColumn::State,
        ExportColumn::Latitude,
        ExportColumn::Longitude,
        ExportColumn::PollutantId,
        ExportColumn::PollutantMin,
        ExportColumn::PollutantMax,
        ExportColumn::PollutantAvg,
        ExportColumn::LastUpdate,
        ExportColumn::AqiCategory,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ExportColumn::Station => COL_STATION,
            ExportColumn::City => COL_CITY,
            ExportColumn::State => COL_STATE,
            ExportColumn::Latitude => COL_LATITUDE,
            ExportColumn::Longitude => COL_LONGITUDE,
            ExportColumn::PollutantId => COL_POLLUTANT_ID,
            ExportColumn::PollutantMin => COL_POLLUTANT_MIN,
            ExportColumn::PollutantMax => COL_POLLUTANT_MAX,
            ExportColumn::PollutantAvg => COL_POLLUTANT_AVG,
            ExportColumn::LastUpdate => COL_LAST_UPDATE,
            ExportColumn::AqiCategory => COL_AQI_CATEGORY,
        }
    }

    /// Parse a list of column names; an empty list selects every column
    pub fn parse_selection<S: AsRef<str>>(names: &[S]) -> Result<Vec<ExportColumn>> {
        if names.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        names.iter().map(|n| n.as_ref().parse()).collect()
    }

    pub fn numeric_value(&self, record: &AqiRecord) -> Option<f64> {
        match self {
            ExportColumn::Latitude => record.latitude,
            ExportColumn::Longitude => record.longitude,
            ExportColumn::PollutantMin => record.pollutant_min,
            ExportColumn::PollutantMax => record.pollutant_max,
            ExportColumn::PollutantAvg => record.pollutant_avg,
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ExportColumn::Latitude
                | ExportColumn::Longitude
                | ExportColumn::PollutantMin
                | ExportColumn::PollutantMax
                | ExportColumn::PollutantAvg
        )
    }

    /// Cell text for tabular export; `None` for a missing value
    pub fn text_value(&self, record: &AqiRecord) -> Option<String> {
        match self {
            ExportColumn::Station => Some(record.station.clone()),
            ExportColumn::City => record.city.clone(),
            ExportColumn::State => record.state.clone(),
            ExportColumn::PollutantId => record.pollutant_id.clone(),
            ExportColumn::LastUpdate => Some(
                record
                    .last_update
                    .format(EXPORT_TIMESTAMP_FORMAT)
                    .to_string(),
            ),
            ExportColumn::AqiCategory => record.aqi_category().map(|c| c.label().to_string()),
            numeric => numeric.numeric_value(record).map(|v| v.to_string()),
        }
    }
}

impl FromStr for ExportColumn {
    type Err = AqiError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ExportColumn::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AqiError::UnknownColumn(s.to_string()))
    }
}

impl std::fmt::Display for ExportColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
