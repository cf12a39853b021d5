use crate::models::{AqiRecord, DatasetView};
use crate::utils::constants::*;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

/// Describe-style statistics of one numeric column, over present values only
#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub column: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnStats {
    pub fn from_values(column: &'static str, values: impl IntoIterator<Item = f64>) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = if count > 0 {
            sorted.iter().sum::<f64>() / count as f64
        } else {
            f64::NAN
        };

        // Sample standard deviation (n - 1)
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Self {
            column,
            count,
            mean,
            std,
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    pub fn iqr(&self) -> f64 {
        self.q75 - self.q25
    }
}

/// Linear-interpolated quantile of an ascending slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    pub unique_stations: usize,
    pub unique_cities: usize,
    pub unique_states: usize,
    pub time_range: Option<(NaiveDateTime, NaiveDateTime)>,
    pub columns: Vec<ColumnStats>,
}

impl DatasetSummary {
    pub fn from_view(view: &DatasetView<'_>) -> Self {
        let mut stations = HashSet::new();
        let mut cities = HashSet::new();
        let mut states = HashSet::new();
        let mut time_range: Option<(NaiveDateTime, NaiveDateTime)> = None;

        for record in view.records() {
            stations.insert(record.station.as_str());
            if let Some(city) = record.city.as_deref() {
                cities.insert(city);
            }
            if let Some(state) = record.state.as_deref() {
                states.insert(state);
            }

            let ts = record.last_update;
            time_range = Some(match time_range {
                Some((first, last)) => (first.min(ts), last.max(ts)),
                None => (ts, ts),
            });
        }

        Self {
            total_records: view.len(),
            unique_stations: stations.len(),
            unique_cities: cities.len(),
            unique_states: states.len(),
            time_range,
            columns: numeric_columns(view),
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.column == name)
    }

    pub fn summary(&self) -> String {
        let period = match self.time_range {
            Some((first, last)) => format!("{} to {}", first, last),
            None => "No records".to_string(),
        };

        let mut out = format!(
            "Records: {} total\n\
            Stations: {} | Cities: {} | States: {}\n\
            Last Update: {}\n",
            self.total_records,
            self.unique_stations,
            self.unique_cities,
            self.unique_states,
            period
        );

        out.push_str(&format!(
            "\n{:<14} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
            "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
        ));
        for c in &self.columns {
            out.push_str(&format!(
                "{:<14} {:>7} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}\n",
                c.column, c.count, c.mean, c.std, c.min, c.q25, c.median, c.q75, c.max
            ));
        }

        out
    }
}

/// Statistics for the five numeric columns. On a filtered view these are the
/// box-plot figures for that selection.
pub fn numeric_columns(view: &DatasetView<'_>) -> Vec<ColumnStats> {
    let columns: [(&'static str, fn(&AqiRecord) -> Option<f64>); 5] = [
        (COL_LATITUDE, |r| r.latitude),
        (COL_LONGITUDE, |r| r.longitude),
        (COL_POLLUTANT_MIN, |r| r.pollutant_min),
        (COL_POLLUTANT_MAX, |r| r.pollutant_max),
        (COL_POLLUTANT_AVG, |r| r.pollutant_avg),
    ];

    columns
        .iter()
        .map(|(name, get)| ColumnStats::from_values(*name, view.records().filter_map(*get)))
        .collect()
}
