use crate::models::{AqiCategory, AqiRecord, DatasetView};
use crate::processors::FilterField;
use crate::utils::constants::*;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Five-bucket histogram over the AQI category, severity ordered
pub type CategoryDistribution = BTreeMap<AqiCategory, usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: &'static str,
    pub missing: usize,
}

/// Mean `pollutant_avg` of one state or city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupMean {
    pub name: String,
    pub mean: f64,
    pub count: usize,
}

/// Pearson correlations between the min, max and avg readings
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub columns: [&'static str; 3],
    pub values: [[f64; 3]; 3],
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    /// Symmetric, treating NaN as equal to NaN
    pub fn is_symmetric(&self) -> bool {
        (0..3).all(|i| {
            (0..3).all(|j| {
                let (a, b) = (self.values[i][j], self.values[j][i]);
                a == b || (a.is_nan() && b.is_nan())
            })
        })
    }
}

/// Stateless summary computations over a dataset view.
///
/// Missing values are skipped, never read as zero. An empty view produces
/// empty maps, NaN correlations and no alert.
pub struct AggregationEngine {
    alert_threshold: f64,
}

impl AggregationEngine {
    pub fn new() -> Self {
        Self {
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }

    pub fn with_alert_threshold(alert_threshold: f64) -> Self {
        Self { alert_threshold }
    }

    pub fn alert_threshold(&self) -> f64 {
        self.alert_threshold
    }

    /// Absent values per column, in source column order
    pub fn missing_counts(&self, view: &DatasetView<'_>) -> Vec<MissingCount> {
        let mut counts = [0usize; 11];

        for record in view.records() {
            let absent = [
                false, // station is required
                record.city.is_none(),
                record.state.is_none(),
                record.latitude.is_none(),
                record.longitude.is_none(),
                record.pollutant_id.is_none(),
                record.pollutant_min.is_none(),
                record.pollutant_max.is_none(),
                record.pollutant_avg.is_none(),
                false, // last_update is required
                record.aqi_category().is_none(),
            ];
            for (count, missing) in counts.iter_mut().zip(absent) {
                *count += missing as usize;
            }
        }

        REQUIRED_COLUMNS
            .iter()
            .copied()
            .chain(std::iter::once(COL_AQI_CATEGORY))
            .zip(counts)
            .map(|(column, missing)| MissingCount { column, missing })
            .collect()
    }

    /// Count of categorized records per tier. Records without an average are
    /// left out, so the counts sum to the number of categorized records.
    pub fn category_distribution(&self, view: &DatasetView<'_>) -> CategoryDistribution {
        let mut distribution = CategoryDistribution::new();
        for category in view.records().filter_map(AqiRecord::aqi_category) {
            *distribution.entry(category).or_insert(0) += 1;
        }
        distribution
    }

    /// Pairwise-complete Pearson correlation over (min, max, avg)
    pub fn correlation_matrix(&self, view: &DatasetView<'_>) -> CorrelationMatrix {
        let columns: Vec<[Option<f64>; 3]> = view
            .records()
            .map(|r| [r.pollutant_min, r.pollutant_max, r.pollutant_avg])
            .collect();

        let mut values = [[f64::NAN; 3]; 3];
        for i in 0..3 {
            for j in i..3 {
                let pairs: Vec<(f64, f64)> = columns
                    .iter()
                    .filter_map(|row| row[i].zip(row[j]))
                    .collect();

                let r = pearson(&pairs);
                let r = if i == j && !r.is_nan() { 1.0 } else { r };
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: [COL_POLLUTANT_MIN, COL_POLLUTANT_MAX, COL_POLLUTANT_AVG],
            values,
        }
    }

    /// Mean average reading per state, most polluted first
    pub fn state_averages(&self, view: &DatasetView<'_>) -> Vec<GroupMean> {
        let mut means = group_means(view, FilterField::State);
        means.sort_by(|a, b| b.mean.total_cmp(&a.mean).then_with(|| a.name.cmp(&b.name)));
        means
    }

    /// Mean average reading per city, cleanest first
    pub fn city_averages(&self, view: &DatasetView<'_>) -> Vec<GroupMean> {
        let mut means = group_means(view, FilterField::City);
        means.sort_by(|a, b| a.mean.total_cmp(&b.mean).then_with(|| a.name.cmp(&b.name)));
        means
    }

    pub fn cleanest_cities(&self, view: &DatasetView<'_>, n: usize) -> Vec<GroupMean> {
        let mut means = self.city_averages(view);
        means.truncate(n);
        means
    }

    /// Record count per pollutant type
    pub fn pollutant_type_histogram(&self, view: &DatasetView<'_>) -> BTreeMap<String, usize> {
        let mut histogram = BTreeMap::new();
        for pollutant in view.records().filter_map(|r| r.pollutant_id.as_deref()) {
            *histogram.entry(pollutant.to_string()).or_insert(0) += 1;
        }
        histogram
    }

    pub fn max_average(&self, view: &DatasetView<'_>) -> Option<f64> {
        view.records()
            .filter_map(|r| r.pollutant_avg)
            .max_by(f64::total_cmp)
    }

    /// Record carrying the highest average reading
    pub fn peak_reading<'a>(&self, view: &DatasetView<'a>) -> Option<&'a AqiRecord> {
        view.records()
            .filter(|r| r.pollutant_avg.is_some())
            .max_by(|a, b| {
                a.pollutant_avg
                    .unwrap_or(f64::NEG_INFINITY)
                    .total_cmp(&b.pollutant_avg.unwrap_or(f64::NEG_INFINITY))
            })
    }

    /// True when some average reading is strictly above the alert threshold
    pub fn alert_threshold_exceeded(&self, view: &DatasetView<'_>) -> bool {
        let exceeded = self
            .max_average(view)
            .is_some_and(|max| max > self.alert_threshold);

        if exceeded {
            warn!(
                threshold = self.alert_threshold,
                "High pollution levels detected"
            );
        }

        exceeded
    }
}

impl Default for AggregationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn group_means(view: &DatasetView<'_>, field: FilterField) -> Vec<GroupMean> {
    let mut sums: HashMap<&str, (f64, usize)> = HashMap::new();

    for record in view.records() {
        if let (Some(name), Some(avg)) = (field.value_of(record), record.pollutant_avg) {
            let entry = sums.entry(name).or_insert((0.0, 0));
            entry.0 += avg;
            entry.1 += 1;
        }
    }

    sums.into_iter()
        .map(|(name, (sum, count))| GroupMean {
            name: name.to_string(),
            mean: sum / count as f64,
            count,
        })
        .collect()
}

/// Sample Pearson coefficient; NaN below two pairs or with zero variance
fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }

    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}
