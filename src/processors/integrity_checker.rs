use crate::models::{AqiRecord, DatasetView};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_records: usize,
    pub categorized_records: usize,
    pub missing_average_records: usize,
    pub missing_coordinate_records: usize,
    pub reading_violations: Vec<ReadingViolation>,
    pub station_statistics: BTreeMap<String, StationStatistics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadingViolation {
    pub station: String,
    pub pollutant_id: Option<String>,
    pub last_update: NaiveDateTime,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    MinGreaterThanAvg,
    AvgGreaterThanMax,
    MinGreaterThanMax,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StationStatistics {
    pub total_records: usize,
    pub missing_average_records: usize,
    pub min_reading: Option<f64>,
    pub max_reading: Option<f64>,
}

pub struct IntegrityChecker {
    tolerance: f64,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self { tolerance: 0.0 }
    }

    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Check reading relationships and completeness across a view
    pub fn check_integrity(&self, view: &DatasetView<'_>) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_records: view.len(),
            categorized_records: 0,
            missing_average_records: 0,
            missing_coordinate_records: 0,
            reading_violations: Vec::new(),
            station_statistics: BTreeMap::new(),
        };

        for record in view.records() {
            self.check_readings(record, &mut report);

            if record.is_categorized() {
                report.categorized_records += 1;
            }
            if record.pollutant_avg.is_none() {
                report.missing_average_records += 1;
            }
            if record.coordinates().is_none() {
                report.missing_coordinate_records += 1;
            }

            let stats = report
                .station_statistics
                .entry(record.station.clone())
                .or_default();

            stats.total_records += 1;
            if record.pollutant_avg.is_none() {
                stats.missing_average_records += 1;
            }
            if let Some(min) = record.pollutant_min {
                stats.min_reading = Some(stats.min_reading.map_or(min, |m| m.min(min)));
            }
            if let Some(max) = record.pollutant_max {
                stats.max_reading = Some(stats.max_reading.map_or(max, |m| m.max(max)));
            }
        }

        report
    }

    fn check_readings(&self, record: &AqiRecord, report: &mut IntegrityReport) {
        let pairs = [
            (
                record.pollutant_min,
                record.pollutant_avg,
                ViolationType::MinGreaterThanAvg,
                "min",
                "avg",
            ),
            (
                record.pollutant_avg,
                record.pollutant_max,
                ViolationType::AvgGreaterThanMax,
                "avg",
                "max",
            ),
            (
                record.pollutant_min,
                record.pollutant_max,
                ViolationType::MinGreaterThanMax,
                "min",
                "max",
            ),
        ];

        for (low, high, violation_type, low_name, high_name) in pairs {
            if let (Some(low), Some(high)) = (low, high) {
                if low > high + self.tolerance {
                    report.reading_violations.push(ReadingViolation {
                        station: record.station.clone(),
                        pollutant_id: record.pollutant_id.clone(),
                        last_update: record.last_update,
                        violation_type,
                        details: format!(
                            "{} reading {} exceeds {} reading {}",
                            low_name, low, high_name, high
                        ),
                    });
                }
            }
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let pct = |n: usize| {
            if report.total_records == 0 {
                0.0
            } else {
                100.0 * n as f64 / report.total_records as f64
            }
        };

        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total Records: {}\n", report.total_records));
        summary.push_str(&format!("Stations: {}\n", report.station_statistics.len()));
        summary.push_str(&format!(
            "Categorized Records: {} ({:.1}%)\n",
            report.categorized_records,
            pct(report.categorized_records)
        ));
        summary.push_str(&format!(
            "Missing Average: {} ({:.1}%)\n",
            report.missing_average_records,
            pct(report.missing_average_records)
        ));
        summary.push_str(&format!(
            "Missing Coordinates: {} ({:.1}%)\n",
            report.missing_coordinate_records,
            pct(report.missing_coordinate_records)
        ));
        summary.push_str(&format!(
            "\nReading Violations: {}\n",
            report.reading_violations.len()
        ));

        if !report.reading_violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.reading_violations.iter().take(10).enumerate() {
                summary.push_str(&format!(
                    "  {}. {} ({}) at {}: {}\n",
                    i + 1,
                    violation.station,
                    violation.pollutant_id.as_deref().unwrap_or("?"),
                    violation.last_update,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
