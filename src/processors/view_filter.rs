use crate::error::{AqiError, Result};
use crate::models::{AqiRecord, Dataset, DatasetView};
use crate::utils::constants::{COL_CITY, COL_STATE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

/// Record fields a view can be narrowed by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    State,
    City,
}

impl FilterField {
    pub fn name(&self) -> &'static str {
        match self {
            FilterField::State => COL_STATE,
            FilterField::City => COL_CITY,
        }
    }

    pub fn value_of<'r>(&self, record: &'r AqiRecord) -> Option<&'r str> {
        match self {
            FilterField::State => record.state.as_deref(),
            FilterField::City => record.city.as_deref(),
        }
    }
}

impl std::fmt::Display for FilterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FilterField {
    type Err = AqiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "state" => Ok(FilterField::State),
            "city" => Ok(FilterField::City),
            _ => Err(AqiError::Config(format!("Unknown filter field: '{}'", s))),
        }
    }
}

impl<'a> DatasetView<'a> {
    /// Keep records whose `field` is one of `selected`.
    ///
    /// An empty selection means "nothing chosen yet" and yields this view
    /// unchanged rather than an empty one. Values absent from the data simply
    /// match nothing.
    pub fn filter_by<S: AsRef<str>>(&self, field: FilterField, selected: &[S]) -> DatasetView<'a> {
        if selected.is_empty() {
            return self.clone();
        }

        let wanted: HashSet<&str> = selected.iter().map(|s| s.as_ref()).collect();
        let view = self.retain(|r| field.value_of(r).is_some_and(|v| wanted.contains(v)));

        debug!(
            field = %field,
            selected = wanted.len(),
            before = self.len(),
            after = view.len(),
            "Filtered view"
        );

        view
    }

    /// Like [`filter_by`](Self::filter_by) with the field named as text.
    /// An unknown field name with a non-empty selection yields an empty view.
    pub fn filter_by_name<S: AsRef<str>>(&self, field: &str, selected: &[S]) -> DatasetView<'a> {
        if selected.is_empty() {
            return self.clone();
        }

        match field.parse::<FilterField>() {
            Ok(field) => self.filter_by(field, selected),
            Err(_) => {
                debug!(field, "Filter on unknown field matches nothing");
                self.retain(|_| false)
            }
        }
    }

    /// Distinct values of `field` in order of first appearance
    pub fn unique_values(&self, field: FilterField) -> Vec<&'a str> {
        let mut seen = HashSet::new();
        self.records()
            .filter_map(|r| field.value_of(r))
            .filter(|v| seen.insert(*v))
            .collect()
    }
}

impl Dataset {
    pub fn filter_by<S: AsRef<str>>(&self, field: FilterField, selected: &[S]) -> DatasetView<'_> {
        self.all().filter_by(field, selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let ts = NaiveDate::from_ymd_opt(2025, 2, 21)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let rows = [
            ("S1", Some("Delhi"), Some("Delhi")),
            ("S2", Some("Maharashtra"), Some("Mumbai")),
            ("S3", Some("Maharashtra"), Some("Pune")),
            ("S4", None, Some("Unknown Town")),
            ("S5", Some("Delhi"), Some("Delhi")),
        ];

        Dataset::from_records(
            rows.iter()
                .map(|(station, state, city)| {
                    AqiRecord::builder(*station, ts)
                        .state(state.map(str::to_string))
                        .city(city.map(str::to_string))
                        .build()
                        .unwrap()
                })
                .collect(),
        )
    }

    fn stations(view: &DatasetView<'_>) -> Vec<String> {
        view.records().map(|r| r.station.clone()).collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let ds = dataset();
        let none: [&str; 0] = [];
        let view = ds.filter_by(FilterField::State, &none);

        assert_eq!(view.len(), ds.len());
        assert!(view.is_identity());
    }

    #[test]
    fn test_filter_by_state() {
        let ds = dataset();
        let view = ds.filter_by(FilterField::State, &["Maharashtra"]);
        assert_eq!(stations(&view), vec!["S2", "S3"]);
    }

    #[test]
    fn test_filter_by_several_cities() {
        let ds = dataset();
        let view = ds.filter_by(FilterField::City, &["Pune", "Delhi"]);
        assert_eq!(stations(&view), vec!["S1", "S3", "S5"]);
    }

    #[test]
    fn test_unknown_value_is_empty_view() {
        let ds = dataset();
        let view = ds.filter_by(FilterField::State, &["NoSuchState"]);
        assert!(view.is_empty());
    }

    #[test]
    fn test_unknown_field_name() {
        let ds = dataset();
        assert!(ds.all().filter_by_name("district", &["Delhi"]).is_empty());

        let none: Vec<String> = Vec::new();
        assert!(ds.all().filter_by_name("district", &none).is_identity());

        let view = ds.all().filter_by_name("CITY", &["Mumbai"]);
        assert_eq!(stations(&view), vec!["S2"]);
    }

    #[test]
    fn test_filters_compose() {
        let ds = dataset();
        let view = ds
            .filter_by(FilterField::State, &["Maharashtra"])
            .filter_by(FilterField::City, &["Pune", "Delhi"]);
        assert_eq!(stations(&view), vec!["S3"]);
    }

    #[test]
    fn test_unique_values_first_appearance() {
        let ds = dataset();
        assert_eq!(
            ds.all().unique_values(FilterField::State),
            vec!["Delhi", "Maharashtra"]
        );
        assert_eq!(
            ds.all().unique_values(FilterField::City),
            vec!["Delhi", "Mumbai", "Pune", "Unknown Town"]
        );
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("State".parse::<FilterField>().unwrap(), FilterField::State);
        assert_eq!(" city ".parse::<FilterField>().unwrap(), FilterField::City);
        assert!("station".parse::<FilterField>().is_err());
    }
}
