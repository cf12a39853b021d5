use crate::models::AqiRecord;

/// Immutable, ordered collection of records as loaded from one source
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<AqiRecord>,
}

impl Dataset {
    pub fn from_records(records: Vec<AqiRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[AqiRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&AqiRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identity view over every record
    pub fn all(&self) -> DatasetView<'_> {
        DatasetView {
            dataset: self,
            indices: (0..self.records.len()).collect(),
        }
    }

    /// View over an explicit selection of record positions.
    /// Out-of-range positions are dropped.
    pub fn select(&self, indices: impl IntoIterator<Item = usize>) -> DatasetView<'_> {
        let len = self.records.len();
        DatasetView {
            dataset: self,
            indices: indices.into_iter().filter(|&i| i < len).collect(),
        }
    }
}

/// Read-only projection over a [`Dataset`]. Holds record positions, never copies.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> DatasetView<'a> {
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn is_identity(&self) -> bool {
        self.indices.len() == self.dataset.len()
            && self.indices.iter().enumerate().all(|(pos, &i)| pos == i)
    }

    pub fn records(&self) -> impl Iterator<Item = &'a AqiRecord> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.records[i])
    }

    pub fn head(&self, n: usize) -> Vec<&'a AqiRecord> {
        self.records().take(n).collect()
    }

    /// Narrow this view with a per-record predicate, keeping order
    pub fn retain<F>(&self, mut keep: F) -> DatasetView<'a>
    where
        F: FnMut(&AqiRecord) -> bool,
    {
        let dataset = self.dataset;
        DatasetView {
            dataset,
            indices: self
                .indices
                .iter()
                .copied()
                .filter(|&i| keep(&dataset.records[i]))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(avgs: &[f64]) -> Dataset {
        let ts = NaiveDate::from_ymd_opt(2025, 2, 21)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        Dataset::from_records(
            avgs.iter()
                .enumerate()
                .map(|(i, &avg)| {
                    AqiRecord::builder(format!("Station {}", i), ts)
                        .readings(None, None, Some(avg))
                        .build()
                        .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_all_is_identity() {
        let ds = dataset(&[10.0, 60.0, 120.0]);
        let view = ds.all();
        assert_eq!(view.len(), 3);
        assert!(view.is_identity());
        assert_eq!(view.records().count(), 3);
    }

    #[test]
    fn test_retain_keeps_order_and_borrows() {
        let ds = dataset(&[10.0, 260.0, 120.0, 300.0]);
        let view = ds.all().retain(|r| r.pollutant_avg.unwrap_or(0.0) > 100.0);

        assert_eq!(view.indices(), &[1, 2, 3]);
        assert!(!view.is_identity());
        assert!(std::ptr::eq(view.dataset(), &ds));

        let stations: Vec<&str> = view.records().map(|r| r.station.as_str()).collect();
        assert_eq!(stations, vec!["Station 1", "Station 2", "Station 3"]);
    }

    #[test]
    fn test_select_drops_out_of_range() {
        let ds = dataset(&[10.0, 20.0]);
        let view = ds.select([1, 5, 0]);
        assert_eq!(view.indices(), &[1, 0]);
    }

    #[test]
    fn test_head_and_empty() {
        let ds = dataset(&[1.0, 2.0, 3.0]);
        assert_eq!(ds.all().head(2).len(), 2);
        assert_eq!(ds.all().head(10).len(), 3);

        let empty = Dataset::default();
        assert!(empty.is_empty());
        assert!(empty.all().is_empty());
        assert!(empty.all().is_identity());
    }
}
