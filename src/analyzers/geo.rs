use crate::models::{AqiCategory, DatasetView};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationMarker {
    pub station: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pollutant_avg: Option<f64>,
    pub category: Option<AqiCategory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeographicBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Mean of the present latitudes and longitudes, each averaged on its own
pub fn map_center(view: &DatasetView<'_>) -> Option<(f64, f64)> {
    let mean = |values: Vec<f64>| {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    };

    let lat = mean(view.records().filter_map(|r| r.latitude).collect())?;
    let lon = mean(view.records().filter_map(|r| r.longitude).collect())?;
    Some((lat, lon))
}

/// Weighted points for records with coordinates and an average reading
pub fn heat_points(view: &DatasetView<'_>) -> Vec<HeatPoint> {
    view.records()
        .filter_map(|r| {
            let (latitude, longitude) = r.coordinates()?;
            Some(HeatPoint {
                latitude,
                longitude,
                weight: r.pollutant_avg?,
            })
        })
        .collect()
}

pub fn station_markers(view: &DatasetView<'_>) -> Vec<StationMarker> {
    view.records()
        .filter_map(|r| {
            let (latitude, longitude) = r.coordinates()?;
            Some(StationMarker {
                station: r.station.clone(),
                latitude,
                longitude,
                pollutant_avg: r.pollutant_avg,
                category: r.aqi_category(),
            })
        })
        .collect()
}

pub fn geographic_bounds(view: &DatasetView<'_>) -> Option<GeographicBounds> {
    let mut coords = view.records().filter_map(|r| r.coordinates());
    let (lat, lon) = coords.next()?;

    let mut bounds = GeographicBounds {
        min_lat: lat,
        max_lat: lat,
        min_lon: lon,
        max_lon: lon,
    };

    for (lat, lon) in coords {
        bounds.min_lat = bounds.min_lat.min(lat);
        bounds.max_lat = bounds.max_lat.max(lat);
        bounds.min_lon = bounds.min_lon.min(lon);
        bounds.max_lon = bounds.max_lon.max(lon);
    }

    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AqiRecord, Dataset};
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let ts = NaiveDate::from_ymd_opt(2025, 2, 21)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let rows = [
            ("S1", Some(28.0), Some(77.0), Some(250.0)),
            ("S2", Some(12.0), Some(76.0), None),
            ("S3", None, Some(80.0), Some(40.0)),
            ("S4", Some(20.0), Some(85.0), Some(90.0)),
        ];

        Dataset::from_records(
            rows.iter()
                .map(|(station, lat, lon, avg)| {
                    AqiRecord::builder(*station, ts)
                        .location(*lat, *lon)
                        .readings(None, None, *avg)
                        .build()
                        .unwrap()
                })
                .collect(),
        )
    }

    #[test]
    fn test_map_center_uses_present_values() {
        let ds = dataset();
        let (lat, lon) = map_center(&ds.all()).unwrap();
        assert_eq!(lat, 20.0);
        assert_eq!(lon, 79.5);

        assert!(map_center(&Dataset::default().all()).is_none());
    }

    #[test]
    fn test_heat_points_drop_incomplete_rows() {
        let ds = dataset();
        let points = heat_points(&ds.all());
        assert_eq!(
            points,
            vec![
                HeatPoint { latitude: 28.0, longitude: 77.0, weight: 250.0 },
                HeatPoint { latitude: 20.0, longitude: 85.0, weight: 90.0 },
            ]
        );
    }

    #[test]
    fn test_markers_need_coordinates_only() {
        let ds = dataset();
        let markers = station_markers(&ds.all());
        let stations: Vec<&str> = markers.iter().map(|m| m.station.as_str()).collect();
        assert_eq!(stations, vec!["S1", "S2", "S4"]);
        assert_eq!(markers[0].category, Some(AqiCategory::Hazardous));
        assert_eq!(markers[1].category, None);
    }

    #[test]
    fn test_bounds() {
        let ds = dataset();
        let bounds = geographic_bounds(&ds.all()).unwrap();
        assert_eq!(bounds.min_lat, 12.0);
        assert_eq!(bounds.max_lat, 28.0);
        assert_eq!(bounds.min_lon, 76.0);
        assert_eq!(bounds.max_lon, 85.0);
    }
}
