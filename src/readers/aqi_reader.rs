use crate::error::{AqiError, Result};
use crate::models::{AqiRecord, Dataset};
use crate::utils::constants::*;
use crate::utils::timestamp::parse_timestamp;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

/// Positions of the required columns within a source header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    station: usize,
    city: usize,
    state: usize,
    latitude: usize,
    longitude: usize,
    pollutant_id: usize,
    pollutant_min: usize,
    pollutant_max: usize,
    pollutant_avg: usize,
    last_update: usize,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| AqiError::parse(1, format!("Missing required column '{}'", name)))
        };

        Ok(Self {
            station: find(COL_STATION)?,
            city: find(COL_CITY)?,
            state: find(COL_STATE)?,
            latitude: find(COL_LATITUDE)?,
            longitude: find(COL_LONGITUDE)?,
            pollutant_id: find(COL_POLLUTANT_ID)?,
            pollutant_min: find(COL_POLLUTANT_MIN)?,
            pollutant_max: find(COL_POLLUTANT_MAX)?,
            pollutant_avg: find(COL_POLLUTANT_AVG)?,
            last_update: find(COL_LAST_UPDATE)?,
        })
    }
}

pub struct AqiReader {
    delimiter: u8,
}

impl AqiReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Read and classify every record of a CSV source. Either the whole
    /// file loads or an error is returned; no partial dataset escapes.
    pub fn read_dataset(&self, path: &Path) -> Result<Dataset> {
        let bytes = std::fs::read(path)?;
        let dataset = self.read_bytes(&bytes)?;

        info!(
            path = %path.display(),
            records = dataset.len(),
            "Loaded AQI dataset"
        );

        Ok(dataset)
    }

    /// Parse raw source bytes (UTF-8 with optional BOM, Windows-1252 fallback)
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        let text = decode_source(bytes);
        self.read_str(&text)
    }

    pub fn read_str(&self, text: &str) -> Result<Dataset> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let columns = ColumnIndex::from_headers(reader.headers()?)?;
        let mut records = Vec::new();

        for (row, result) in reader.records().enumerate() {
            let row_record = result?;
            let line = row_record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(row + 2);

            records.push(self.parse_record(&row_record, &columns, line)?);
        }

        Ok(Dataset::from_records(records))
    }

    /// Parse a single data row
    fn parse_record(
        &self,
        row: &StringRecord,
        columns: &ColumnIndex,
        line: usize,
    ) -> Result<AqiRecord> {
        let station = text_cell(row, columns.station)
            .ok_or_else(|| AqiError::parse(line, "Station is empty"))?;

        let raw_update = row.get(columns.last_update).unwrap_or("");
        let last_update = parse_timestamp(raw_update).map_err(|_| {
            AqiError::parse(line, format!("Invalid last_update: '{}'", raw_update))
        })?;

        AqiRecord::builder(station.clone(), last_update)
            .city(text_cell(row, columns.city))
            .state(text_cell(row, columns.state))
            .location(
                numeric_cell(row, columns.latitude, COL_LATITUDE, line)?,
                numeric_cell(row, columns.longitude, COL_LONGITUDE, line)?,
            )
            .pollutant_id(text_cell(row, columns.pollutant_id))
            .readings(
                numeric_cell(row, columns.pollutant_min, COL_POLLUTANT_MIN, line)?,
                numeric_cell(row, columns.pollutant_max, COL_POLLUTANT_MAX, line)?,
                numeric_cell(row, columns.pollutant_avg, COL_POLLUTANT_AVG, line)?,
            )
            .build()
            .map_err(|e| AqiError::parse(line, format!("Invalid record for '{}': {}", station, e)))
    }
}

impl Default for AqiReader {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_source(bytes: &[u8]) -> Cow<'_, str> {
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(bytes);
    if !had_errors {
        return text;
    }

    debug!("Source is not valid UTF-8, decoding as Windows-1252");
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text
}

fn is_missing_marker(cell: &str) -> bool {
    MISSING_MARKERS
        .iter()
        .any(|m| cell.trim().eq_ignore_ascii_case(m))
}

fn text_cell(row: &StringRecord, index: usize) -> Option<String> {
    row.get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn numeric_cell(
    row: &StringRecord,
    index: usize,
    column: &str,
    line: usize,
) -> Result<Option<f64>> {
    let cell = row.get(index).unwrap_or("");
    if is_missing_marker(cell) {
        return Ok(None);
    }

    let value = cell.trim().parse::<f64>().map_err(|_| {
        AqiError::parse(line, format!("Invalid {} value: '{}'", column, cell))
    })?;

    if value.is_nan() {
        return Ok(None);
    }
    if value.is_infinite() {
        return Err(AqiError::parse(
            line,
            format!("Non-finite {} value: '{}'", column, cell),
        ));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AqiCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "country,state,city,station,last_update,latitude,longitude,pollutant_id,pollutant_min,pollutant_max,pollutant_avg";

    #[test]
    fn test_read_open_data_layout() -> Result<()> {
        let text = format!(
            "{}\n\
            India,Delhi,Delhi,\"Anand Vihar, Delhi - DPCC\",21-02-2025 10:00:00,28.6469,77.3152,PM2.5,120,410,286\n\
            India,Karnataka,Hassan,\"Hassan, Karnataka - KSPCB\",21-02-2025 10:00:00,13.0,76.1,OZONE,5,30,12\n",
            HEADER
        );

        let dataset = AqiReader::new().read_str(&text)?;
        assert_eq!(dataset.len(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.station, "Anand Vihar, Delhi - DPCC");
        assert_eq!(first.state.as_deref(), Some("Delhi"));
        assert_eq!(first.pollutant_avg, Some(286.0));
        assert_eq!(first.aqi_category(), Some(AqiCategory::Hazardous));

        let second = &dataset.records()[1];
        assert_eq!(second.city.as_deref(), Some("Hassan"));
        assert_eq!(second.aqi_category(), Some(AqiCategory::Good));

        Ok(())
    }

    #[test]
    fn test_missing_markers_become_none() -> Result<()> {
        let text = format!(
            "{}\nIndia,Bihar,Patna,Station A,21-02-2025 10:00:00,NA,,NO2,NA,NA,NA\n",
            HEADER
        );

        let dataset = AqiReader::new().read_str(&text)?;
        let record = &dataset.records()[0];
        assert_eq!(record.latitude, None);
        assert_eq!(record.longitude, None);
        assert_eq!(record.pollutant_avg, None);
        assert_eq!(record.aqi_category(), None);

        Ok(())
    }

    #[test]
    fn test_missing_column_is_parse_error() {
        let text = "station,city,state,latitude,longitude,pollutant_id,pollutant_min,pollutant_max,last_update\n";
        let err = AqiReader::new().read_str(text).unwrap_err();

        assert!(err.is_parse_error());
        assert!(err.to_string().contains("pollutant_avg"));
    }

    #[test]
    fn test_bad_timestamp_reports_line() {
        let text = format!(
            "{}\n\
            India,Delhi,Delhi,S1,21-02-2025 10:00:00,28.6,77.3,CO,1,2,1.5\n\
            India,Delhi,Delhi,S2,not a date,28.6,77.3,CO,1,2,1.5\n",
            HEADER
        );

        match AqiReader::new().read_str(&text) {
            Err(AqiError::Parse { line, message }) => {
                assert_eq!(line, 3);
                assert!(message.contains("last_update"));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_number_is_parse_error() {
        let text = format!(
            "{}\nIndia,Delhi,Delhi,S1,21-02-2025 10:00:00,28.6,77.3,CO,1,2,high\n",
            HEADER
        );

        let err = AqiReader::new().read_str(&text).unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_nan_spellings_are_missing() -> Result<()> {
        let text = format!(
            "{}\n\
            India,MH,Pune,S1,21-02-2025 10:00:00,18.5,73.8,CO,1,50,40\n\
            India,MH,Pune,S2,21-02-2025 10:00:00,-nan,73.8,CO,+NaN,50,-nan\n",
            HEADER
        );

        let dataset = AqiReader::new().read_str(&text)?;
        let record = &dataset.records()[1];
        assert_eq!(record.latitude, None);
        assert_eq!(record.pollutant_min, None);
        assert_eq!(record.pollutant_avg, None);
        assert_eq!(record.aqi_category(), None);
        Ok(())
    }

    #[test]
    fn test_infinite_reading_is_parse_error() {
        for cell in ["inf", "-infinity", "1e400"] {
            let text = format!(
                "{}\nIndia,MH,Pune,S1,21-02-2025 10:00:00,18.5,73.8,CO,1,50,{}\n",
                HEADER, cell
            );

            match AqiReader::new().read_str(&text) {
                Err(AqiError::Parse { line, message }) => {
                    assert_eq!(line, 2);
                    assert!(message.contains("pollutant_avg"), "{}", message);
                }
                other => panic!("expected parse error for '{}', got {:?}", cell, other),
            }
        }
    }

    #[test]
    fn test_negative_reading_is_parse_error() {
        let text = format!(
            "{}\nIndia,Delhi,Delhi,S1,21-02-2025 10:00:00,28.6,77.3,CO,-4,2,1\n",
            HEADER
        );

        assert!(AqiReader::new().read_str(&text).is_err());
    }

    #[test]
    fn test_header_only_is_empty_dataset() -> Result<()> {
        let dataset = AqiReader::new().read_str(&format!("{}\n", HEADER))?;
        assert!(dataset.is_empty());
        Ok(())
    }

    #[test]
    fn test_bom_and_latin1_sources() -> Result<()> {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(
            format!(
                "{}\nIndia,Delhi,Delhi,S1,21-02-2025 10:00:00,28.6,77.3,CO,1,2,1.5\n",
                HEADER
            )
            .as_bytes(),
        );
        let dataset = AqiReader::new().read_bytes(&bytes)?;
        assert_eq!(dataset.len(), 1);

        let mut latin1 = format!("{}\nIndia,Delhi,Delhi,", HEADER).into_bytes();
        latin1.push(0xE9); // 'é' in Windows-1252
        latin1.extend_from_slice(b"cole,21-02-2025 10:00:00,28.6,77.3,CO,1,2,1.5\n");
        let dataset = AqiReader::new().read_bytes(&latin1)?;
        assert_eq!(dataset.records()[0].station, "\u{e9}cole");

        Ok(())
    }

    #[test]
    fn test_read_file_twice_is_identical() -> Result<()> {
        let mut temp_file = NamedTempFile::new()?;
        writeln!(temp_file, "{}", HEADER)?;
        writeln!(
            temp_file,
            "India,Odisha,Talcher,S1,21-02-2025 10:00:00,20.9,85.2,PM10,90,320,210"
        )?;

        let reader = AqiReader::new();
        let a = reader.read_dataset(temp_file.path())?;
        let b = reader.read_dataset(temp_file.path())?;
        assert_eq!(a, b);

        Ok(())
    }

    #[test]
    fn test_unreadable_file() {
        let result = AqiReader::new().read_dataset(Path::new("/definitely/not/here.csv"));
        assert!(matches!(result, Err(AqiError::Io(_))));
    }
}
