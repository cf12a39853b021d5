use crate::error::{AqiError, Result};
use crate::models::{AqiRecord, DatasetView};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use crate::writers::ExportColumn;
use arrow::array::{ArrayRef, Float64Array, StringArray, TimestampMillisecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
    columns: Vec<ExportColumn>,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
            columns: ExportColumn::ALL.to_vec(),
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(AqiError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// An empty list keeps every column
    pub fn with_columns(mut self, columns: Vec<ExportColumn>) -> Self {
        if !columns.is_empty() {
            self.columns = columns;
        }
        self
    }

    /// Write the view's records, one Arrow column per selected export column
    pub fn write_view(&self, view: &DatasetView<'_>, path: &Path) -> Result<()> {
        let records: Vec<&AqiRecord> = view.records().collect();
        let schema = self.create_schema();
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let file = File::create(path)?;
        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

        for chunk in records.chunks(self.row_group_size.max(1)) {
            let batch = self.records_to_batch(chunk, schema.clone())?;
            writer.write(&batch)?;
        }

        writer.close()?;

        info!(
            path = %path.display(),
            records = records.len(),
            "Exported Parquet"
        );
        Ok(())
    }

    fn create_schema(&self) -> Arc<Schema> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|column| {
                let data_type = match column {
                    ExportColumn::LastUpdate => DataType::Timestamp(TimeUnit::Millisecond, None),
                    c if c.is_numeric() => DataType::Float64,
                    _ => DataType::Utf8,
                };
                let nullable = !matches!(column, ExportColumn::Station | ExportColumn::LastUpdate);
                Field::new(column.name(), data_type, nullable)
            })
            .collect();

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(&self, records: &[&AqiRecord], schema: Arc<Schema>) -> Result<RecordBatch> {
        let arrays: Vec<ArrayRef> = self
            .columns
            .iter()
            .map(|column| -> ArrayRef {
                match column {
                    ExportColumn::LastUpdate => Arc::new(TimestampMillisecondArray::from(
                        records
                            .iter()
                            .map(|r| r.last_update.and_utc().timestamp_millis())
                            .collect::<Vec<i64>>(),
                    )),
                    c if c.is_numeric() => Arc::new(Float64Array::from(
                        records
                            .iter()
                            .map(|r| c.numeric_value(r))
                            .collect::<Vec<Option<f64>>>(),
                    )),
                    c => Arc::new(StringArray::from(
                        records
                            .iter()
                            .map(|r| c.text_value(r))
                            .collect::<Vec<Option<String>>>(),
                    )),
                }
            })
            .collect();

        Ok(RecordBatch::try_new(schema, arrays)?)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let row_groups = metadata.num_row_groups();
        let total_rows = metadata.file_metadata().num_rows();
        let file_size = std::fs::metadata(path)?.len();

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            columns: metadata.file_metadata().schema_descr().num_columns(),
            file_size,
            compression: self.compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub columns: usize,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Columns: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} KB\n\
            - Compression: {:?}",
            self.total_rows,
            self.columns,
            self.row_groups,
            self.file_size as f64 / 1024.0,
            self.compression,
        )
    }
}
