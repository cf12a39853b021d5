use crate::error::Result;
use crate::models::DatasetView;
use crate::writers::ExportColumn;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Writes a view as CSV with a chosen subset of columns
pub struct CsvExporter {
    columns: Vec<ExportColumn>,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self {
            columns: ExportColumn::ALL.to_vec(),
        }
    }

    /// Column order follows `columns`; an empty list keeps every column
    pub fn with_columns(columns: Vec<ExportColumn>) -> Self {
        if columns.is_empty() {
            Self::new()
        } else {
            Self { columns }
        }
    }

    pub fn columns(&self) -> &[ExportColumn] {
        &self.columns
    }

    pub fn write_view<W: Write>(&self, view: &DatasetView<'_>, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(self.columns.iter().map(|c| c.name()))?;

        for record in view.records() {
            csv_writer.write_record(
                self.columns
                    .iter()
                    .map(|c| c.text_value(record).unwrap_or_default()),
            )?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_bytes(&self, view: &DatasetView<'_>) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_view(view, &mut buffer)?;
        Ok(buffer)
    }

    pub fn write_to_path(&self, view: &DatasetView<'_>, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        self.write_view(view, file)?;

        info!(
            path = %path.display(),
            records = view.len(),
            columns = self.columns.len(),
            "Exported CSV"
        );
        Ok(())
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}
