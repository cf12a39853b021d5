pub mod columns;
pub mod csv_writer;
pub mod parquet_writer;
pub mod report_file;

pub use columns::ExportColumn;
pub use csv_writer::CsvExporter;
pub use parquet_writer::{ParquetFileInfo, ParquetWriter};
pub use report_file::StaticReport;
