use crate::processors::FilterField;
use crate::utils::constants::COMPRESSION_SNAPPY;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aqi-processor")]
#[command(about = "Air quality index explorer for Indian monitoring stations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "AQI dataset CSV [default: AQI.csv]")]
    pub data: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dataset preview, summary, missing values and AQI category distribution
    Overview {
        #[arg(long, help = "Rows to preview [default: from settings]")]
        head: Option<usize>,
    },

    /// Correlations, state-wise averages and the cleanest cities
    Stats {
        #[arg(short, long, help = "Cleanest cities to list [default: from settings]")]
        limit: Option<usize>,
    },

    /// Reading distribution and pollutant types for a state or city selection
    Visual {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Map centre, heat points and station markers
    Geo {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(long, default_value = "10", help = "Station markers to list")]
        markers: usize,
    },

    /// Export a filtered selection to CSV or Parquet
    Export {
        #[command(flatten)]
        filter: FilterArgs,

        #[arg(
            short,
            long = "columns",
            value_delimiter = ',',
            help = "Columns to export, in order [default: all]"
        )]
        columns: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        #[arg(long, default_value = COMPRESSION_SNAPPY, help = "Parquet compression")]
        compression: String,

        #[arg(
            short,
            long,
            help = "Output path [default: AQI_filtered_data.{csv,parquet}]"
        )]
        output: Option<PathBuf>,
    },

    /// Copy the prebuilt air quality report
    Report {
        #[arg(short, long, help = "Destination path [default: report file name]")]
        output: Option<PathBuf>,
    },

    /// Check reading relationships and completeness
    Validate,
}

#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long, value_enum, default_value_t = FilterBy::State, help = "Field to filter on")]
    pub by: FilterBy,

    #[arg(
        short,
        long = "select",
        help = "Value to keep; repeat for several [default: all records]"
    )]
    pub select: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterBy {
    State,
    City,
}

impl From<FilterBy> for FilterField {
    fn from(by: FilterBy) -> Self {
        match by {
            FilterBy::State => FilterField::State,
            FilterBy::City => FilterField::City,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Parquet => "parquet",
        }
    }
}
