use thiserror::Error;

pub type Result<T> = std::result::Result<T, AqiError>;

#[derive(Error, Debug)]
pub enum AqiError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AqiError {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        AqiError::Parse {
            line,
            message: message.into(),
        }
    }

    /// True for failures caused by the content of the source rather than by I/O.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            AqiError::Parse { .. }
                | AqiError::Csv(_)
                | AqiError::DateParse(_)
                | AqiError::Validation(_)
        )
    }
}

impl From<config::ConfigError> for AqiError {
    fn from(err: config::ConfigError) -> Self {
        AqiError::Config(err.to_string())
    }
}
