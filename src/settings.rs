use crate::error::{AqiError, Result};
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Settings layered as defaults, then a TOML file, then `AQI_*` variables.
/// Command-line flags are applied on top by the caller.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub report_path: PathBuf,
    pub alert_threshold: f64,
    pub cleanest_limit: usize,
    pub head_rows: usize,
}

impl AppConfig {
    /// Load settings. With no explicit file, `aqi-processor.toml` in the
    /// working directory is read when present.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("data_path", DEFAULT_DATA_FILE)?
            .set_default("report_path", DEFAULT_REPORT_FILE)?
            .set_default("alert_threshold", DEFAULT_ALERT_THRESHOLD)?
            .set_default("cleanest_limit", DEFAULT_CLEANEST_LIMIT as i64)?
            .set_default("head_rows", DEFAULT_HEAD_ROWS as i64)?;

        let builder = match config_file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        let config: AppConfig = builder
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.alert_threshold.is_finite() || self.alert_threshold < 0.0 {
            return Err(AqiError::Config(format!(
                "alert_threshold must be a non-negative number, got {}",
                self.alert_threshold
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            report_path: PathBuf::from(DEFAULT_REPORT_FILE),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            cleanest_limit: DEFAULT_CLEANEST_LIMIT,
            head_rows: DEFAULT_HEAD_ROWS,
        }
    }
}
