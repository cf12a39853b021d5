use crate::utils::constants::DEFAULT_EXPORT_FILE;
use std::path::{Path, PathBuf};

/// Default export path for the given extension, e.g. `AQI_filtered_data.parquet`
pub fn default_export_filename(extension: &str) -> PathBuf {
    Path::new(DEFAULT_EXPORT_FILE).with_extension(extension)
}

/// Keep the user's path but make sure it carries `extension`
pub fn ensure_extension(path: &Path, extension: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(extension) => path.to_path_buf(),
        _ => {
            let mut name = path.as_os_str().to_owned();
            name.push(".");
            name.push(extension);
            PathBuf::from(name)
        }
    }
}
