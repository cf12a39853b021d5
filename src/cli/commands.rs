use crate::analyzers::{geo, numeric_columns, AggregationEngine, DatasetSummary};
use crate::cli::args::{Cli, Commands, ExportFormat, FilterArgs};
use crate::cli::display;
use crate::error::{AqiError, Result};
use crate::models::{Dataset, DatasetView};
use crate::processors::{FilterField, IntegrityChecker};
use crate::readers::DatasetCache;
use crate::settings::AppConfig;
use crate::utils::filename::{default_export_filename, ensure_extension};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvExporter, ExportColumn, ParquetWriter, StaticReport};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, Level};

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = AppConfig::load(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        settings.data_path = data;
    }
    debug!(?settings, "Settings resolved");

    let json_output = cli.json;

    match cli.command {
        // The report is served verbatim; the dataset is never loaded for it
        Commands::Report { output } => copy_report(&settings, output, json_output),
        Commands::Overview { head } => Session::open(&settings, json_output)?.overview(head),
        Commands::Stats { limit } => Session::open(&settings, json_output)?.stats(limit),
        Commands::Visual { filter } => Session::open(&settings, json_output)?.visual(&filter),
        Commands::Geo { filter, markers } => {
            Session::open(&settings, json_output)?.geo(&filter, markers)
        }
        Commands::Export {
            filter,
            columns,
            format,
            compression,
            output,
        } => Session::open(&settings, json_output)?.export(
            &filter,
            &columns,
            format,
            &compression,
            output.as_deref(),
        ),
        Commands::Validate => Session::open(&settings, json_output)?.validate(),
    }
}

/// A loaded dataset plus everything the dataset commands share
struct Session<'s> {
    settings: &'s AppConfig,
    engine: AggregationEngine,
    dataset: Arc<Dataset>,
    json_output: bool,
}

impl<'s> Session<'s> {
    fn open(settings: &'s AppConfig, json_output: bool) -> Result<Self> {
        let cache = DatasetCache::new();
        let dataset = load_dataset(&cache, &settings.data_path, json_output)?;
        Ok(Self::new(settings, dataset, json_output))
    }

    fn new(settings: &'s AppConfig, dataset: Arc<Dataset>, json_output: bool) -> Self {
        Self {
            settings,
            engine: AggregationEngine::with_alert_threshold(settings.alert_threshold),
            dataset,
            json_output,
        }
    }

    /// Banner for the whole dataset, shown ahead of every text report
    fn alert_banner(&self) -> Option<String> {
        let all = self.dataset.all();
        self.engine
            .alert_threshold_exceeded(&all)
            .then(|| display::alert_banner(self.engine.peak_reading(&all)))
    }

    fn print_alert_banner(&self) {
        if let Some(banner) = self.alert_banner() {
            println!("{}\n", banner);
        }
    }

    fn overview(&self, head: Option<usize>) -> Result<()> {
        let all = self.dataset.all();
        let head_rows = head.unwrap_or(self.settings.head_rows);
        let summary = DatasetSummary::from_view(&all);
        let missing = self.engine.missing_counts(&all);
        let distribution = self.engine.category_distribution(&all);
        let preview = all.head(head_rows);

        if self.json_output {
            return print_json(&json!({
                "alert": self.engine.alert_threshold_exceeded(&all),
                "peak": self.engine.peak_reading(&all),
                "head": preview,
                "summary": summary,
                "missing": missing,
                "category_distribution": distribution,
            }));
        }

        self.print_alert_banner();
        println!("Dataset Preview (first {} rows):", head_rows);
        print!("{}", display::format_records(&preview));
        println!("\n{}", summary.summary());
        println!("\nColumn Statistics:");
        print!("{}", display::format_box_stats(&summary.columns));
        println!("\nMissing Values:");
        print!("{}", display::format_missing_counts(&missing));
        println!("\nAQI Category Distribution:");
        print!("{}", display::format_distribution(&distribution));
        Ok(())
    }

    fn stats(&self, limit: Option<usize>) -> Result<()> {
        let all = self.dataset.all();
        let limit = limit.unwrap_or(self.settings.cleanest_limit);
        let correlation = self.engine.correlation_matrix(&all);
        let states = self.engine.state_averages(&all);
        let cleanest = self.engine.cleanest_cities(&all, limit);

        if self.json_output {
            return print_json(&json!({
                "correlation": correlation,
                "state_averages": states,
                "cleanest_cities": cleanest,
            }));
        }

        self.print_alert_banner();
        println!("Pollutant Correlation:");
        print!("{}", display::format_correlation(&correlation));
        println!("\nState-wise Average Pollution (highest first):");
        print!("{}", display::format_group_means(&states));
        println!("\nTop {} Cleanest Cities:", limit);
        print!("{}", display::format_group_means(&cleanest));
        Ok(())
    }

    fn visual(&self, filter: &FilterArgs) -> Result<()> {
        let all = self.dataset.all();
        let view = apply_filter(&all, filter);
        let columns = numeric_columns(&view);
        let histogram = self.engine.pollutant_type_histogram(&view);

        if self.json_output {
            return print_json(&json!({
                "records": view.len(),
                "box_stats": columns,
                "pollutant_types": histogram,
            }));
        }

        self.print_alert_banner();
        println!("{}", describe_selection(filter, &view));
        println!("\nPollution Levels:");
        print!("{}", display::format_box_stats(&columns));
        println!("\nPollutant Type Distribution:");
        print!("{}", display::format_histogram(&histogram));
        Ok(())
    }

    fn geo(&self, filter: &FilterArgs, markers: usize) -> Result<()> {
        let all = self.dataset.all();
        let view = apply_filter(&all, filter);
        let center = geo::map_center(&view);
        let bounds = geo::geographic_bounds(&view);
        let heat = geo::heat_points(&view);
        let stations = geo::station_markers(&view);
        let shown = &stations[..markers.min(stations.len())];

        if self.json_output {
            return print_json(&json!({
                "center": center,
                "bounds": bounds,
                "heat_points": heat,
                "markers": shown,
            }));
        }

        self.print_alert_banner();
        println!("{}", describe_selection(filter, &view));
        match center {
            Some((lat, lon)) => println!("Map centre: ({:.4}, {:.4})", lat, lon),
            None => println!("Map centre: no coordinates in selection"),
        }
        if let Some(b) = bounds {
            println!(
                "Bounds: {:.2}°N to {:.2}°N, {:.2}°E to {:.2}°E",
                b.min_lat, b.max_lat, b.min_lon, b.max_lon
            );
        }
        println!("Heat points: {}", heat.len());
        println!(
            "\nStation Markers (showing {} of {}):",
            shown.len(),
            stations.len()
        );
        print!("{}", display::format_markers(shown));
        Ok(())
    }

    fn export(
        &self,
        filter: &FilterArgs,
        columns: &[String],
        format: ExportFormat,
        compression: &str,
        output: Option<&Path>,
    ) -> Result<()> {
        let all = self.dataset.all();
        let view = apply_filter(&all, filter);
        let selected = ExportColumn::parse_selection(columns)?;
        let path = export_path(output, format);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file_info = match format {
            ExportFormat::Csv => {
                CsvExporter::with_columns(selected).write_to_path(&view, &path)?;
                None
            }
            ExportFormat::Parquet => {
                let writer = ParquetWriter::new()
                    .with_compression(compression)?
                    .with_columns(selected);
                writer.write_view(&view, &path)?;
                Some(writer.get_file_info(&path)?)
            }
        };

        if self.json_output {
            return print_json(&json!({
                "path": path,
                "records": view.len(),
                "format": format.extension(),
            }));
        }

        self.print_alert_banner();
        println!("Exported {} records to {}", view.len(), path.display());
        if let Some(info) = file_info {
            println!("\n{}", info.summary());
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let checker = IntegrityChecker::new();
        let report = checker.check_integrity(&self.dataset.all());

        if self.json_output {
            return print_json(&report);
        }

        self.print_alert_banner();
        println!("{}", checker.generate_summary(&report));
        if report.reading_violations.is_empty() {
            println!("✅ All readings passed relationship checks");
        } else {
            println!(
                "⚠️  Found {} reading violations",
                report.reading_violations.len()
            );
        }
        Ok(())
    }
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt().with_max_level(level);

    let installed = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    installed.map_err(|e| AqiError::Config(format!("Failed to initialise logging: {}", e)))
}

fn load_dataset(cache: &DatasetCache, path: &Path, silent: bool) -> Result<Arc<Dataset>> {
    let progress = ProgressReporter::new_spinner(
        &format!("Loading {}...", path.display()),
        silent,
    );

    match cache.get_or_load(path) {
        Ok(dataset) => {
            progress.finish_and_clear();
            Ok(dataset)
        }
        Err(e) => {
            progress.finish_with_message("Load failed");
            Err(e)
        }
    }
}

fn apply_filter<'a>(view: &DatasetView<'a>, filter: &FilterArgs) -> DatasetView<'a> {
    let field = FilterField::from(filter.by);
    let filtered = view.filter_by(field, &filter.select);
    debug!(
        field = %field,
        selected = filter.select.len(),
        records = filtered.len(),
        "Applied filter"
    );
    filtered
}

fn describe_selection(filter: &FilterArgs, view: &DatasetView<'_>) -> String {
    if filter.select.is_empty() {
        format!("All records ({})", view.len())
    } else {
        format!(
            "{} in [{}] ({} records)",
            FilterField::from(filter.by),
            filter.select.join(", "),
            view.len()
        )
    }
}

fn export_path(output: Option<&Path>, format: ExportFormat) -> PathBuf {
    match output {
        Some(path) => ensure_extension(path, format.extension()),
        None => default_export_filename(format.extension()),
    }
}

fn copy_report(settings: &AppConfig, output: Option<PathBuf>, json_output: bool) -> Result<()> {
    let report = StaticReport::new(&settings.report_path);
    let destination = match output {
        Some(path) => path,
        None => PathBuf::from(report.file_name().unwrap_or("report.pdf")),
    };

    let bytes = report.copy_to(&destination)?;

    if json_output {
        return print_json(&json!({ "path": destination, "bytes": bytes }));
    }
    println!(
        "Copied report {} to {} ({} bytes)",
        report.path().display(),
        destination.display(),
        bytes
    );
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::FilterBy;
    use crate::models::AqiRecord;
    use chrono::NaiveDate;

    fn dataset_with_averages(averages: &[f64]) -> Arc<Dataset> {
        let ts = NaiveDate::from_ymd_opt(2025, 2, 21)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let records = averages
            .iter()
            .enumerate()
            .map(|(i, avg)| {
                AqiRecord::builder(format!("Station {}", i), ts)
                    .state(Some("Delhi".to_string()))
                    .readings(Some(0.0), Some(500.0), Some(*avg))
                    .build()
                    .unwrap()
            })
            .collect();
        Arc::new(Dataset::from_records(records))
    }

    #[test]
    fn test_alert_banner_follows_whole_dataset() {
        let settings = AppConfig::default();

        let polluted = Session::new(&settings, dataset_with_averages(&[40.0, 240.0]), false);
        let banner = polluted.alert_banner().unwrap();
        assert!(banner.contains("High pollution levels detected"));
        assert!(banner.contains("Station 1"));

        let clean = Session::new(&settings, dataset_with_averages(&[40.0, 200.0]), false);
        assert_eq!(clean.alert_banner(), None);

        let empty = Session::new(&settings, Arc::new(Dataset::default()), false);
        assert_eq!(empty.alert_banner(), None);
    }

    #[test]
    fn test_alert_banner_uses_configured_threshold() {
        let settings = AppConfig {
            alert_threshold: 30.0,
            ..AppConfig::default()
        };
        let session = Session::new(&settings, dataset_with_averages(&[40.0]), false);
        assert!(session.alert_banner().is_some());
    }

    #[test]
    fn test_export_path_defaults_and_extensions() {
        assert_eq!(
            export_path(None, ExportFormat::Csv),
            PathBuf::from("AQI_filtered_data.csv")
        );
        assert_eq!(
            export_path(None, ExportFormat::Parquet),
            PathBuf::from("AQI_filtered_data.parquet")
        );
        assert_eq!(
            export_path(Some(Path::new("out/delhi")), ExportFormat::Csv),
            PathBuf::from("out/delhi.csv")
        );
    }

    #[test]
    fn test_describe_selection() {
        let dataset = Dataset::default();
        let all = dataset.all();
        let filter = FilterArgs {
            by: FilterBy::City,
            select: vec!["Delhi".to_string(), "Pune".to_string()],
        };
        assert_eq!(
            describe_selection(&filter, &all),
            "city in [Delhi, Pune] (0 records)"
        );

        let everything = FilterArgs {
            by: FilterBy::State,
            select: Vec::new(),
        };
        assert_eq!(describe_selection(&everything, &all), "All records (0)");
    }
}
