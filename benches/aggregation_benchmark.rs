use aqi_processor::analyzers::{AggregationEngine, DatasetSummary};
use aqi_processor::processors::{FilterField, IntegrityChecker};
use aqi_processor::readers::AqiReader;
use aqi_processor::writers::CsvExporter;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const STATES: [&str; 6] = [
    "Delhi",
    "Maharashtra",
    "Kerala",
    "Uttar Pradesh",
    "Karnataka",
    "West Bengal",
];
const POLLUTANTS: [&str; 7] = ["PM2.5", "PM10", "NO2", "SO2", "CO", "OZONE", "NH3"];

// Synthetic open-data CSV: a few cities per state, several stations per city
fn create_test_csv(stations: usize) -> String {
    let mut csv = String::from(
        "country,state,city,station,last_update,latitude,longitude,pollutant_id,pollutant_min,pollutant_max,pollutant_avg\n",
    );

    for station in 0..stations {
        let state = STATES[station % STATES.len()];
        let city = format!("{} City {}", state, station % 4);
        let lat = 8.0 + (station % 300) as f64 * 0.09;
        let lon = 68.0 + (station % 280) as f64 * 0.1;

        for (p, pollutant) in POLLUTANTS.iter().enumerate() {
            let base = ((station * 7 + p * 13) % 320) as f64;
            // Every eleventh reading is missing, as in the published feed
            let (min, max, avg) = if (station + p) % 11 == 0 {
                ("NA".to_string(), "NA".to_string(), "NA".to_string())
            } else {
                (
                    format!("{:.0}", base * 0.5),
                    format!("{:.0}", base * 1.5 + 10.0),
                    format!("{:.0}", base),
                )
            };
            csv.push_str(&format!(
                "India,{},{},Station {} - {},21-02-2025 10:00:00,{:.6},{:.6},{},{},{},{}\n",
                state, city, station, city, lat, lon, pollutant, min, max, avg
            ));
        }
    }

    csv
}

fn benchmark_load(c: &mut Criterion) {
    let csv = create_test_csv(500);
    let reader = AqiReader::new();

    c.bench_function("load_dataset", |b| {
        b.iter(|| {
            let dataset = reader.read_str(black_box(&csv)).unwrap();
            black_box(dataset.len())
        })
    });
}

fn benchmark_filter(c: &mut Criterion) {
    let dataset = AqiReader::new().read_str(&create_test_csv(500)).unwrap();
    let selected = ["Delhi", "Kerala"];

    c.bench_function("filter_by_state", |b| {
        b.iter(|| {
            let view = dataset.filter_by(FilterField::State, &selected);
            black_box(view.len())
        })
    });
}

fn benchmark_aggregations(c: &mut Criterion) {
    let dataset = AqiReader::new().read_str(&create_test_csv(500)).unwrap();
    let engine = AggregationEngine::new();
    let all = dataset.all();

    c.bench_function("category_distribution", |b| {
        b.iter(|| black_box(engine.category_distribution(&all).len()))
    });

    c.bench_function("correlation_matrix", |b| {
        b.iter(|| black_box(engine.correlation_matrix(&all).get(0, 2)))
    });

    c.bench_function("state_averages", |b| {
        b.iter(|| black_box(engine.state_averages(&all).len()))
    });

    c.bench_function("dataset_summary", |b| {
        b.iter(|| black_box(DatasetSummary::from_view(&all).total_records))
    });

    c.bench_function("integrity_checker", |b| {
        b.iter(|| {
            let checker = IntegrityChecker::new();
            black_box(checker.check_integrity(&all).total_records)
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation_by_size");

    for &size in &[50, 200, 1000] {
        let dataset = AqiReader::new().read_str(&create_test_csv(size)).unwrap();

        group.bench_with_input(BenchmarkId::new("stations", size), &dataset, |b, dataset| {
            let engine = AggregationEngine::new();
            b.iter(|| {
                let all = dataset.all();
                let states = engine.state_averages(&all);
                let cleanest = engine.cleanest_cities(&all, 5);
                black_box((states.len(), cleanest.len(), engine.alert_threshold_exceeded(&all)))
            })
        });
    }

    group.finish();
}

fn benchmark_csv_export(c: &mut Criterion) {
    let dataset = AqiReader::new().read_str(&create_test_csv(200)).unwrap();
    let exporter = CsvExporter::new();

    c.bench_function("csv_export", |b| {
        b.iter(|| black_box(exporter.to_bytes(&dataset.all()).unwrap().len()))
    });
}

criterion_group!(
    benches,
    benchmark_load,
    benchmark_filter,
    benchmark_aggregations,
    benchmark_varying_data_sizes,
    benchmark_csv_export
);
criterion_main!(benches);
