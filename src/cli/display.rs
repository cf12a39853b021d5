//! Text rendering for terminal output. Decorative glyphs live here only;
//! the library hands out plain [`AqiCategory`] values.

use crate::analyzers::{
    CategoryDistribution, ColumnStats, CorrelationMatrix, GroupMean, MissingCount, StationMarker,
};
use crate::models::{AqiCategory, AqiRecord};
use std::collections::BTreeMap;

pub fn category_glyph(category: AqiCategory) -> &'static str {
    match category {
        AqiCategory::Good => "🟢",
        AqiCategory::Moderate => "🟡",
        AqiCategory::UnhealthySensitive => "🟠",
        AqiCategory::Unhealthy => "🔴",
        AqiCategory::Hazardous => "☠️",
    }
}

pub fn category_badge(category: Option<AqiCategory>) -> String {
    match category {
        Some(c) => format!("{} {}", category_glyph(c), c.label()),
        None => "Uncategorized".to_string(),
    }
}

pub fn alert_banner(peak: Option<&AqiRecord>) -> String {
    let mut banner =
        "🚨 High pollution levels detected! Consider wearing a mask outdoors.".to_string();
    if let Some(record) = peak {
        banner.push_str(&format!(
            "\n   Peak: {} at {}",
            fmt_opt(record.pollutant_avg),
            record.station
        ));
    }
    banner
}

pub fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}", v))
}

pub fn format_records(records: &[&AqiRecord]) -> String {
    let mut out = format!(
        "{:<36} {:<16} {:<18} {:<8} {:>7} {:>7} {:>7}  {}\n",
        "station", "city", "state", "pollut.", "min", "max", "avg", "category"
    );
    for r in records {
        out.push_str(&format!(
            "{:<36} {:<16} {:<18} {:<8} {:>7} {:>7} {:>7}  {}\n",
            truncate(&r.station, 36),
            truncate(r.city.as_deref().unwrap_or("-"), 16),
            truncate(r.state.as_deref().unwrap_or("-"), 18),
            r.pollutant_id.as_deref().unwrap_or("-"),
            fmt_opt(r.pollutant_min),
            fmt_opt(r.pollutant_max),
            fmt_opt(r.pollutant_avg),
            category_badge(r.aqi_category())
        ));
    }
    out
}

pub fn format_missing_counts(counts: &[MissingCount]) -> String {
    counts
        .iter()
        .map(|c| format!("  {:<16} {:>6}\n", c.column, c.missing))
        .collect()
}

pub fn format_distribution(distribution: &CategoryDistribution) -> String {
    if distribution.is_empty() {
        return "  (no categorized records)\n".to_string();
    }
    distribution
        .iter()
        .map(|(category, count)| {
            format!("  {:<28} {:>6}\n", category_badge(Some(*category)), count)
        })
        .collect()
}

pub fn format_correlation(matrix: &CorrelationMatrix) -> String {
    let mut out = format!("  {:<14}", "");
    for name in matrix.columns {
        out.push_str(&format!("{:>15}", name));
    }
    out.push('\n');

    for (name, row) in matrix.columns.iter().zip(matrix.values.iter()) {
        out.push_str(&format!("  {:<14}", name));
        for value in row {
            out.push_str(&format!("{:>15.3}", value));
        }
        out.push('\n');
    }
    out
}

pub fn format_group_means(means: &[GroupMean]) -> String {
    if means.is_empty() {
        return "  (no data)\n".to_string();
    }
    means
        .iter()
        .enumerate()
        .map(|(i, g)| {
            format!(
                "  {:>3}. {:<28} {:>8.2}  ({} readings)\n",
                i + 1,
                g.name,
                g.mean,
                g.count
            )
        })
        .collect()
}

pub fn format_box_stats(columns: &[ColumnStats]) -> String {
    let mut out = format!(
        "  {:<14} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
        "column", "count", "min", "25%", "50%", "75%", "max"
    );
    for c in columns {
        out.push_str(&format!(
            "  {:<14} {:>7} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}\n",
            c.column, c.count, c.min, c.q25, c.median, c.q75, c.max
        ));
    }
    out
}

pub fn format_histogram(histogram: &BTreeMap<String, usize>) -> String {
    let widest = histogram.values().copied().max().unwrap_or(0);
    histogram
        .iter()
        .map(|(name, count)| {
            let bar_len = if widest == 0 { 0 } else { count * 40 / widest };
            format!("  {:<10} {:>6} {}\n", name, count, "█".repeat(bar_len))
        })
        .collect()
}

pub fn format_markers(markers: &[StationMarker]) -> String {
    markers
        .iter()
        .map(|m| {
            format!(
                "  {:<40} ({:>8.4}, {:>8.4})  AQI: {:>6}  {}\n",
                truncate(&m.station, 40),
                m.latitude,
                m.longitude,
                fmt_opt(m.pollutant_avg),
                category_badge(m.category)
            )
        })
        .collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
