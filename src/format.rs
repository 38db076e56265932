//! Text rendering for reports, tables and chart axes.

use crate::models::{MetricValue, Outcome, Report, UNAVAILABLE_TEXT};
use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale`.
/// Supported tags (case-insensitive): "en", "us", "en_US", "de", "de_DE", "german", "fr", "es", "it", "pt", "nl"
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// `5000` -> `5,000` (en) or `5.000` (de).
pub fn format_count(n: u64, locale_tag: &str) -> String {
    n.to_formatted_string(map_locale(locale_tag))
}

/// Render a metric cell. The sentinel never looks like a number.
pub fn format_value(v: MetricValue, locale_tag: &str) -> String {
    match v {
        MetricValue::Count(n) => format_count(n, locale_tag),
        MetricValue::Unavailable => UNAVAILABLE_TEXT.to_string(),
    }
}

/// Compact axis label: `1.2M`, `45.0K`, or the plain integer below a thousand.
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value.round() as i64)
    }
}

/// The message a user sees for an outcome.
pub fn outcome_message(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success => "Success!".to_string(),
        Outcome::NoData => "No data available".to_string(),
        Outcome::TransportError { status } => format!("Failed to retrieve data: {}", status),
        Outcome::RequestFailed { reason } => format!("Failed to retrieve data: {}", reason),
        Outcome::GeocodeMiss => "Could not find the location.".to_string(),
    }
}

/// `(label, value)` rows for the displayed metrics, in report order.
pub fn report_rows(report: &Report, locale_tag: &str) -> Vec<(&'static str, String)> {
    report
        .fields
        .iter()
        .map(|f| (f.metric.label(), format_value(f.value, locale_tag)))
        .collect()
}

/// Plain-text report: heading, aligned metric table, position and map link.
pub fn report_lines(report: &Report, locale_tag: &str) -> Vec<String> {
    let mut out = Vec::new();
    if !report.outcome.has_statistics() {
        out.push(outcome_message(&report.outcome));
        return out;
    }

    out.push(format!("COVID-19 Report for {}:", report.query.identifier()));
    let rows = report_rows(report, locale_tag);
    let width = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    for (label, value) in rows {
        out.push(format!("  {:<width$}  {}", label, value, width = width));
    }
    match report.coordinate {
        Some(c) => {
            out.push(format!("Location: {}", c));
            out.push(format!("Map: {}", c.map_url()));
        }
        None => out.push(outcome_message(&Outcome::GeocodeMiss)),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Metric, StatisticsRecord};
    use crate::report::assemble;
    use crate::resolver::resolve;

    #[test]
    fn counts_use_locale_separators() {
        assert_eq!(format_count(111_820_082, "en"), "111,820,082");
        assert_eq!(format_count(5000, "de"), "5.000");
        assert_eq!(format_count(0, "en"), "0");
    }

    #[test]
    fn sentinel_differs_from_zero() {
        assert_eq!(format_value(MetricValue::Count(0), "en"), "0");
        assert_eq!(format_value(MetricValue::Unavailable, "en"), "Data not available");
    }

    #[test]
    fn compact_axis_labels() {
        assert_eq!(format_compact(111_820_082.0), "111.8M");
        assert_eq!(format_compact(1_500.0), "1.5K");
        assert_eq!(format_compact(999.0), "999");
        assert_eq!(format_compact(0.0), "0");
    }

    #[test]
    fn outcome_messages() {
        assert_eq!(
            outcome_message(&Outcome::TransportError { status: 404 }),
            "Failed to retrieve data: 404"
        );
        assert_eq!(outcome_message(&Outcome::NoData), "No data available");
    }

    #[test]
    fn report_lines_show_table_and_map() {
        let rec = StatisticsRecord::new(
            "IT",
            MetricValue::Count(100),
            MetricValue::Count(5000),
            MetricValue::Unavailable,
            MetricValue::Unavailable,
        );
        let q = resolve("IT", true).unwrap();
        let r = assemble(
            q,
            Ok(rec),
            Some(Coordinate::new(42.5, 12.5)),
            &[Metric::Deaths, Metric::Confirmed, Metric::Recovered],
        );
        let lines = report_lines(&r, "en");
        assert_eq!(lines[0], "COVID-19 Report for IT:");
        assert!(lines[1].contains("Number of deaths") && lines[1].ends_with("100"));
        assert!(lines[2].ends_with("5,000"));
        assert!(lines[3].ends_with("Data not available"));
        assert!(lines.iter().any(|l| l.starts_with("Map: https://www.openstreetmap.org/")));
    }
}
