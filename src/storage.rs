use crate::format::outcome_message;
use crate::models::{Report, UNAVAILABLE_TEXT};
use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Save a report as CSV: one header row and one data row.
///
/// Columns: `country`, `is_code`, `outcome`, one column per displayed metric
/// (labelled as in the table), `latitude`, `longitude`.
pub fn save_report_csv<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let mut header = vec!["country", "is_code", "outcome"];
    header.extend(report.fields.iter().map(|f| f.metric.label()));
    header.extend(["latitude", "longitude"]);
    wtr.write_record(&header)?;

    let mut row = vec![
        report.query.identifier().to_string(),
        report.query.is_code().to_string(),
        outcome_message(&report.outcome),
    ];
    row.extend(report.fields.iter().map(|f| match f.value.count() {
        Some(n) => n.to_string(),
        None => UNAVAILABLE_TEXT.to_string(),
    }));
    match report.coordinate {
        Some(c) => row.extend([c.latitude.to_string(), c.longitude.to_string()]),
        None => row.extend([String::new(), String::new()]),
    }
    wtr.write_record(&row)?;
    wtr.flush()?;
    Ok(())
}

/// Save a report as pretty JSON.
pub fn save_report_json<P: AsRef<Path>>(report: &Report, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(report)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Metric, MetricValue, StatisticsRecord};
    use crate::report::assemble;
    use crate::resolver::resolve;
    use tempfile::tempdir;

    fn sample() -> Report {
        let rec = StatisticsRecord::new(
            "IT",
            MetricValue::Count(100),
            MetricValue::Count(5000),
            MetricValue::Unavailable,
            MetricValue::Count(0),
        );
        assemble(
            resolve("IT", true).unwrap(),
            Ok(rec),
            Some(Coordinate::new(42.5, 12.5)),
            &Metric::ALL,
        )
    }

    #[test]
    fn csv_has_selected_columns_and_sentinel() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("report.csv");
        save_report_csv(&sample(), &p).unwrap();
        let text = std::fs::read_to_string(&p).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "country,is_code,outcome,Number of deaths,Number of confirmed cases,Number of recovered cases,Number of critical cases,latitude,longitude"
        );
        assert_eq!(
            lines.next().unwrap(),
            "IT,true,Success!,100,5000,Data not available,0,42.5,12.5"
        );
    }

    #[test]
    fn json_keeps_sentinel_and_outcome_tag() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("report.json");
        save_report_json(&sample(), &p).unwrap();
        let v: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&p).unwrap()).unwrap();
        assert_eq!(v["outcome"]["kind"], "success");
        assert_eq!(v["query"]["identifier"], "IT");
        assert_eq!(v["fields"][0]["metric"], "deaths");
        assert_eq!(v["fields"][0]["value"], 100);
        assert_eq!(v["fields"][2]["value"], "Data not available");
        assert_eq!(v["coordinate"]["latitude"], 42.5);
    }
}
