//! Report assembly: merges a statistics lookup and a geocoding lookup into one
//! [`Report`], and [`ReportService`] which runs a full report cycle.

use crate::api::{Geocoder, StatisticsSource};
use crate::error::{ResolveError, StatsError};
use crate::models::{Coordinate, CountryQuery, Metric, Outcome, Report, ReportField, StatisticsRecord};
use crate::resolver::resolve;
use log::info;

/// Combine lookup results into a report. Pure; performs no I/O.
///
/// Selected metrics always come out in [`Metric::ALL`] order. A failed
/// statistics lookup yields no fields and drops the coordinate.
pub fn assemble(
    query: CountryQuery,
    stats: Result<StatisticsRecord, StatsError>,
    coordinate: Option<Coordinate>,
    selected: &[Metric],
) -> Report {
    let record = match stats {
        Ok(record) => record,
        Err(e) => {
            let outcome = match e {
                StatsError::NoData => Outcome::NoData,
                StatsError::Transport { status } => Outcome::TransportError { status },
                StatsError::Request { reason } => Outcome::RequestFailed { reason },
            };
            return Report {
                query,
                fields: Vec::new(),
                coordinate: None,
                outcome,
            };
        }
    };

    let fields = Metric::ALL
        .into_iter()
        .filter(|m| selected.contains(m))
        .map(|metric| ReportField {
            metric,
            value: record.get(metric),
        })
        .collect();
    let outcome = match coordinate {
        Some(_) => Outcome::Success,
        None => Outcome::GeocodeMiss,
    };
    Report {
        query,
        fields,
        coordinate,
        outcome,
    }
}

/// The "generate report" action: resolve, look up statistics, locate, assemble.
#[derive(Debug, Clone)]
pub struct ReportService<S, G> {
    stats: S,
    geocoder: G,
}

impl<S, G> ReportService<S, G>
where
    S: StatisticsSource,
    G: Geocoder,
{
    pub fn new(stats: S, geocoder: G) -> Self {
        Self { stats, geocoder }
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    /// Run one report cycle.
    ///
    /// An empty identifier fails before any network call. The geocoder is only
    /// consulted once statistics were found.
    pub fn generate(
        &self,
        identifier: &str,
        is_code: bool,
        selected: &[Metric],
    ) -> Result<Report, ResolveError> {
        let query = resolve(identifier, is_code)?;
        let stats = self.stats.fetch_statistics(&query);
        let coordinate = match &stats {
            Ok(_) => self.geocoder.locate(&query),
            Err(_) => None,
        };
        let report = assemble(query, stats, coordinate, selected);
        info!(
            "report for {:?} (code: {}): {:?}",
            report.query.identifier(),
            report.query.is_code(),
            report.outcome
        );
        Ok(report)
    }
}
