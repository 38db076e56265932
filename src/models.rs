use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Sentinel text for a metric the statistics service did not return.
pub const UNAVAILABLE_TEXT: &str = "Data not available";

/// A validated country lookup. Built by [`crate::resolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryQuery {
    pub(crate) identifier: String,
    pub(crate) is_code: bool,
}

impl CountryQuery {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// `true` when the identifier is a short country code ("IT", "USA") rather than a name.
    pub fn is_code(&self) -> bool {
        self.is_code
    }
}

/// The four metrics a report can show, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Deaths,
    Confirmed,
    Recovered,
    Critical,
}

impl Metric {
    /// Fixed display order.
    pub const ALL: [Metric; 4] = [
        Metric::Deaths,
        Metric::Confirmed,
        Metric::Recovered,
        Metric::Critical,
    ];

    /// Field name in the statistics payload.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Deaths => "deaths",
            Metric::Confirmed => "confirmed",
            Metric::Recovered => "recovered",
            Metric::Critical => "critical",
        }
    }

    /// Column header shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Deaths => "Number of deaths",
            Metric::Confirmed => "Number of confirmed cases",
            Metric::Recovered => "Number of recovered cases",
            Metric::Critical => "Number of critical cases",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Metric {
    type Err = String;

    /// Accepts the payload key (`deaths`) or the display label (`Number of deaths`), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Metric::ALL
            .into_iter()
            .find(|m| needle.eq_ignore_ascii_case(m.key()) || needle.eq_ignore_ascii_case(m.label()))
            .ok_or_else(|| {
                format!(
                    "unknown metric {:?} (expected one of deaths, confirmed, recovered, critical)",
                    s
                )
            })
    }
}

/// A metric count, or the explicit sentinel when the service omitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricValue {
    Count(u64),
    Unavailable,
}

impl MetricValue {
    /// Interpret one payload field. Absent, `null`, negative, fractional and
    /// non-numeric values all become [`MetricValue::Unavailable`].
    pub fn from_json(v: Option<&Value>) -> Self {
        match v {
            Some(Value::Number(n)) => {
                if let Some(u) = n.as_u64() {
                    MetricValue::Count(u)
                } else {
                    match n.as_f64() {
                        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => {
                            MetricValue::Count(f as u64)
                        }
                        _ => MetricValue::Unavailable,
                    }
                }
            }
            Some(Value::String(s)) => s
                .trim()
                .parse::<u64>()
                .map(MetricValue::Count)
                .unwrap_or(MetricValue::Unavailable),
            _ => MetricValue::Unavailable,
        }
    }

    pub fn count(self) -> Option<u64> {
        match self {
            MetricValue::Count(n) => Some(n),
            MetricValue::Unavailable => None,
        }
    }
}

impl Serialize for MetricValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            MetricValue::Count(n) => serializer.serialize_u64(*n),
            MetricValue::Unavailable => serializer.serialize_str(UNAVAILABLE_TEXT),
        }
    }
}

/// Case counts for one country, as returned by one statistics lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsRecord {
    country: String,
    deaths: MetricValue,
    confirmed: MetricValue,
    recovered: MetricValue,
    critical: MetricValue,
}

impl StatisticsRecord {
    pub fn new(
        country: impl Into<String>,
        deaths: MetricValue,
        confirmed: MetricValue,
        recovered: MetricValue,
        critical: MetricValue,
    ) -> Self {
        Self {
            country: country.into(),
            deaths,
            confirmed,
            recovered,
            critical,
        }
    }

    /// Build from the first element of a statistics payload.
    pub fn from_entry(country: impl Into<String>, entry: &Map<String, Value>) -> Self {
        let pick = |m: Metric| MetricValue::from_json(entry.get(m.key()));
        Self::new(
            country,
            pick(Metric::Deaths),
            pick(Metric::Confirmed),
            pick(Metric::Recovered),
            pick(Metric::Critical),
        )
    }

    /// Echo of the queried identifier.
    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn get(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::Deaths => self.deaths,
            Metric::Confirmed => self.confirmed,
            Metric::Recovered => self.recovered,
            Metric::Critical => self.critical,
        }
    }
}

/// A resolved map position. "No position" is `Option<Coordinate>::None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// OpenStreetMap link with a marker at this position (country-level zoom).
    pub fn map_url(&self) -> String {
        self.map_url_with_zoom(3)
    }

    pub fn map_url_with_zoom(&self, zoom: u8) -> String {
        format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={zoom}/{lat}/{lon}",
            lat = self.latitude,
            lon = self.longitude,
            zoom = zoom
        )
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// One entry of the statistics service's country list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryEntry {
    pub name: String,
    #[serde(default, rename = "alpha2code")]
    pub alpha2: Option<String>,
    #[serde(default, rename = "alpha3code")]
    pub alpha3: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// One displayed metric of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub metric: Metric,
    pub value: MetricValue,
}

/// How a report cycle ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Success,
    NoData,
    TransportError { status: u16 },
    RequestFailed { reason: String },
    /// Statistics were found but no country-level position was.
    GeocodeMiss,
}

impl Outcome {
    /// `true` for outcomes that still carry statistics.
    pub fn has_statistics(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::GeocodeMiss)
    }
}

/// Result of one report cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub query: CountryQuery,
    pub fields: Vec<ReportField>,
    pub coordinate: Option<Coordinate>,
    pub outcome: Outcome,
}

impl Report {
    pub fn value(&self, metric: Metric) -> Option<MetricValue> {
        self.fields
            .iter()
            .find(|f| f.metric == metric)
            .map(|f| f.value)
    }
}
