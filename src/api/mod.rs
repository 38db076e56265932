//! Synchronous clients for the two remote collaborators:
//!
//! - [`statistics`]: the RapidAPI **covid-19-data** service (per-country counts, country list)
//! - [`geocoding`]: the **OpenCage** forward geocoder (country position for the map marker)
//!
//! Both clients issue exactly one request per lookup, with no retry. Requests use
//! the timeouts from [`crate::config::Config`] (30s total / 10s connect by default).

pub mod geocoding;
pub mod statistics;

pub use geocoding::{Geocoder, GeocodingClient};
pub use statistics::{StatisticsClient, StatisticsSource};

use crate::config::Config;
use anyhow::{Context, Result};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;

// Unreserved characters per RFC 3986 stay as-is in query values.
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode one query value.
pub(crate) fn enc(value: &str) -> String {
    percent_encoding::utf8_percent_encode(value, QUERY_SAFE).to_string()
}

/// Render `base?k=v&k=v` with every value percent-encoded.
pub(crate) fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, enc(v)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, query)
    }
}

pub(crate) fn http_client(config: &Config) -> Result<HttpClient> {
    HttpClient::builder()
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .redirect(Policy::limited(5))
        .user_agent(concat!("covid_report/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("build HTTP client")
}
