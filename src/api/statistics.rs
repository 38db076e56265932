//! Client for the RapidAPI **covid-19-data** service.
//!
//! Two lookup shapes exist and are kept distinct:
//! - by code: `GET /country/code?code=IT&date-format=yyyy-mm-dd&format=json`
//! - by name: `GET /country?name=Italy&format=json`
//!
//! Both answer with a JSON array whose first element carries `deaths`,
//! `confirmed`, `recovered` and `critical`. Missing fields become
//! [`MetricValue::Unavailable`](crate::models::MetricValue::Unavailable).

use super::{build_url, http_client};
use crate::config::Config;
use crate::error::StatsError;
use crate::models::{CountryEntry, CountryQuery, StatisticsRecord};
use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;

const HEADER_KEY: &str = "X-RapidAPI-Key";
const HEADER_HOST: &str = "X-RapidAPI-Host";

/// Anything that can look up case counts for a country.
pub trait StatisticsSource {
    /// One lookup, one remote call, no retry.
    fn fetch_statistics(&self, query: &CountryQuery) -> Result<StatisticsRecord, StatsError>;
}

#[derive(Debug, Clone)]
pub struct StatisticsClient {
    base_url: String,
    api_key: String,
    api_host: String,
    http: HttpClient,
}

impl StatisticsClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.stats_base_url.trim_end_matches('/').to_string(),
            api_key: config.stats_api_key.clone(),
            api_host: config.stats_api_host.clone(),
            http: http_client(config)?,
        })
    }

    /// URL for a lookup. Codes and names go to different endpoints.
    pub fn request_url(&self, query: &CountryQuery) -> String {
        if query.is_code() {
            build_url(
                &format!("{}/country/code", self.base_url),
                &[
                    ("code", query.identifier()),
                    ("date-format", "yyyy-mm-dd"),
                    ("format", "json"),
                ],
            )
        } else {
            build_url(
                &format!("{}/country", self.base_url),
                &[("name", query.identifier()), ("format", "json")],
            )
        }
    }

    /// Names (and codes, when known) of every country the service reports on.
    pub fn fetch_countries(&self) -> Result<Vec<CountryEntry>> {
        let url = build_url(
            &format!("{}/help/countries", self.base_url),
            &[("format", "json")],
        );
        debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .header(HEADER_KEY, &self.api_key)
            .header(HEADER_HOST, &self.api_host)
            .send()
            .with_context(|| format!("GET {}", url))?;
        if !resp.status().is_success() {
            bail!("country list request failed with HTTP {}", resp.status());
        }
        let countries: Vec<CountryEntry> = resp.json().context("decode country list")?;
        debug!("country list: {} entries", countries.len());
        Ok(countries)
    }
}

impl StatisticsSource for StatisticsClient {
    fn fetch_statistics(&self, query: &CountryQuery) -> Result<StatisticsRecord, StatsError> {
        let url = self.request_url(query);
        debug!("GET {}", url);
        let resp = self
            .http
            .get(&url)
            .header(HEADER_KEY, &self.api_key)
            .header(HEADER_HOST, &self.api_host)
            .send()
            .map_err(|e| StatsError::Request {
                reason: e.to_string(),
            })?;
        let status = resp.status().as_u16();
        let body = resp.text().map_err(|e| StatsError::Request {
            reason: format!("read response body: {}", e),
        })?;
        debug!("statistics response: HTTP {} ({} bytes)", status, body.len());
        parse_statistics_response(query.identifier(), status, &body)
    }
}

/// Classify one statistics response.
///
/// - non-200 status: [`StatsError::Transport`] with that status
/// - 200 with an empty body, `null`, `[]`, `{}` or `""`: [`StatsError::NoData`]
/// - 200 with a non-array payload or a non-object first element: [`StatsError::Request`]
/// - otherwise a record built from the first element
pub fn parse_statistics_response(
    country: &str,
    status: u16,
    body: &str,
) -> Result<StatisticsRecord, StatsError> {
    if status != 200 {
        return Err(StatsError::Transport { status });
    }
    let body = body.trim();
    if body.is_empty() {
        return Err(StatsError::NoData);
    }
    let v: Value = serde_json::from_str(body).map_err(|e| StatsError::Request {
        reason: format!("decode statistics payload: {}", e),
    })?;
    match v {
        Value::Null => Err(StatsError::NoData),
        Value::Object(m) if m.is_empty() => Err(StatsError::NoData),
        Value::String(s) if s.is_empty() => Err(StatsError::NoData),
        Value::Array(items) => match items.first() {
            None => Err(StatsError::NoData),
            Some(Value::Object(entry)) => Ok(StatisticsRecord::from_entry(country, entry)),
            Some(other) => Err(StatsError::Request {
                reason: format!("unexpected statistics entry: {}", other),
            }),
        },
        other => Err(StatsError::Request {
            reason: format!("unexpected statistics payload: {}", other),
        }),
    }
}
