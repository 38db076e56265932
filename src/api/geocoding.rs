//! Client for the **OpenCage** forward geocoder.
//!
//! Only country-level candidates are accepted: the first result whose
//! `components` contain a `country` entry wins. A lookup that finds no such
//! candidate is a soft miss (`None`), not an error.

use super::{build_url, http_client};
use crate::config::Config;
use crate::models::{Coordinate, CountryQuery};
use anyhow::{Context, Result, bail};
use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Anything that can place a country on a map.
pub trait Geocoder {
    fn locate(&self, query: &CountryQuery) -> Option<Coordinate>;
}

/// Response body of `GET /json`. Fields not needed here are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeCandidate>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeCandidate {
    #[serde(default)]
    pub components: Map<String, Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Geometry {
    pub lat: f64,
    pub lng: f64,
}

impl GeocodeCandidate {
    pub fn is_country(&self) -> bool {
        self.components.contains_key("country")
    }
}

/// First country-typed candidate with a position, if any.
pub fn select_country(response: &GeocodeResponse) -> Option<Coordinate> {
    response
        .results
        .iter()
        .filter(|c| c.is_country())
        .find_map(|c| c.geometry)
        .map(|g| Coordinate::new(g.lat, g.lng))
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    base_url: String,
    api_key: String,
    http: HttpClient,
}

impl GeocodingClient {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            base_url: config.geocode_base_url.trim_end_matches('/').to_string(),
            api_key: config.geocode_api_key.clone(),
            http: http_client(config)?,
        })
    }

    /// Request URL. Codes additionally constrain the search to that country.
    pub fn request_url(&self, query: &CountryQuery) -> String {
        self.url_with_key(query, &self.api_key)
    }

    fn url_with_key(&self, query: &CountryQuery, key: &str) -> String {
        let endpoint = format!("{}/json", self.base_url);
        let mut params = vec![
            ("q", query.identifier()),
            ("key", key),
            ("no_annotations", "1"),
        ];
        if query.is_code() {
            params.push(("countrycode", query.identifier()));
        }
        build_url(&endpoint, &params)
    }

    /// Like [`Geocoder::locate`] but surfaces transport and decode failures.
    pub fn try_locate(&self, query: &CountryQuery) -> Result<Option<Coordinate>> {
        let url = self.request_url(query);
        let shown = self.url_with_key(query, "<redacted>");
        debug!("GET {}", shown);
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| e.without_url())
            .with_context(|| format!("GET {}", shown))?;
        if !resp.status().is_success() {
            bail!("geocoding request failed with HTTP {}", resp.status());
        }
        let body: GeocodeResponse = resp
            .json()
            .map_err(|e| e.without_url())
            .context("decode geocoding response")?;
        debug!("geocoding: {} candidates", body.results.len());
        Ok(select_country(&body))
    }
}

impl Geocoder for GeocodingClient {
    fn locate(&self, query: &CountryQuery) -> Option<Coordinate> {
        match self.try_locate(query) {
            Ok(found) => found,
            Err(e) => {
                warn!("geocoding {:?} failed: {:#}", query.identifier(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve;

    fn client() -> GeocodingClient {
        let mut cfg = Config::new("s", "geo-key");
        cfg.geocode_base_url = "https://geo.test/v1".into();
        GeocodingClient::new(&cfg).unwrap()
    }

    #[test]
    fn code_lookup_adds_country_constraint() {
        let c = client();
        assert_eq!(
            c.request_url(&resolve("IT", true).unwrap()),
            "https://geo.test/v1/json?q=IT&key=geo-key&no_annotations=1&countrycode=IT"
        );
        assert_eq!(
            c.request_url(&resolve("South Africa", false).unwrap()),
            "https://geo.test/v1/json?q=South%20Africa&key=geo-key&no_annotations=1"
        );
    }

    #[test]
    fn first_country_candidate_wins() {
        let body = r#"{
          "results": [
            {"components": {"_type": "city", "city": "Georgia"}, "geometry": {"lat": 1.0, "lng": 2.0}},
            {"components": {"_type": "country", "country": "Georgia"}, "geometry": {"lat": 42.0, "lng": 43.5}},
            {"components": {"_type": "state", "country": "United States"}, "geometry": {"lat": 32.6, "lng": -83.4}}
          ],
          "status": {"code": 200, "message": "OK"}
        }"#;
        let resp: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(select_country(&resp), Some(Coordinate::new(42.0, 43.5)));
    }

    #[test]
    fn no_country_candidate_is_a_miss() {
        let body = r#"{"results":[{"components":{"_type":"city","city":"Paris"},"geometry":{"lat":48.8,"lng":2.3}}]}"#;
        let resp: GeocodeResponse = serde_json::from_str(body).unwrap();
        assert_eq!(select_country(&resp), None);

        let empty: GeocodeResponse = serde_json::from_str(r#"{"total_results":0}"#).unwrap();
        assert_eq!(select_country(&empty), None);
    }

    #[test]
    fn transport_failure_hides_key_and_is_a_soft_miss() {
        let mut cfg = Config::new("s", "SECRET-GEO-KEY");
        // Nothing listens on port 1.
        cfg.geocode_base_url = "http://127.0.0.1:1/v1".into();
        let geo = GeocodingClient::new(&cfg).unwrap();
        let query = resolve("IT", true).unwrap();

        let err = geo.try_locate(&query).unwrap_err();
        let rendered = format!("{:#}", err);
        assert!(!rendered.contains("SECRET-GEO-KEY"), "{}", rendered);
        assert!(rendered.contains("<redacted>") || rendered.contains("%3Credacted%3E"));

        assert_eq!(geo.locate(&query), None);
    }
}
