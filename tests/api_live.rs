//! Live API tests. Run with: `cargo test --features online -- --nocapture`
//! Needs COVID_RAPIDAPI_KEY and OPENCAGE_API_KEY in the environment.
#![cfg(feature = "online")]

use covid_report::api::{Geocoder, GeocodingClient, StatisticsClient, StatisticsSource};
use covid_report::resolver::resolve;
use covid_report::{Config, Metric, Outcome, ReportService};

fn config() -> Config {
    Config::from_env().expect("COVID_RAPIDAPI_KEY and OPENCAGE_API_KEY must be set")
}

#[test]
fn fetch_statistics_by_code_and_name() {
    let client = StatisticsClient::new(&config()).unwrap();
    let by_code = client
        .fetch_statistics(&resolve("IT", true).unwrap())
        .unwrap();
    assert_eq!(by_code.country(), "IT");
    let by_name = client
        .fetch_statistics(&resolve("Italy", false).unwrap())
        .unwrap();
    assert_eq!(by_name.country(), "Italy");
}

#[test]
fn fetch_country_list() {
    let client = StatisticsClient::new(&config()).unwrap();
    let countries = client.fetch_countries().unwrap();
    assert!(countries.iter().any(|c| c.name == "Italy"));
}

#[test]
fn geocode_italy() {
    let geo = GeocodingClient::new(&config()).unwrap();
    let c = geo.locate(&resolve("IT", true).unwrap()).expect("country result");
    assert!((35.0..48.0).contains(&c.latitude));
    assert!((6.0..19.0).contains(&c.longitude));
}

#[test]
fn full_report_for_italy() {
    let cfg = config();
    let service = ReportService::new(
        StatisticsClient::new(&cfg).unwrap(),
        GeocodingClient::new(&cfg).unwrap(),
    );
    let report = service
        .generate("IT", true, &[Metric::Deaths, Metric::Confirmed])
        .unwrap();
    assert_eq!(report.outcome, Outcome::Success);
    assert_eq!(report.fields.len(), 2);
}
