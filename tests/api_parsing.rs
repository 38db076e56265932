use covid_report::api::geocoding::{GeocodeResponse, select_country};
use covid_report::api::statistics::parse_statistics_response;
use covid_report::error::StatsError;
use covid_report::models::CountryEntry;
use covid_report::{Coordinate, Metric, MetricValue};

#[test]
fn parse_sample_statistics_payload() {
    let sample = r#"
    [
      {
        "country": "Italy",
        "code": "IT",
        "confirmed": 17397429,
        "recovered": 16533224,
        "critical": 220,
        "deaths": 165245,
        "latitude": 41.87194,
        "longitude": 12.56738,
        "lastChange": "2022-05-31T09:00:20+02:00",
        "lastUpdate": "2022-05-31T09:15:03+02:00"
      }
    ]
    "#;
    let r = parse_statistics_response("IT", 200, sample).unwrap();
    assert_eq!(r.country(), "IT");
    assert_eq!(r.get(Metric::Confirmed), MetricValue::Count(17_397_429));
    assert_eq!(r.get(Metric::Recovered), MetricValue::Count(16_533_224));
    assert_eq!(r.get(Metric::Critical), MetricValue::Count(220));
    assert_eq!(r.get(Metric::Deaths), MetricValue::Count(165_245));
}

#[test]
fn every_metric_is_present_even_when_payload_is_sparse() {
    let r = parse_statistics_response("Atlantis", 200, r#"[{"country":"Atlantis"}]"#).unwrap();
    for m in Metric::ALL {
        assert_eq!(r.get(m), MetricValue::Unavailable, "{}", m);
    }
}

#[test]
fn not_found_keeps_status_code() {
    assert_eq!(
        parse_statistics_response("XX", 404, r#"{"message":"Not Found"}"#),
        Err(StatsError::Transport { status: 404 })
    );
}

#[test]
fn parse_sample_geocoding_payload() {
    let sample = r#"
    {
      "documentation": "https://opencagedata.com/api",
      "results": [
        {
          "bounds": {"northeast": {"lat": 47.09, "lng": 18.52}, "southwest": {"lat": 35.29, "lng": 6.62}},
          "components": {
            "ISO_3166-1_alpha-2": "IT",
            "ISO_3166-1_alpha-3": "ITA",
            "_category": "place",
            "_type": "country",
            "continent": "Europe",
            "country": "Italy",
            "country_code": "it"
          },
          "confidence": 1,
          "formatted": "Italy",
          "geometry": {"lat": 42.6384261, "lng": 12.674297}
        }
      ],
      "status": {"code": 200, "message": "OK"},
      "total_results": 1
    }
    "#;
    let resp: GeocodeResponse = serde_json::from_str(sample).unwrap();
    assert_eq!(
        select_country(&resp),
        Some(Coordinate::new(42.6384261, 12.674297))
    );
}

#[test]
fn parse_country_list() {
    let sample = r#"
    [
      {"name":"Afghanistan","alpha2code":"AF","alpha3code":"AFG","latitude":33.93911,"longitude":67.709953},
      {"name":"Kosovo"}
    ]
    "#;
    let list: Vec<CountryEntry> = serde_json::from_str(sample).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].alpha3.as_deref(), Some("AFG"));
    assert_eq!(list[1].alpha2, None);
}
