//! covid_report
//!
//! A small Rust library for per-country COVID-19 reports. Pairs with the
//! `covid-report` CLI and the `covid-report-gui` dashboard.
//!
//! ### Features
//! - Look up deaths / confirmed / recovered / critical counts by country code or name
//! - Place the country on a map via a geocoder (country-level results only)
//! - Shape both into one [`Report`] with a well-defined outcome
//! - Export reports as CSV or JSON, render a top-10 chart as SVG/PNG
//!
//! ### Example
//! ```no_run
//! use covid_report::api::{GeocodingClient, StatisticsClient};
//! use covid_report::{Config, Metric, ReportService};
//!
//! let cfg = Config::from_env()?;
//! let service = ReportService::new(StatisticsClient::new(&cfg)?, GeocodingClient::new(&cfg)?);
//! let report = service.generate("IT", true, &[Metric::Deaths, Metric::Confirmed])?;
//! for line in covid_report::format::report_lines(&report, "en") {
//!     println!("{}", line);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod format;
pub mod models;
pub mod report;
pub mod resolver;
pub mod storage;
pub mod viz;

pub use config::Config;
pub use models::{Coordinate, CountryQuery, Metric, MetricValue, Outcome, Report, StatisticsRecord};
pub use report::ReportService;
