//! Error taxonomy for one report cycle.
//!
//! `ResolveError` is raised before any network access, `StatsError` classifies
//! the outcome of the statistics lookup, and `ConfigError` covers missing or
//! malformed environment configuration.

use thiserror::Error;

/// Caller-level validation failure. Never reaches a remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("please enter or select a country (identifier is empty)")]
    EmptyIdentifier,
}

/// Failure of a statistics lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    /// The service answered 200 but the payload held no usable entry.
    #[error("no data available")]
    NoData,
    /// The service answered with a non-success HTTP status.
    #[error("failed to retrieve data: {status}")]
    Transport { status: u16 },
    /// No HTTP status to report: connection failure, timeout, or an undecodable body.
    #[error("request failed: {reason}")]
    Request { reason: String },
}

/// Problems loading [`crate::config::Config`] from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}
