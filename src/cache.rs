//! Time-bounded read-through cache for the statistics service's country list.
//!
//! Refresh policy: a cached list is served while it is younger than the TTL.
//! After that the next caller refreshes it. When a refresh fails and an older
//! list exists, the stale list keeps being served (and the failure is logged);
//! with nothing cached the error goes to the caller.

use crate::models::CountryEntry;
use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Cached {
    loaded: Instant,
    fetched_at: DateTime<Utc>,
    countries: Arc<Vec<CountryEntry>>,
}

#[derive(Debug)]
pub struct CountryListCache {
    ttl: Duration,
    slot: Mutex<Option<Cached>>,
}

impl CountryListCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Cached list, refreshed through `fetch` when missing or expired.
    pub fn get_or_refresh<F>(&self, fetch: F) -> Result<Arc<Vec<CountryEntry>>>
    where
        F: FnOnce() -> Result<Vec<CountryEntry>>,
    {
        self.get_or_refresh_at(Instant::now(), fetch)
    }

    /// Same as [`get_or_refresh`](Self::get_or_refresh) with an explicit clock reading.
    pub fn get_or_refresh_at<F>(&self, now: Instant, fetch: F) -> Result<Arc<Vec<CountryEntry>>>
    where
        F: FnOnce() -> Result<Vec<CountryEntry>>,
    {
        // Held across `fetch` so concurrent callers don't refresh twice.
        let mut slot = self.lock();
        if let Some(c) = slot.as_ref()
            && now.saturating_duration_since(c.loaded) < self.ttl
        {
            return Ok(Arc::clone(&c.countries));
        }

        match fetch() {
            Ok(list) => {
                debug!("country list refreshed ({} entries)", list.len());
                let countries = Arc::new(list);
                *slot = Some(Cached {
                    loaded: now,
                    fetched_at: Utc::now(),
                    countries: Arc::clone(&countries),
                });
                Ok(countries)
            }
            Err(e) => match slot.as_ref() {
                Some(stale) => {
                    warn!(
                        "country list refresh failed, serving list from {}: {:#}",
                        stale.fetched_at, e
                    );
                    Ok(Arc::clone(&stale.countries))
                }
                None => Err(e),
            },
        }
    }

    /// Wall-clock time of the last successful refresh.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.lock().as_ref().map(|c| c.fetched_at)
    }

    pub fn invalidate(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<Cached>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for CountryListCache {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_COUNTRY_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::cell::Cell;

    fn entry(name: &str) -> CountryEntry {
        CountryEntry {
            name: name.into(),
            alpha2: None,
            alpha3: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn serves_cached_list_within_ttl() {
        let cache = CountryListCache::new(Duration::from_secs(60));
        let calls = Cell::new(0);
        let t0 = Instant::now();
        let fetch = || -> Result<Vec<CountryEntry>> {
            calls.set(calls.get() + 1);
            Ok(vec![entry("Italy")])
        };

        let a = cache.get_or_refresh_at(t0, fetch).unwrap();
        let b = cache
            .get_or_refresh_at(t0 + Duration::from_secs(59), fetch)
            .unwrap();
        assert_eq!(calls.get(), 1);
        assert_eq!(a, b);
        assert!(cache.fetched_at().is_some());
    }

    #[test]
    fn refreshes_after_ttl() {
        let cache = CountryListCache::new(Duration::from_secs(60));
        let t0 = Instant::now();
        cache
            .get_or_refresh_at(t0, || Ok(vec![entry("Italy")]))
            .unwrap();
        let fresh = cache
            .get_or_refresh_at(t0 + Duration::from_secs(60), || {
                Ok(vec![entry("Italy"), entry("Spain")])
            })
            .unwrap();
        assert_eq!(fresh.len(), 2);
    }

    #[test]
    fn failed_refresh_serves_stale_list() {
        let cache = CountryListCache::new(Duration::from_secs(1));
        let t0 = Instant::now();
        cache
            .get_or_refresh_at(t0, || Ok(vec![entry("Italy")]))
            .unwrap();
        let stale = cache
            .get_or_refresh_at(t0 + Duration::from_secs(5), || Err(anyhow!("HTTP 503")))
            .unwrap();
        assert_eq!(stale[0].name, "Italy");
    }

    #[test]
    fn failure_without_cached_list_propagates() {
        let cache = CountryListCache::new(Duration::from_secs(1));
        let err = cache
            .get_or_refresh(|| Err(anyhow!("HTTP 503")))
            .unwrap_err();
        assert!(err.to_string().contains("503"));
        assert!(cache.fetched_at().is_none());
    }

    #[test]
    fn default_uses_six_hour_ttl() {
        let cache = CountryListCache::default();
        assert_eq!(cache.ttl(), Duration::from_secs(6 * 60 * 60));
        assert!(cache.fetched_at().is_none());
    }

    #[test]
    fn invalidate_forces_refresh() {
        let cache = CountryListCache::new(Duration::from_secs(3600));
        let calls = Cell::new(0);
        let fetch = || -> Result<Vec<CountryEntry>> {
            calls.set(calls.get() + 1);
            Ok(vec![entry("Italy")])
        };
        cache.get_or_refresh(fetch).unwrap();
        cache.invalidate();
        cache.get_or_refresh(fetch).unwrap();
        assert_eq!(calls.get(), 2);
    }
}
