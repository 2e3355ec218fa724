//! Refresh counters, exported through the `metrics` facade and kept locally
//! for the status endpoint.

use metrics::counter;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Which half of an entry a refresh touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefreshKind {
    Conditions,
    Forecast,
}

impl RefreshKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RefreshKind::Conditions => "conditions",
            RefreshKind::Forecast => "forecast",
        }
    }
}

#[derive(Debug, Default)]
pub struct RefreshMetrics {
    conditions_fetches: AtomicU64,
    conditions_failures: AtomicU64,
    forecast_fetches: AtomicU64,
    forecast_failures: AtomicU64,
    cache_hits: AtomicU64,
    write_failures: AtomicU64,
}

impl RefreshMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, kind: RefreshKind) {
        match kind {
            RefreshKind::Conditions => self.conditions_fetches.fetch_add(1, Ordering::Relaxed),
            RefreshKind::Forecast => self.forecast_fetches.fetch_add(1, Ordering::Relaxed),
        };
        counter!("weather_fetches_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn record_fetch_failure(&self, kind: RefreshKind) {
        match kind {
            RefreshKind::Conditions => self.conditions_failures.fetch_add(1, Ordering::Relaxed),
            RefreshKind::Forecast => self.forecast_failures.fetch_add(1, Ordering::Relaxed),
        };
        counter!("weather_fetch_failures_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn record_cache_hit(&self, kind: RefreshKind) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
        counter!("weather_cache_hits_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn record_write_failure(&self, kind: RefreshKind) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
        counter!("weather_equipment_write_failures_total", "kind" => kind.as_str()).increment(1);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            conditions_fetches: self.conditions_fetches.load(Ordering::Relaxed),
            conditions_failures: self.conditions_failures.load(Ordering::Relaxed),
            forecast_fetches: self.forecast_fetches.load(Ordering::Relaxed),
            forecast_failures: self.forecast_failures.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub conditions_fetches: u64,
    pub conditions_failures: u64,
    pub forecast_fetches: u64,
    pub forecast_failures: u64,
    pub cache_hits: u64,
    pub write_failures: u64,
}
