//! Per-entry refresh: reuse a fresh cached result or fetch, write and cache.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, info, instrument};
use weather_common::{
    ConditionsRecord, ForecastRecord, LocationEntry, WeatherResult, DEFAULT_FORECAST_DAYS,
};
use weather_providers::ProviderRegistry;

use crate::cache::EntryCache;
use crate::config::ConfigStore;
use crate::equipment::EquipmentWriter;
use crate::metrics::{RefreshKind, RefreshMetrics};

/// Cached error marker for a failed provider fetch.
pub const ERROR_READING_DATA: &str = "Error reading data";
/// Cached error marker for a fetch whose equipment write failed.
pub const ERROR_WRITING_DATA: &str = "Error writing data";

type FlightKey = (String, RefreshKind);

/// Orchestrates provider fetches, equipment writes and the entry cache.
///
/// At most one fetch per entry and kind is in flight; a caller that waits
/// behind another re-checks the cache before fetching again.
pub struct RefreshEngine {
    config: Arc<ConfigStore>,
    providers: Arc<ProviderRegistry>,
    cache: Arc<EntryCache>,
    equipment: EquipmentWriter,
    metrics: Arc<RefreshMetrics>,
    in_flight: Mutex<HashMap<FlightKey, Arc<tokio::sync::Mutex<()>>>>,
    forecast_days: usize,
}

impl RefreshEngine {
    pub fn new(
        config: Arc<ConfigStore>,
        providers: Arc<ProviderRegistry>,
        cache: Arc<EntryCache>,
        equipment: EquipmentWriter,
    ) -> Self {
        Self {
            config,
            providers,
            cache,
            equipment,
            metrics: Arc::new(RefreshMetrics::new()),
            in_flight: Mutex::new(HashMap::new()),
            forecast_days: DEFAULT_FORECAST_DAYS,
        }
    }

    /// Request a different number of forecast days.
    pub fn with_forecast_days(mut self, days: usize) -> Self {
        self.forecast_days = days;
        self
    }

    pub fn config(&self) -> &Arc<ConfigStore> {
        &self.config
    }

    pub fn providers(&self) -> &Arc<ProviderRegistry> {
        &self.providers
    }

    pub fn cache(&self) -> &Arc<EntryCache> {
        &self.cache
    }

    pub fn equipment(&self) -> &EquipmentWriter {
        &self.equipment
    }

    pub fn metrics(&self) -> &Arc<RefreshMetrics> {
        &self.metrics
    }

    pub fn forecast_days(&self) -> usize {
        self.forecast_days
    }

    fn flight_lock(&self, path: &str, kind: RefreshKind) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry((path.to_string(), kind)).or_default().clone()
    }

    /// Drop the in-flight lock and cached results of a deleted entry.
    ///
    /// A refresh already in flight still finishes, but its result is not cached.
    pub fn forget(&self, path: &str) {
        let mut locks = self.in_flight.lock().unwrap_or_else(|e| e.into_inner());
        locks.retain(|(p, _), _| p != path);
        self.cache.remove(path);
    }

    fn fresh_conditions(&self, path: &str, period: Duration) -> Option<Arc<ConditionsRecord>> {
        self.cache
            .last_conditions(path)
            .filter(|record| is_fresh(record.update_time, period))
    }

    fn fresh_forecast(&self, path: &str, period: Duration) -> Option<Arc<Vec<ForecastRecord>>> {
        self.cache.last_forecast(path).filter(|days| {
            days.first()
                .map(|day| is_fresh(day.update_time, period))
                .unwrap_or(false)
        })
    }

    /// Current conditions for an entry.
    ///
    /// Unless `force` is set, a cached record younger than the conditions
    /// refresh period is returned without any I/O.
    #[instrument(skip(self, entry), fields(path = %entry.path()))]
    pub async fn refresh_conditions(
        &self,
        entry: &LocationEntry,
        force: bool,
    ) -> WeatherResult<Arc<ConditionsRecord>> {
        let config = self.config.snapshot().await;
        let period = Duration::minutes(i64::from(config.conditions_refresh()));
        let path = entry.path();

        if !force {
            if let Some(record) = self.fresh_conditions(path, period) {
                self.metrics.record_cache_hit(RefreshKind::Conditions);
                return Ok(record);
            }
        }

        let lock = self.flight_lock(path, RefreshKind::Conditions);
        let _guard = lock.lock().await;
        if !force {
            if let Some(record) = self.fresh_conditions(path, period) {
                self.metrics.record_cache_hit(RefreshKind::Conditions);
                return Ok(record);
            }
        }

        self.cache.track(path);
        self.metrics.record_fetch(RefreshKind::Conditions);
        let fetched = match self.providers.get(config.service()) {
            Ok(provider) => {
                provider
                    .conditions(config.service_config(), entry.station(), entry.data())
                    .await
            }
            Err(e) => Err(e),
        };

        let record = match fetched {
            Ok(record) => Arc::new(record),
            Err(e) => {
                self.metrics.record_fetch_failure(RefreshKind::Conditions);
                self.cache
                    .set_conditions(path, None, Some(ERROR_READING_DATA.to_string()));
                return Err(e);
            }
        };

        let write_error = match self.equipment.write_conditions(path, &record).await {
            Ok(written) => {
                debug!(points = written, "Wrote conditions");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to write conditions to equipment");
                self.metrics.record_write_failure(RefreshKind::Conditions);
                Some(ERROR_WRITING_DATA.to_string())
            }
        };

        if !self.cache.set_conditions(path, Some(record.clone()), write_error) {
            debug!("Entry removed during refresh, result not cached");
        }
        Ok(record)
    }

    /// Forecast days for an entry, index 0 being the next day.
    ///
    /// Freshness is judged by the first day's update time; an empty cached
    /// forecast always counts as stale. After a successful write the station
    /// fields are pushed again as well.
    #[instrument(skip(self, entry), fields(path = %entry.path()))]
    pub async fn refresh_forecasts(
        &self,
        entry: &LocationEntry,
        force: bool,
    ) -> WeatherResult<Arc<Vec<ForecastRecord>>> {
        let config = self.config.snapshot().await;
        let period = Duration::minutes(i64::from(config.forecasts_refresh()));
        let path = entry.path();

        if !force {
            if let Some(days) = self.fresh_forecast(path, period) {
                self.metrics.record_cache_hit(RefreshKind::Forecast);
                return Ok(days);
            }
        }

        let lock = self.flight_lock(path, RefreshKind::Forecast);
        let _guard = lock.lock().await;
        if !force {
            if let Some(days) = self.fresh_forecast(path, period) {
                self.metrics.record_cache_hit(RefreshKind::Forecast);
                return Ok(days);
            }
        }

        self.cache.track(path);
        self.metrics.record_fetch(RefreshKind::Forecast);
        let fetched = match self.providers.get(config.service()) {
            Ok(provider) => {
                provider
                    .forecast(
                        config.service_config(),
                        entry.station(),
                        entry.data(),
                        self.forecast_days,
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        let days = match fetched {
            Ok(mut days) => {
                days.truncate(self.forecast_days);
                Arc::new(days)
            }
            Err(e) => {
                self.metrics.record_fetch_failure(RefreshKind::Forecast);
                self.cache
                    .set_forecast(path, None, Some(ERROR_READING_DATA.to_string()));
                return Err(e);
            }
        };

        let written = match self.equipment.write_forecast(path, &days).await {
            Ok(written) => {
                self.equipment
                    .write_station(path, entry.station(), config.service())
                    .await
                    .map(|station_points| written + station_points)
            }
            Err(e) => Err(e),
        };

        let write_error = match written {
            Ok(points) => {
                info!(days = days.len(), points, "Forecast refreshed");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to write forecast to equipment");
                self.metrics.record_write_failure(RefreshKind::Forecast);
                Some(ERROR_WRITING_DATA.to_string())
            }
        };

        if !self.cache.set_forecast(path, Some(days.clone()), write_error) {
            debug!("Entry removed during refresh, result not cached");
        }
        Ok(days)
    }
}

/// True when `update_time` is newer than `period` ago.
pub fn is_fresh(update_time: DateTime<Utc>, period: Duration) -> bool {
    update_time > Utc::now() - period
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_fresh() {
        let period = Duration::minutes(60);
        assert!(is_fresh(Utc::now() - Duration::minutes(59), period));
        assert!(!is_fresh(Utc::now() - Duration::minutes(61), period));
    }
}
