//! Shared fixtures for the weather-updater integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use test_utils::{sample_conditions, sample_entry, sample_forecast};
use weather_common::{
    ConditionsRecord, ForecastRecord, LocationEntry, ServiceData, ServiceKind, StationSource,
    WeatherError, WeatherResult,
};
use weather_providers::{EntryField, ProviderRegistry, ServiceUi, StationQuery, WeatherProvider};
use weather_updater::{
    ConfigStore, EntryCache, EquipmentWriter, MemoryEquipment, RefreshEngine, WeatherConfig,
};

/// Provider whose answers are queued by the test.
///
/// When a queue is empty the provider answers with a fresh default record.
#[derive(Default)]
pub struct MockProvider {
    conditions: Mutex<VecDeque<WeatherResult<ConditionsRecord>>>,
    forecasts: Mutex<VecDeque<WeatherResult<Vec<ForecastRecord>>>>,
    stations: Mutex<VecDeque<WeatherResult<StationSource>>>,
    conditions_calls: AtomicUsize,
    forecast_calls: AtomicUsize,
    last_requested_days: AtomicUsize,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_conditions(&self, result: WeatherResult<ConditionsRecord>) {
        self.conditions.lock().unwrap().push_back(result);
    }

    pub fn push_forecast(&self, result: WeatherResult<Vec<ForecastRecord>>) {
        self.forecasts.lock().unwrap().push_back(result);
    }

    pub fn push_station(&self, result: WeatherResult<StationSource>) {
        self.stations.lock().unwrap().push_back(result);
    }

    pub fn conditions_calls(&self) -> usize {
        self.conditions_calls.load(Ordering::SeqCst)
    }

    pub fn forecast_calls(&self) -> usize {
        self.forecast_calls.load(Ordering::SeqCst)
    }

    pub fn last_requested_days(&self) -> usize {
        self.last_requested_days.load(Ordering::SeqCst)
    }

    /// Block conditions fetches until the returned guard drops.
    pub async fn hold(&self) -> tokio::sync::OwnedMutexGuard<()> {
        self.gate.clone().lock_owned().await
    }
}

#[async_trait]
impl WeatherProvider for MockProvider {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Nws
    }

    async fn resolve_station(
        &self,
        _config: &ServiceData,
        query: &StationQuery,
    ) -> WeatherResult<StationSource> {
        match self.stations.lock().unwrap().pop_front() {
            Some(result) => result,
            None => Err(WeatherError::InvalidConfigurationData(format!(
                "No station for {}",
                query.location
            ))),
        }
    }

    async fn conditions(
        &self,
        _config: &ServiceData,
        _station: &StationSource,
        _entry_data: &ServiceData,
    ) -> WeatherResult<ConditionsRecord> {
        self.conditions_calls.fetch_add(1, Ordering::SeqCst);
        let _open = self.gate.lock().await;
        let queued = self.conditions.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| Ok(sample_conditions(Utc::now(), 70.0)))
    }

    async fn forecast(
        &self,
        _config: &ServiceData,
        _station: &StationSource,
        _entry_data: &ServiceData,
        days: usize,
    ) -> WeatherResult<Vec<ForecastRecord>> {
        self.forecast_calls.fetch_add(1, Ordering::SeqCst);
        self.last_requested_days.store(days, Ordering::SeqCst);
        let queued = self.forecasts.lock().unwrap().pop_front();
        queued.unwrap_or_else(|| Ok(sample_forecast(Utc::now(), days)))
    }

    fn ui(&self) -> ServiceUi {
        ServiceUi {
            service: ServiceKind::Nws,
            entry_fields: vec![EntryField {
                key: "zip",
                header: "Zip Code",
            }],
            config_keys: vec!["units"],
        }
    }
}

/// Everything a test needs to drive the engine.
pub struct Harness {
    pub provider: Arc<MockProvider>,
    pub equipment: Arc<MemoryEquipment>,
    pub config: Arc<ConfigStore>,
    pub engine: Arc<RefreshEngine>,
    _dir: tempfile::TempDir,
}

/// Numeric points every test entry gets.
pub const WEATHER_POINTS: &[&str] = &[
    "wc_temperature",
    "wc_humidity",
    "wc_iconValue",
    "wf0_highestTemperature",
    "wf1_highestTemperature",
    "wf2_lowestTemperature",
    "ws_latitude",
    "ws_longitude",
];

impl Harness {
    /// Engine over a config holding `paths`, each with weather points.
    pub fn with_entries(paths: &[&str]) -> Self {
        let mut config = WeatherConfig::default();
        for path in paths {
            config.add(sample_entry(path)).unwrap();
        }
        Self::with_config(config, paths)
    }

    pub fn with_config(config: WeatherConfig, point_paths: &[&str]) -> Self {
        let dir = test_utils::scratch_dir();
        let store = Arc::new(ConfigStore::new(dir.path().join("weather.properties"), config));

        let equipment = Arc::new(MemoryEquipment::new());
        for path in point_paths {
            equipment.add_numeric_points(path, WEATHER_POINTS);
        }

        let provider = Arc::new(MockProvider::new());
        let shared = provider.clone();
        let registry = ProviderRegistry::with_factory(move |_| {
            let provider: Arc<dyn WeatherProvider> = shared.clone();
            Ok(provider)
        });

        let engine = Arc::new(RefreshEngine::new(
            store.clone(),
            Arc::new(registry),
            Arc::new(EntryCache::new()),
            EquipmentWriter::new(equipment.clone()),
        ));

        Self {
            provider,
            equipment,
            config: store,
            engine,
            _dir: dir,
        }
    }

    pub fn config_path(&self) -> &Path {
        self.config.path()
    }

    pub async fn entry(&self, path: &str) -> LocationEntry {
        self.config.entry_for_path(path).await.unwrap()
    }
}
