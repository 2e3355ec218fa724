//! Provider abstraction and the memoized provider registry.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::info;
use weather_common::{
    ConditionsRecord, ForecastRecord, LocationEntry, ServiceData, ServiceKind, StationSource,
    WeatherResult,
};

use crate::noaa::NoaaProvider;
use crate::wbug::WeatherBugProvider;

/// Global service config key selecting the unit system.
pub const CONFIG_KEY_UNITS: &str = "units";
pub const UNITS_IMPERIAL: &str = "imperial";
pub const UNITS_METRIC: &str = "metric";

/// Entry data key holding the user-entered location (zip or location key).
pub const ENTRY_KEY_ZIP: &str = "zip";
/// Entry data key holding the resolved station name.
pub const ENTRY_KEY_STATION_NAME: &str = "station_name";

/// True when the service config selects metric units.
pub fn is_metric(config: &ServiceData) -> bool {
    config.get(CONFIG_KEY_UNITS).map(String::as_str) == Some(UNITS_METRIC)
}

/// What the user typed when adding an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationQuery {
    /// Zip code, or a provider-specific location key
    pub location: String,
    /// Explicit station choice, for providers that offer one
    pub station_id: Option<String>,
}

impl StationQuery {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into().trim().to_string(),
            station_id: None,
        }
    }

    pub fn with_station(mut self, station_id: impl Into<String>) -> Self {
        self.station_id = Some(station_id.into());
        self
    }
}

/// A per-entry field shown in the management UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryField {
    pub key: &'static str,
    pub header: &'static str,
}

/// UI metadata for a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceUi {
    pub service: ServiceKind,
    pub entry_fields: Vec<EntryField>,
    /// Global config keys this provider understands
    pub config_keys: Vec<&'static str>,
}

impl ServiceUi {
    /// Short label for an entry: the location the user entered, falling back
    /// to the station name.
    pub fn entry_display_name(&self, entry: &LocationEntry) -> String {
        entry
            .data_value(ENTRY_KEY_ZIP)
            .map(str::to_string)
            .unwrap_or_else(|| entry.station().name.clone())
    }
}

/// A remote weather data provider.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    fn kind(&self) -> ServiceKind;

    /// Resolve what the user entered into a station.
    ///
    /// Fails with `InvalidConfigurationData` when the location does not map
    /// to any known station.
    async fn resolve_station(
        &self,
        config: &ServiceData,
        query: &StationQuery,
    ) -> WeatherResult<StationSource>;

    /// Fetch current conditions for a resolved station.
    async fn conditions(
        &self,
        config: &ServiceData,
        station: &StationSource,
        entry_data: &ServiceData,
    ) -> WeatherResult<ConditionsRecord>;

    /// Fetch up to `days` forecast days; index 0 is the next day. Returns
    /// fewer days when the provider has fewer.
    async fn forecast(
        &self,
        config: &ServiceData,
        station: &StationSource,
        entry_data: &ServiceData,
        days: usize,
    ) -> WeatherResult<Vec<ForecastRecord>>;

    fn ui(&self) -> ServiceUi;
}

type ProviderFactory =
    Box<dyn Fn(ServiceKind) -> WeatherResult<Arc<dyn WeatherProvider>> + Send + Sync>;

/// Builds each provider on first use and hands out the same instance after.
pub struct ProviderRegistry {
    factory: ProviderFactory,
    providers: RwLock<HashMap<ServiceKind, Arc<dyn WeatherProvider>>>,
}

impl ProviderRegistry {
    /// Registry producing the real NOAA and WeatherBug clients.
    pub fn new() -> Self {
        Self::with_factory(|kind| {
            let provider: Arc<dyn WeatherProvider> = match kind {
                ServiceKind::Nws => Arc::new(NoaaProvider::new()?),
                ServiceKind::Wbug => Arc::new(WeatherBugProvider::new()?),
            };
            Ok(provider)
        })
    }

    /// Registry using a custom constructor, e.g. to point at test servers.
    pub fn with_factory<F>(factory: F) -> Self
    where
        F: Fn(ServiceKind) -> WeatherResult<Arc<dyn WeatherProvider>> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Get the provider for a service, constructing it on first request.
    pub fn get(&self, kind: ServiceKind) -> WeatherResult<Arc<dyn WeatherProvider>> {
        {
            let providers = self.providers.read().unwrap_or_else(|e| e.into_inner());
            if let Some(provider) = providers.get(&kind) {
                return Ok(provider.clone());
            }
        }

        let mut providers = self.providers.write().unwrap_or_else(|e| e.into_inner());

        // Double-check after acquiring write lock
        if let Some(provider) = providers.get(&kind) {
            return Ok(provider.clone());
        }

        let provider = (self.factory)(kind)?;
        info!(service = %kind, "Created weather provider");
        providers.insert(kind, provider.clone());
        Ok(provider)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
