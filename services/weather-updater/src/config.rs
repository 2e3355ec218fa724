//! Persisted weather configuration.
//!
//! The configuration is a versioned `key=value` properties document holding
//! the selected service, refresh periods, provider-global settings and the
//! ordered list of monitored entries:
//!
//! ```text
//! version=1
//! service=nws
//! conditionsRefreshInMinutes=60
//! forecastsRefreshInMinutes=120
//! serviceConfig.units=imperial
//! entryCount=1
//! entry1.cpPath=/Building/RoofUnit
//! entry1.station.id=KAGC
//! entry1.station.name=Pittsburgh, Allegheny County Airport
//! entry1.station.latitude=40.35
//! entry1.station.longitude=-79.93
//! entry1.data.zip=15222
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use java_properties::{PropertiesError, PropertiesWriter};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use weather_common::{LocationEntry, ServiceData, ServiceKind, StationSource, WeatherError, WeatherResult};

/// The only persisted layout this build understands.
pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_CONDITIONS_REFRESH_MINUTES: u32 = 60;
pub const DEFAULT_FORECASTS_REFRESH_MINUTES: u32 = 120;

const KEY_VERSION: &str = "version";
const KEY_SERVICE: &str = "service";
const KEY_CONDITIONS_REFRESH: &str = "conditionsRefreshInMinutes";
const KEY_FORECASTS_REFRESH: &str = "forecastsRefreshInMinutes";
const KEY_ENTRY_COUNT: &str = "entryCount";
const PREFIX_SERVICE_CONFIG: &str = "serviceConfig.";

/// Refresh settings, provider settings and monitored entries.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherConfig {
    service: ServiceKind,
    conditions_refresh: u32,
    forecasts_refresh: u32,
    service_config: ServiceData,
    entries: Vec<LocationEntry>,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            service: ServiceKind::default(),
            conditions_refresh: DEFAULT_CONDITIONS_REFRESH_MINUTES,
            forecasts_refresh: DEFAULT_FORECASTS_REFRESH_MINUTES,
            service_config: ServiceData::new(),
            entries: Vec::new(),
        }
    }
}

impl WeatherConfig {
    pub fn service(&self) -> ServiceKind {
        self.service
    }

    /// Conditions refresh period in minutes.
    pub fn conditions_refresh(&self) -> u32 {
        self.conditions_refresh
    }

    /// Forecast refresh period in minutes.
    pub fn forecasts_refresh(&self) -> u32 {
        self.forecasts_refresh
    }

    pub fn service_config(&self) -> &ServiceData {
        &self.service_config
    }

    pub fn entries(&self) -> &[LocationEntry] {
        &self.entries
    }

    pub fn entry_for_path(&self, path: &str) -> Option<&LocationEntry> {
        let path = path.trim();
        self.entries.iter().find(|e| e.path() == path)
    }

    /// Switch services; both periods are re-clamped to the new minimums.
    pub fn set_service(&mut self, service: ServiceKind) {
        self.service = service;
        self.conditions_refresh = self.conditions_refresh.max(service.min_conditions_refresh());
        self.forecasts_refresh = self.forecasts_refresh.max(service.min_forecasts_refresh());
    }

    pub fn set_conditions_refresh(&mut self, minutes: u32) {
        self.conditions_refresh = minutes.max(self.service.min_conditions_refresh());
    }

    pub fn set_forecasts_refresh(&mut self, minutes: u32) {
        self.forecasts_refresh = minutes.max(self.service.min_forecasts_refresh());
    }

    pub fn set_service_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.service_config.insert(key.into(), value.into());
    }

    pub fn remove_service_value(&mut self, key: &str) -> Option<String> {
        self.service_config.remove(key)
    }

    /// Append an entry. Paths are unique within a configuration.
    pub fn add(&mut self, entry: LocationEntry) -> WeatherResult<()> {
        if entry.path().is_empty() {
            return Err(WeatherError::InvalidConfigurationData(
                "Entry path must not be empty".to_string(),
            ));
        }
        if self.entry_for_path(entry.path()).is_some() {
            return Err(WeatherError::InvalidConfigurationData(format!(
                "An entry already exists for {}",
                entry.path()
            )));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove the entry with the given path; returns whether one was removed.
    pub fn delete(&mut self, path: &str) -> bool {
        let path = path.trim();
        let before = self.entries.len();
        self.entries.retain(|e| e.path() != path);
        self.entries.len() != before
    }

    /// Parse a properties document (ISO-8859-1 with `\uXXXX` escapes).
    pub fn parse(input: impl AsRef<[u8]>) -> WeatherResult<Self> {
        let props: BTreeMap<String, String> = java_properties::read(input.as_ref())
            .map_err(|e| WeatherError::Config(format!("Malformed configuration: {}", e)))?
            .into_iter()
            .collect();

        match props.get(KEY_VERSION).map(|v| v.trim()) {
            Some(v) if v.parse::<u32>().ok() == Some(CONFIG_VERSION) => {}
            Some(v) => {
                return Err(WeatherError::Config(format!(
                    "Unsupported configuration version: {}",
                    v
                )))
            }
            None => {
                return Err(WeatherError::Config(
                    "Configuration has no version".to_string(),
                ))
            }
        }

        let service = match props.get(KEY_SERVICE) {
            Some(name) => name.parse::<ServiceKind>().unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to default service");
                ServiceKind::default()
            }),
            None => ServiceKind::default(),
        };

        let mut config = WeatherConfig {
            service,
            service_config: prefixed(&props, PREFIX_SERVICE_CONFIG),
            ..Default::default()
        };
        config.set_conditions_refresh(parse_or(
            &props,
            KEY_CONDITIONS_REFRESH,
            DEFAULT_CONDITIONS_REFRESH_MINUTES,
        ));
        config.set_forecasts_refresh(parse_or(
            &props,
            KEY_FORECASTS_REFRESH,
            DEFAULT_FORECASTS_REFRESH_MINUTES,
        ));

        let count: usize = parse_or(&props, KEY_ENTRY_COUNT, 0);
        for i in 1..=count {
            let prefix = format!("entry{}.", i);
            let path = props
                .get(&format!("{}cpPath", prefix))
                .map(|p| p.trim())
                .unwrap_or_default();
            if path.is_empty() {
                debug!(index = i, "Skipping entry without a path");
                continue;
            }

            let mut station = StationSource::new(
                props.get(&format!("{}station.id", prefix)).cloned().unwrap_or_default(),
                props.get(&format!("{}station.name", prefix)).cloned().unwrap_or_default(),
            );
            station.latitude = parse_float(&props, &format!("{}station.latitude", prefix));
            station.longitude = parse_float(&props, &format!("{}station.longitude", prefix));

            let data = prefixed(&props, &format!("{}data.", prefix));
            if let Err(e) = config.add(LocationEntry::new(path, station, data)) {
                warn!(index = i, error = %e, "Skipping entry");
            }
        }

        Ok(config)
    }

    /// Render as a properties document with sorted keys.
    pub fn to_properties(&self) -> WeatherResult<Vec<u8>> {
        let mut props = BTreeMap::new();
        props.insert(KEY_VERSION.to_string(), CONFIG_VERSION.to_string());
        props.insert(KEY_SERVICE.to_string(), self.service.name().to_string());
        props.insert(
            KEY_CONDITIONS_REFRESH.to_string(),
            self.conditions_refresh.to_string(),
        );
        props.insert(
            KEY_FORECASTS_REFRESH.to_string(),
            self.forecasts_refresh.to_string(),
        );
        for (key, value) in &self.service_config {
            props.insert(format!("{}{}", PREFIX_SERVICE_CONFIG, key), value.clone());
        }

        props.insert(KEY_ENTRY_COUNT.to_string(), self.entries.len().to_string());
        for (i, entry) in self.entries.iter().enumerate() {
            let prefix = format!("entry{}.", i + 1);
            let station = entry.station();
            props.insert(format!("{}cpPath", prefix), entry.path().to_string());
            props.insert(format!("{}station.id", prefix), station.id.clone());
            props.insert(format!("{}station.name", prefix), station.name.clone());
            if let Some(lat) = station.latitude {
                props.insert(format!("{}station.latitude", prefix), lat.to_string());
            }
            if let Some(lon) = station.longitude {
                props.insert(format!("{}station.longitude", prefix), lon.to_string());
            }
            for (key, value) in entry.data() {
                props.insert(format!("{}data.{}", prefix, key), value.clone());
            }
        }

        let mut out = Vec::new();
        write_properties(&mut out, &props)
            .map_err(|e| WeatherError::Config(format!("Failed to render configuration: {}", e)))?;
        Ok(out)
    }

    /// Load from disk.
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        let config = Self::parse(&bytes)
            .with_context(|| format!("Failed to parse configuration {}", path.display()))?;
        debug!(
            path = %path.display(),
            service = %config.service,
            entries = config.entries.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Write to disk through a temp file and rename.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, self.to_properties()?)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(props: &BTreeMap<String, String>, key: &str, default: T) -> T {
    props
        .get(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_float(props: &BTreeMap<String, String>, key: &str) -> Option<f64> {
    props
        .get(key)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn write_properties(
    out: &mut Vec<u8>,
    props: &BTreeMap<String, String>,
) -> Result<(), PropertiesError> {
    let mut writer = PropertiesWriter::new(out);
    writer.write_comment("Weather updater configuration")?;
    for (key, value) in props {
        writer.write(key, value)?;
    }
    writer.finish()
}

/// All keys starting with `prefix`, with the prefix stripped.
fn prefixed(props: &BTreeMap<String, String>, prefix: &str) -> ServiceData {
    props
        .range(prefix.to_string()..)
        .take_while(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k[prefix.len()..].to_string(), v.clone()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

// ============================================================================
// Shared store
// ============================================================================

/// The live configuration plus the file it persists to.
///
/// Jobs reload the file at the start of each pass; handlers mutate through
/// [`ConfigStore::update`], which saves before the change becomes visible.
pub struct ConfigStore {
    path: PathBuf,
    config: RwLock<WeatherConfig>,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>, config: WeatherConfig) -> Self {
        Self {
            path: path.into(),
            config: RwLock::new(config),
        }
    }

    /// Load the file at `path`, starting from defaults when it does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let config = if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            WeatherConfig::load(&path).await?
        } else {
            info!(path = %path.display(), "No configuration file, using defaults");
            WeatherConfig::default()
        };
        Ok(Self::new(path, config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn snapshot(&self) -> WeatherConfig {
        self.config.read().await.clone()
    }

    pub async fn entry_for_path(&self, path: &str) -> Option<LocationEntry> {
        self.config.read().await.entry_for_path(path).cloned()
    }

    /// Re-read the file, replacing the in-memory configuration.
    ///
    /// A file that does not exist yet keeps the in-memory configuration.
    pub async fn reload(&self) -> Result<WeatherConfig> {
        let mut guard = self.config.write().await;
        if !tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            debug!(path = %self.path.display(), "No configuration file to reload");
            return Ok(guard.clone());
        }
        let fresh = WeatherConfig::load(&self.path).await?;
        *guard = fresh.clone();
        Ok(fresh)
    }

    /// Apply `change` to a copy, persist it, then publish it.
    ///
    /// A change that fails, or a save that fails, leaves the live
    /// configuration untouched.
    pub async fn update<F, R>(&self, change: F) -> Result<R>
    where
        F: FnOnce(&mut WeatherConfig) -> WeatherResult<R>,
    {
        let mut guard = self.config.write().await;
        let mut next = guard.clone();
        let result = change(&mut next)?;
        next.save(&self.path).await?;
        *guard = next;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str) -> LocationEntry {
        let mut data = ServiceData::new();
        data.insert("zip".to_string(), "15222".to_string());
        LocationEntry::new(
            path,
            StationSource::new("KAGC", "Allegheny County").with_location(40.35, -79.93),
            data,
        )
    }

    #[test]
    fn test_version_is_required() {
        let err = WeatherConfig::parse("service=nws\n").unwrap_err();
        assert!(err.to_string().contains("no version"));

        let err = WeatherConfig::parse("version=2\n").unwrap_err();
        assert!(err.to_string().contains("Unsupported configuration version: 2"));
    }

    #[test]
    fn test_defaults_and_clamping() {
        let config = WeatherConfig::parse(
            "version=1\nconditionsRefreshInMinutes=5\nforecastsRefreshInMinutes=abc\n",
        )
        .unwrap();
        assert_eq!(config.service(), ServiceKind::Nws);
        assert_eq!(config.conditions_refresh(), 15);
        assert_eq!(config.forecasts_refresh(), DEFAULT_FORECASTS_REFRESH_MINUTES);
    }

    #[test]
    fn test_unknown_service_falls_back() {
        let config = WeatherConfig::parse("version=1\nservice=accuweather\n").unwrap();
        assert_eq!(config.service(), ServiceKind::Nws);
    }

    #[test]
    fn test_entries_parse() {
        let text = "\
# comment
version = 1
service: wbug
serviceConfig.licenseKey=ABC123
entryCount=3
entry1.cpPath= /Building/RoofUnit
entry1.station.id=PTTSB
entry1.station.name=Pittsburgh\\: Downtown
entry1.station.latitude=40.44
entry1.station.longitude=oops
entry1.data.zip=Z15222
entry2.cpPath=
entry3.cpPath=/Building/Lobby
";
        let config = WeatherConfig::parse(text).unwrap();
        assert_eq!(config.service(), ServiceKind::Wbug);
        assert_eq!(config.service_config().get("licenseKey").map(String::as_str), Some("ABC123"));
        assert_eq!(config.entries().len(), 2);

        let first = &config.entries()[0];
        assert_eq!(first.path(), "/Building/RoofUnit");
        assert_eq!(first.station().name, "Pittsburgh: Downtown");
        assert_eq!(first.station().latitude, Some(40.44));
        assert_eq!(first.station().longitude, None);
        assert_eq!(first.data_value("zip"), Some("Z15222"));

        assert_eq!(config.entries()[1].path(), "/Building/Lobby");
    }

    #[test]
    fn test_properties_round_trip() {
        let mut config = WeatherConfig::default();
        config.set_service(ServiceKind::Wbug);
        config.set_conditions_refresh(30);
        config.set_service_value("units", "metric");
        config.add(entry("/Building/Roof Unit=2")).unwrap();

        let bytes = config.to_properties().unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("# Weather updater configuration\n"));
        assert!(text.contains("version=1\n"));

        let parsed = WeatherConfig::parse(&bytes).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.entries()[0].path(), "/Building/Roof Unit=2");
        assert_eq!(parsed.entries()[0].station(), config.entries()[0].station());
    }

    #[test]
    fn test_unicode_escapes_and_continuations() {
        let text = "\
version=1
entryCount=1
entry1.cpPath=/Building/Caf\\u00e9
entry1.station.name=Long \\
    Name
";
        let config = WeatherConfig::parse(text).unwrap();
        let entry = &config.entries()[0];
        assert_eq!(entry.path(), "/Building/Café");
        assert_eq!(entry.station().name, "Long Name");
        assert_eq!(config.entries().len(), 1);
    }

    #[test]
    fn test_non_ascii_round_trip() {
        let mut config = WeatherConfig::default();
        config.add(entry("/Gebäude/Kälteanlage ☃")).unwrap();

        let bytes = config.to_properties().unwrap();
        let parsed = WeatherConfig::parse(&bytes).unwrap();
        assert_eq!(parsed.entries()[0].path(), "/Gebäude/Kälteanlage ☃");
    }

    #[test]
    fn test_add_rejects_duplicates() {
        let mut config = WeatherConfig::default();
        config.add(entry("/Building/RoofUnit")).unwrap();
        let err = config.add(entry(" /Building/RoofUnit ")).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidConfigurationData(_)));
        assert_eq!(config.entries().len(), 1);
    }

    #[test]
    fn test_delete_by_path() {
        let mut config = WeatherConfig::default();
        config.add(entry("/a")).unwrap();
        config.add(entry("/b")).unwrap();
        config.add(entry("/c")).unwrap();

        assert!(config.delete("/b"));
        assert!(!config.delete("/b"));
        let paths: Vec<_> = config.entries().iter().map(|e| e.path()).collect();
        assert_eq!(paths, vec!["/a", "/c"]);
    }

    #[test]
    fn test_set_service_reclamps() {
        let mut config = WeatherConfig::default();
        config.conditions_refresh = 1;
        config.set_service(ServiceKind::Wbug);
        assert_eq!(config.conditions_refresh(), 15);
    }
}
