//! National Weather Service XML feeds.
//!
//! Station resolution goes zip code -> NDFD forecast point -> nearest station
//! in the current-observation index. The index is fetched once per provider
//! and kept for its lifetime.

mod dwml;
mod icons;
mod observation;
mod stations;

pub use dwml::{forecast_point, parse_forecast};
pub use icons::map_icon;
pub use observation::parse_observation;
pub use stations::StationIndex;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, Utc};
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};
use weather_common::{
    ConditionsRecord, ForecastRecord, ServiceData, ServiceKind, StationSource, WeatherError,
    WeatherResult,
};

use crate::http::DocumentFetcher;
use crate::provider::{
    is_metric, EntryField, ServiceUi, StationQuery, WeatherProvider, CONFIG_KEY_UNITS,
    ENTRY_KEY_STATION_NAME, ENTRY_KEY_ZIP,
};

const USER_AGENT: &str = "weather-updater/0.1 (NWS feeds)";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Days requested when only the forecast point is needed.
const RESOLVE_DAYS: usize = 2;

/// Remote document locations. Overridable so tests can point at a local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoaaEndpoints {
    /// NDFD by-day forecast service
    pub forecast_url: String,
    /// Current observation station index
    pub station_index_url: String,
    /// Directory holding `{station}.xml` observation documents
    pub current_obs_base: String,
}

impl Default for NoaaEndpoints {
    fn default() -> Self {
        Self {
            forecast_url: "http://graphical.weather.gov/xml/sample_products/browser_interface/ndfdBrowserClientByDay.php".to_string(),
            station_index_url: "http://www.weather.gov/xml/current_obs/index.xml".to_string(),
            current_obs_base: "http://weather.gov/xml/current_obs".to_string(),
        }
    }
}

impl NoaaEndpoints {
    /// All three documents served below one base URL, as the test server does.
    pub fn with_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            forecast_url: format!("{}/forecast", base),
            station_index_url: format!("{}/current_obs/index.xml", base),
            current_obs_base: format!("{}/current_obs", base),
        }
    }
}

/// Where a forecast should be requested for.
enum ForecastLocation<'a> {
    Zip(&'a str),
    Point(f64, f64),
}

pub struct NoaaProvider {
    endpoints: NoaaEndpoints,
    fetcher: DocumentFetcher,
    station_index: OnceCell<Arc<StationIndex>>,
}

impl NoaaProvider {
    pub fn new() -> WeatherResult<Self> {
        Self::with_endpoints(NoaaEndpoints::default())
    }

    pub fn with_endpoints(endpoints: NoaaEndpoints) -> WeatherResult<Self> {
        Ok(Self {
            endpoints,
            fetcher: DocumentFetcher::new(REQUEST_TIMEOUT, USER_AGENT)?,
            station_index: OnceCell::new(),
        })
    }

    pub fn endpoints(&self) -> &NoaaEndpoints {
        &self.endpoints
    }

    /// The station index, fetched on first use.
    pub async fn station_index(&self) -> WeatherResult<Arc<StationIndex>> {
        let index = self
            .station_index
            .get_or_try_init(|| async {
                let root = self
                    .fetcher
                    .fetch_xml(&self.endpoints.station_index_url, &[])
                    .await?;
                let index = StationIndex::from_document(&root);
                info!(stations = index.len(), "Fetched NWS station index");
                Ok::<_, WeatherError>(Arc::new(index))
            })
            .await?;
        Ok(index.clone())
    }

    async fn fetch_forecast_document(
        &self,
        location: ForecastLocation<'_>,
        days: usize,
        metric: bool,
    ) -> WeatherResult<crate::xml::XmlElement> {
        let mut params: Vec<(&str, String)> = match location {
            ForecastLocation::Zip(zip) => vec![("zipCodeList", zip.to_string())],
            ForecastLocation::Point(lat, lon) => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
        };
        params.push(("startDate", Local::now().format("%Y-%m-%d").to_string()));
        params.push(("numDays", days.to_string()));
        params.push(("format", "24 hourly".to_string()));
        params.push(("Unit", if metric { "m" } else { "e" }.to_string()));

        self.fetcher.fetch_xml(&self.endpoints.forecast_url, &params).await
    }
}

#[async_trait]
impl WeatherProvider for NoaaProvider {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Nws
    }

    #[instrument(skip(self, config), fields(location = %query.location))]
    async fn resolve_station(
        &self,
        config: &ServiceData,
        query: &StationQuery,
    ) -> WeatherResult<StationSource> {
        if query.location.is_empty() {
            return Err(WeatherError::InvalidConfigurationData(
                "Zip code is required".to_string(),
            ));
        }

        let document = self
            .fetch_forecast_document(
                ForecastLocation::Zip(&query.location),
                RESOLVE_DAYS,
                is_metric(config),
            )
            .await?;

        let (latitude, longitude) = forecast_point(&document)?.ok_or_else(|| {
            WeatherError::InvalidConfigurationData(format!(
                "Can't find latitude/longitude from zip code {}",
                query.location
            ))
        })?;

        let index = self.station_index().await?;
        let station = index.nearest(latitude, longitude).cloned().ok_or_else(|| {
            WeatherError::InvalidConfigurationData(format!(
                "No weather station near zip code {}",
                query.location
            ))
        })?;

        debug!(station = %station.id, name = %station.name, "Resolved nearest NWS station");
        Ok(station)
    }

    #[instrument(skip(self, config, _entry_data), fields(station = %station.id))]
    async fn conditions(
        &self,
        config: &ServiceData,
        station: &StationSource,
        _entry_data: &ServiceData,
    ) -> WeatherResult<ConditionsRecord> {
        if station.id.is_empty() {
            return Err(WeatherError::MissingStationContent(
                "Station has no id".to_string(),
            ));
        }

        let url = format!("{}/{}.xml", self.endpoints.current_obs_base, station.id);
        let document = self.fetcher.fetch_xml(&url, &[]).await?;
        if document.name() != "current_observation" {
            return Err(WeatherError::provider(format!(
                "Unexpected observation document <{}> for station {}",
                document.name(),
                station.id
            )));
        }

        Ok(parse_observation(&document, is_metric(config), Utc::now()))
    }

    #[instrument(skip(self, config, entry_data), fields(station = %station.id))]
    async fn forecast(
        &self,
        config: &ServiceData,
        station: &StationSource,
        entry_data: &ServiceData,
        days: usize,
    ) -> WeatherResult<Vec<ForecastRecord>> {
        let location = match (station.coordinates(), entry_data.get(ENTRY_KEY_ZIP)) {
            (Some((lat, lon)), _) => ForecastLocation::Point(lat, lon),
            (None, Some(zip)) if !zip.trim().is_empty() => ForecastLocation::Zip(zip.trim()),
            _ => {
                return Err(WeatherError::MissingStationContent(format!(
                    "Station {} has no location for a forecast",
                    station.id
                )))
            }
        };

        let metric = is_metric(config);
        let document = self.fetch_forecast_document(location, days, metric).await?;
        let mut records = parse_forecast(&document, metric, Utc::now())?;
        records.truncate(days);
        Ok(records)
    }

    fn ui(&self) -> ServiceUi {
        ServiceUi {
            service: ServiceKind::Nws,
            entry_fields: vec![
                EntryField {
                    key: ENTRY_KEY_ZIP,
                    header: "Zip Code",
                },
                EntryField {
                    key: ENTRY_KEY_STATION_NAME,
                    header: "Station Name",
                },
            ],
            config_keys: vec![CONFIG_KEY_UNITS],
        }
    }
}
