//! WeatherBug REST/RSS provider.
//!
//! Entries are keyed by a WeatherBug location (`Z<zip>` or `C<citycode>`)
//! plus an explicit station id chosen from that location's station list.

mod client;
mod icons;
mod parse;

pub use client::{WeatherBugClient, CONFIG_KEY_LICENSE};
pub use icons::map_icon;
pub use parse::{
    parse_forecasts, parse_live_weather, parse_locations, parse_stations, payload_error,
    LocationKey, WbugLocation, WbugStation,
};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, instrument};
use weather_common::{
    ConditionsRecord, ForecastRecord, ServiceData, ServiceKind, StationSource, WeatherError,
    WeatherResult,
};

use crate::provider::{
    is_metric, EntryField, ServiceUi, StationQuery, WeatherProvider, CONFIG_KEY_UNITS,
    ENTRY_KEY_STATION_NAME, ENTRY_KEY_ZIP,
};

fn unit_type(config: &ServiceData) -> String {
    if is_metric(config) { "1" } else { "0" }.to_string()
}

pub struct WeatherBugProvider {
    client: WeatherBugClient,
}

impl WeatherBugProvider {
    pub fn new() -> WeatherResult<Self> {
        Ok(Self {
            client: WeatherBugClient::new(None)?,
        })
    }

    /// Provider sending every call to `base_url` instead of the public API host.
    pub fn with_base_url(base_url: impl Into<String>) -> WeatherResult<Self> {
        Ok(Self {
            client: WeatherBugClient::new(Some(base_url.into()))?,
        })
    }

    /// Cities matching a free-text search.
    pub async fn find_locations(
        &self,
        config: &ServiceData,
        search: &str,
    ) -> WeatherResult<Vec<WbugLocation>> {
        let root = self
            .client
            .call(config, "getLocationsXML", vec![("SearchString", search.to_string())])
            .await?;
        parse_locations(&root)
    }

    /// Stations reporting for a location.
    pub async fn find_stations(
        &self,
        config: &ServiceData,
        location: &LocationKey,
    ) -> WeatherResult<Vec<WbugStation>> {
        let root = self
            .client
            .call(config, "getStationsXML", vec![location.query_param()])
            .await?;
        parse_stations(&root)
    }
}

#[async_trait]
impl WeatherProvider for WeatherBugProvider {
    fn kind(&self) -> ServiceKind {
        ServiceKind::Wbug
    }

    #[instrument(skip(self, config), fields(location = %query.location))]
    async fn resolve_station(
        &self,
        config: &ServiceData,
        query: &StationQuery,
    ) -> WeatherResult<StationSource> {
        let location = LocationKey::parse(&query.location).ok_or_else(|| {
            WeatherError::InvalidConfigurationData(format!(
                "Unrecognized WeatherBug location {}",
                query.location
            ))
        })?;

        let stations = self.find_stations(config, &location).await?;
        let station = match &query.station_id {
            Some(id) => stations.iter().find(|s| &s.id == id).ok_or_else(|| {
                WeatherError::InvalidConfigurationData(format!("Unknown station code {}", id))
            })?,
            None => stations.first().ok_or_else(|| {
                WeatherError::InvalidConfigurationData(format!(
                    "No stations found for {}",
                    location
                ))
            })?,
        };

        debug!(station = %station.id, name = %station.name, "Resolved WeatherBug station");
        Ok(station.to_station_source())
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

        let root = self
            .client
            .call(
                config,
                "getLiveWeatherRSS",
                vec![("stationid", station.id.clone()), ("UnitType", unit_type(config))],
            )
            .await?;
        parse_live_weather(&root, Utc::now())
    }

    #[instrument(skip(self, config, _entry_data), fields(station = %station.id))]
    async fn forecast(
        &self,
        config: &ServiceData,
        station: &StationSource,
        _entry_data: &ServiceData,
        days: usize,
    ) -> WeatherResult<Vec<ForecastRecord>> {
        let (latitude, longitude) = station.coordinates().ok_or_else(|| {
            WeatherError::MissingStationContent(format!(
                "Station {} has no coordinates for a forecast",
                station.id
            ))
        })?;

        let root = self
            .client
            .call(
                config,
                "getForecastRSS",
                vec![
                    ("lat", format!("{:.2}", latitude)),
                    ("long", format!("{:.2}", longitude)),
                    ("UnitType", unit_type(config)),
                ],
            )
            .await?;

        let mut records = parse_forecasts(&root, Utc::now())?;
        records.truncate(days);
        Ok(records)
    }

    fn ui(&self) -> ServiceUi {
        ServiceUi {
            service: ServiceKind::Wbug,
            entry_fields: vec![
                EntryField {
                    key: ENTRY_KEY_ZIP,
                    header: "City/Zip",
                },
                EntryField {
                    key: ENTRY_KEY_STATION_NAME,
                    header: "Station Name",
                },
            ],
            config_keys: vec![CONFIG_KEY_UNITS, CONFIG_KEY_LICENSE],
        }
    }
}
