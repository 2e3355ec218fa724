//! Weather data providers.
//!
//! Each provider fetches its own XML dialect and normalizes it into the
//! canonical station, conditions and forecast records from `weather-common`.

pub mod distance;
pub mod http;
pub mod noaa;
pub mod provider;
pub mod wbug;
pub mod xml;

pub use noaa::{NoaaEndpoints, NoaaProvider};
pub use provider::{
    is_metric, EntryField, ProviderRegistry, ServiceUi, StationQuery, WeatherProvider,
    CONFIG_KEY_UNITS, ENTRY_KEY_STATION_NAME, ENTRY_KEY_ZIP, UNITS_IMPERIAL, UNITS_METRIC,
};
pub use wbug::{LocationKey, WeatherBugProvider};
