//! Common types shared by the weather providers and the updater service.

pub mod conditions;
pub mod entry;
pub mod error;
pub mod fields;
pub mod forecast;
pub mod icon;
pub mod reading;
pub mod service;
pub mod station;

pub use conditions::{ConditionsRecord, ConditionsUnits};
pub use entry::{LocationEntry, ServiceData};
pub use error::{WeatherError, WeatherResult};
pub use fields::{ConditionsField, ExternalName, FieldType, FieldValue, ForecastField, StationField};
pub use forecast::{ForecastRecord, DEFAULT_FORECAST_DAYS};
pub use icon::WeatherIcon;
pub use reading::Reading;
pub use service::ServiceKind;
pub use station::StationSource;
