//! Current conditions snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::icon::WeatherIcon;
use crate::reading::Reading;

/// Units reported alongside a conditions snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionsUnits {
    pub temperature: Option<String>,
    pub humidity: Option<String>,
    pub pressure: Option<String>,
    pub dew_point: Option<String>,
    pub feels_like: Option<String>,
    pub wet_bulb: Option<String>,
    pub wind_speed: Option<String>,
    pub avg_wind_speed: Option<String>,
    pub wind_degrees: Option<String>,
    pub avg_wind_degrees: Option<String>,
    pub rain_rate: Option<String>,
    pub rain_today: Option<String>,
}

/// One snapshot of current weather at a station.
///
/// Built once by a provider and never mutated afterwards; the cache hands out
/// shared references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionsRecord {
    /// When the snapshot was fetched
    pub update_time: DateTime<Utc>,
    /// When the provider measured it
    pub observation_time: Reading<DateTime<Utc>>,
    pub temperature: Reading<f64>,
    pub humidity: Reading<f64>,
    pub pressure: Reading<f64>,
    pub dew_point: Reading<f64>,
    pub feels_like: Reading<f64>,
    pub wet_bulb: Reading<f64>,
    pub wind_speed: Reading<f64>,
    pub wind_direction: Reading<String>,
    pub wind_degrees: Reading<f64>,
    pub avg_wind_speed: Reading<f64>,
    pub avg_wind_direction: Reading<String>,
    pub avg_wind_degrees: Reading<f64>,
    pub rain_rate: Reading<f64>,
    pub rain_today: Reading<f64>,
    pub current_condition: Reading<String>,
    pub icon: Reading<WeatherIcon>,
    pub source_url: Reading<String>,
    pub units: ConditionsUnits,
}

impl ConditionsRecord {
    /// Empty snapshot stamped with `update_time`; every quantity starts out
    /// unsupported and providers fill in what they report.
    pub fn new(update_time: DateTime<Utc>) -> Self {
        Self {
            update_time,
            observation_time: Reading::Unsupported,
            temperature: Reading::Unsupported,
            humidity: Reading::Unsupported,
            pressure: Reading::Unsupported,
            dew_point: Reading::Unsupported,
            feels_like: Reading::Unsupported,
            wet_bulb: Reading::Unsupported,
            wind_speed: Reading::Unsupported,
            wind_direction: Reading::Unsupported,
            wind_degrees: Reading::Unsupported,
            avg_wind_speed: Reading::Unsupported,
            avg_wind_direction: Reading::Unsupported,
            avg_wind_degrees: Reading::Unsupported,
            rain_rate: Reading::Unsupported,
            rain_today: Reading::Unsupported,
            current_condition: Reading::Unsupported,
            icon: Reading::Unsupported,
            source_url: Reading::Unsupported,
            units: ConditionsUnits::default(),
        }
    }
}
