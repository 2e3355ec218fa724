//! Daily forecast records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::icon::WeatherIcon;
use crate::reading::Reading;

/// Number of forecast days requested when the caller does not say otherwise.
pub const DEFAULT_FORECAST_DAYS: usize = 7;

/// One forecast day. Index 0 of a forecast sequence is the next day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// When the forecast was fetched
    pub update_time: DateTime<Utc>,
    /// Day name, e.g. "Tuesday"
    pub title: Reading<String>,
    pub highest_temperature: Reading<f64>,
    pub lowest_temperature: Reading<f64>,
    /// Probability of precipitation in percent
    pub prob_precipitation: Reading<f64>,
    pub prediction: Reading<String>,
    pub icon: Reading<WeatherIcon>,
    pub temperature_units: Option<String>,
}

impl ForecastRecord {
    pub fn new(update_time: DateTime<Utc>) -> Self {
        Self {
            update_time,
            title: Reading::Unsupported,
            highest_temperature: Reading::Unsupported,
            lowest_temperature: Reading::Unsupported,
            prob_precipitation: Reading::Unsupported,
            prediction: Reading::Unsupported,
            icon: Reading::Unsupported,
            temperature_units: None,
        }
    }
}
