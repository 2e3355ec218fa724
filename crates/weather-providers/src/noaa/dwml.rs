//! NDFD "24 hourly" forecast documents (DWML).

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;
use weather_common::{ForecastRecord, Reading, WeatherError, WeatherIcon, WeatherResult};

use super::icons::map_icon;
use crate::xml::XmlElement;

/// Latitude and longitude of the forecast point, as reported by the document.
///
/// Returns `Ok(None)` when the document has no point, and a provider error
/// when the point is present but its coordinates are not numbers.
pub fn forecast_point(root: &XmlElement) -> WeatherResult<Option<(f64, f64)>> {
    let Some(point) = root.find("data/location/point") else {
        return Ok(None);
    };

    let coordinate = |name: &str| -> WeatherResult<Option<f64>> {
        match point.attr(name) {
            None => Ok(None),
            Some(text) => text.trim().parse().map(Some).map_err(|e| {
                WeatherError::provider_with(
                    format!("Error parsing number for {} trying to parse \"{}\"", name, text),
                    e,
                )
            }),
        }
    };

    match (coordinate("latitude")?, coordinate("longitude")?) {
        (Some(lat), Some(lon)) => Ok(Some((lat, lon))),
        _ => Ok(None),
    }
}

/// Parse every forecast day in the document, in order.
pub fn parse_forecast(root: &XmlElement, metric: bool, now: DateTime<Utc>) -> WeatherResult<Vec<ForecastRecord>> {
    let Some(parameters) = root.find("data/parameters") else {
        return Err(WeatherError::provider("Forecast document has no parameters"));
    };

    let dates = forecast_dates(root, parameters);
    let highs = temperatures(parameters, "maximum");
    let lows = temperatures(parameters, "minimum");
    let precipitation = precipitation(parameters);
    let predictions: Vec<Option<String>> = parameters
        .find_all("weather/weather-conditions")
        .into_iter()
        .map(|c| c.attr("weather-summary").filter(|s| !s.is_empty()).map(str::to_string))
        .collect();
    let icons: Vec<WeatherIcon> = parameters
        .find_all("conditions-icon/icon-link")
        .into_iter()
        .map(|link| map_icon(link.text()))
        .collect();

    let days = dates.len();
    if highs.len() != days || lows.len() != days || predictions.len() != days || icons.len() != days {
        return Err(WeatherError::provider("Not all forecast arrays are the same size"));
    }

    let temperature_units = if metric { "°C" } else { "°F" };
    let mut records = Vec::with_capacity(days);
    for day in 0..days {
        let mut record = ForecastRecord::new(now);
        record.title = Reading::from_option(dates[day].map(|d| d.format("%A").to_string()));
        record.highest_temperature = Reading::from_option(highs[day]);
        record.lowest_temperature = Reading::from_option(lows[day]);
        record.prob_precipitation = Reading::from_option(precipitation.get(day).copied().flatten());
        record.prediction = Reading::from_option(predictions[day].clone());
        record.icon = Reading::Value(icons[day]);
        record.temperature_units = Some(temperature_units.to_string());
        records.push(record);
    }

    Ok(records)
}

/// Day dates from the time layout used by the maximum temperature series.
fn forecast_dates(root: &XmlElement, parameters: &XmlElement) -> Vec<Option<NaiveDate>> {
    let Some(layout_key) = parameters
        .children("temperature")
        .find(|t| t.attr("type") == Some("maximum"))
        .and_then(|t| t.attr("time-layout"))
    else {
        warn!("Can't find max temperature in forecast");
        return Vec::new();
    };

    let Some(layout) = root
        .find_all("data/time-layout")
        .into_iter()
        .find(|l| l.child_text("layout-key") == Some(layout_key))
    else {
        warn!(layout = %layout_key, "Forecast time layout not found");
        return Vec::new();
    };

    let dates: Vec<Option<NaiveDate>> = layout
        .children("start-valid-time")
        .map(|t| {
            let text = t.text();
            let date = text
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            if date.is_none() {
                warn!(value = %text, "Couldn't parse date in the forecast");
            }
            date
        })
        .collect();

    if dates.is_empty() {
        warn!("Didn't find any days in forecast");
    }
    dates
}

fn temperatures(parameters: &XmlElement, kind: &str) -> Vec<Option<f64>> {
    parameters
        .children("temperature")
        .filter(|t| t.attr("type") == Some(kind))
        .flat_map(|t| t.children("value"))
        .map(|v| parse_value(v, "temperature"))
        .collect()
}

/// Precipitation is reported in 12 hour periods; a day takes the larger of
/// its two periods.
fn precipitation(parameters: &XmlElement) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = parameters
        .children("probability-of-precipitation")
        .flat_map(|p| p.children("value"))
        .map(|v| parse_value(v, "prob precip"))
        .collect();

    values
        .chunks(2)
        .map(|pair| pair.iter().flatten().copied().reduce(f64::max))
        .collect()
}

fn parse_value(value: &XmlElement, what: &str) -> Option<f64> {
    let text = value.text();
    if text.is_empty() {
        return None;
    }
    match text.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(value = %text, "Error parsing {} in forecast", what);
            None
        }
    }
}
