//! Builders for canonical weather records with predictable values.

use chrono::{DateTime, Duration, TimeZone, Utc};
use weather_common::{
    ConditionsRecord, ForecastRecord, LocationEntry, Reading, ServiceData, StationSource,
    WeatherIcon,
};

/// Fixed reference instant, 2011-06-14 18:00 UTC.
pub fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2011, 6, 14, 18, 0, 0).unwrap()
}

/// `reference_time()` shifted by a number of minutes.
pub fn minutes_after_reference(minutes: i64) -> DateTime<Utc> {
    reference_time() + Duration::minutes(minutes)
}

/// Station with coordinates near downtown Pittsburgh.
pub fn sample_station() -> StationSource {
    StationSource::new("KAGC", "Pittsburgh, Allegheny County Airport").with_location(40.35, -79.93)
}

/// Entry for a control program path with a zip and station name.
pub fn sample_entry(path: &str) -> LocationEntry {
    let station = sample_station();
    let mut data = ServiceData::new();
    data.insert("zip".to_string(), "15222".to_string());
    data.insert("station_name".to_string(), station.name.clone());
    LocationEntry::new(path, station, data)
}

/// Conditions with every numeric quantity filled in.
///
/// Temperature is the given value; the other readings are derived from it so
/// tests can tell records apart.
pub fn sample_conditions(update_time: DateTime<Utc>, temperature: f64) -> ConditionsRecord {
    let mut record = ConditionsRecord::new(update_time);
    record.observation_time = Reading::Value(update_time - Duration::minutes(9));
    record.temperature = Reading::Value(temperature);
    record.humidity = Reading::Value(55.0);
    record.pressure = Reading::Value(30.01);
    record.dew_point = Reading::Value(temperature - 17.5);
    record.wind_speed = Reading::Value(9.2);
    record.wind_degrees = Reading::Value(230.0);
    record.wind_direction = Reading::Value("Southwest".to_string());
    record.current_condition = Reading::Value("Partly Cloudy".to_string());
    record.icon = Reading::Value(WeatherIcon::PartlyCloudy);
    record.units.temperature = Some("°F".to_string());
    record.units.dew_point = Some("°F".to_string());
    record.units.humidity = Some("%".to_string());
    record.units.pressure = Some("in".to_string());
    record.units.wind_speed = Some("mph".to_string());
    record.units.wind_degrees = Some("°".to_string());
    record
}

const DAY_NAMES: [&str; 7] = [
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
    "Monday",
];

/// A forecast sequence of `days` days.
///
/// Day `i` has high `80 + i` and low `60 + i`.
pub fn sample_forecast(update_time: DateTime<Utc>, days: usize) -> Vec<ForecastRecord> {
    (0..days)
        .map(|day| {
            let mut record = ForecastRecord::new(update_time);
            record.title = Reading::Value(DAY_NAMES[day % DAY_NAMES.len()].to_string());
            record.highest_temperature = Reading::Value(80.0 + day as f64);
            record.lowest_temperature = Reading::Value(60.0 + day as f64);
            record.prob_precipitation = Reading::Value(10.0 * day as f64);
            record.prediction = Reading::Value("Partly Sunny".to_string());
            record.icon = Reading::Value(WeatherIcon::PartlyCloudy);
            record.temperature_units = Some("°F".to_string());
            record
        })
        .collect()
}
