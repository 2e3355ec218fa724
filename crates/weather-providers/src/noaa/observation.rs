//! `current_observation` documents from the NWS XML feed.

use chrono::{DateTime, Utc};
use weather_common::{ConditionsRecord, Reading};

use super::icons::map_icon;
use crate::xml::XmlElement;

/// Element names and units for one unit system.
struct ObservationLayout {
    temperature: &'static str,
    pressure: &'static str,
    dew_point: &'static str,
    wind_speed: &'static str,
    temperature_unit: &'static str,
    pressure_unit: &'static str,
    wind_speed_unit: &'static str,
}

const IMPERIAL: ObservationLayout = ObservationLayout {
    temperature: "temp_f",
    pressure: "pressure_in",
    dew_point: "dewpoint_f",
    wind_speed: "wind_mph",
    temperature_unit: "°F",
    pressure_unit: "in",
    wind_speed_unit: "mph",
};

const METRIC: ObservationLayout = ObservationLayout {
    temperature: "temp_c",
    pressure: "pressure_mb",
    dew_point: "dewpoint_c",
    wind_speed: "wind_kt",
    temperature_unit: "°C",
    pressure_unit: "mb",
    wind_speed_unit: "kt",
};

/// Convert an observation document into a conditions record.
///
/// Missing or unparsable values become `Null`. Average wind, rain, wet bulb
/// and feels-like are not part of this feed and stay `Unsupported`.
pub fn parse_observation(root: &XmlElement, metric: bool, now: DateTime<Utc>) -> ConditionsRecord {
    let layout = if metric { &METRIC } else { &IMPERIAL };
    let mut record = ConditionsRecord::new(now);

    record.temperature = float(root, layout.temperature);
    record.humidity = float(root, "relative_humidity");
    record.pressure = float(root, layout.pressure);
    record.dew_point = float(root, layout.dew_point);
    record.wind_speed = float(root, layout.wind_speed);
    record.wind_degrees = float(root, "wind_degrees");
    record.wind_direction = text(root, "wind_dir");
    record.current_condition = text(root, "weather");
    record.observation_time = Reading::from_option(
        root.child_text("observation_time_rfc822")
            .and_then(|t| DateTime::parse_from_rfc2822(t).ok())
            .map(|t| t.with_timezone(&Utc)),
    );
    record.icon = Reading::Value(map_icon(root.child_text("icon_url_name").unwrap_or_default()));

    record.units.temperature = Some(layout.temperature_unit.to_string());
    record.units.dew_point = Some(layout.temperature_unit.to_string());
    record.units.pressure = Some(layout.pressure_unit.to_string());
    record.units.wind_speed = Some(layout.wind_speed_unit.to_string());
    record.units.humidity = Some("%".to_string());
    record.units.wind_degrees = Some("°".to_string());

    record
}

fn float(root: &XmlElement, name: &str) -> Reading<f64> {
    Reading::from_option(root.child_text(name).and_then(|t| t.parse().ok()))
}

fn text(root: &XmlElement, name: &str) -> Reading<String> {
    Reading::from_option(root.child_text(name).map(str::to_string))
}
