use serde::Serialize;

use super::{stamp, FieldType, FieldValue, STAMP_UNITS};
use crate::conditions::ConditionsRecord;
use crate::reading::Reading;

/// Fields of a current conditions snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConditionsField {
    UpdateTime,
    UpdateStamp,
    AvgWindDirection,
    AvgWindDegrees,
    AvgWindSpeed,
    FeelsLike,
    Temperature,
    Humidity,
    Pressure,
    CurrentCondition,
    DewPoint,
    WindSpeed,
    WindDirection,
    WindDegrees,
    RainRate,
    RainToday,
    ObservationTime,
    ObservationStamp,
    WetBulb,
    IconName,
    IconValue,
    SourceUrl,
}

impl ConditionsField {
    pub const ALL: [ConditionsField; 22] = [
        ConditionsField::UpdateTime,
        ConditionsField::UpdateStamp,
        ConditionsField::AvgWindDirection,
        ConditionsField::AvgWindDegrees,
        ConditionsField::AvgWindSpeed,
        ConditionsField::FeelsLike,
        ConditionsField::Temperature,
        ConditionsField::Humidity,
        ConditionsField::Pressure,
        ConditionsField::CurrentCondition,
        ConditionsField::DewPoint,
        ConditionsField::WindSpeed,
        ConditionsField::WindDirection,
        ConditionsField::WindDegrees,
        ConditionsField::RainRate,
        ConditionsField::RainToday,
        ConditionsField::ObservationTime,
        ConditionsField::ObservationStamp,
        ConditionsField::WetBulb,
        ConditionsField::IconName,
        ConditionsField::IconValue,
        ConditionsField::SourceUrl,
    ];

    /// Case-insensitive lookup by symbolic name.
    pub fn find(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// Symbolic name, e.g. `avgWindSpeed`.
    pub fn name(self) -> &'static str {
        match self {
            ConditionsField::UpdateTime => "updateTime",
            ConditionsField::UpdateStamp => "updateStamp",
            ConditionsField::AvgWindDirection => "avgWindDirection",
            ConditionsField::AvgWindDegrees => "avgWindDegrees",
            ConditionsField::AvgWindSpeed => "avgWindSpeed",
            ConditionsField::FeelsLike => "feelsLike",
            ConditionsField::Temperature => "temperature",
            ConditionsField::Humidity => "humidity",
            ConditionsField::Pressure => "pressure",
            ConditionsField::CurrentCondition => "currentCondition",
            ConditionsField::DewPoint => "dewPoint",
            ConditionsField::WindSpeed => "windSpeed",
            ConditionsField::WindDirection => "windDirection",
            ConditionsField::WindDegrees => "windDegrees",
            ConditionsField::RainRate => "rainRate",
            ConditionsField::RainToday => "rainToday",
            ConditionsField::ObservationTime => "observationTime",
            ConditionsField::ObservationStamp => "observationStamp",
            ConditionsField::WetBulb => "wetBulb",
            ConditionsField::IconName => "iconName",
            ConditionsField::IconValue => "iconValue",
            ConditionsField::SourceUrl => "sourceURL",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            ConditionsField::UpdateTime | ConditionsField::ObservationTime => FieldType::Date,
            ConditionsField::UpdateStamp
            | ConditionsField::ObservationStamp
            | ConditionsField::IconValue => FieldType::Integer,
            ConditionsField::AvgWindDirection
            | ConditionsField::CurrentCondition
            | ConditionsField::WindDirection
            | ConditionsField::IconName
            | ConditionsField::SourceUrl => FieldType::String,
            _ => FieldType::Float,
        }
    }

    pub fn external_name(self) -> String {
        format!("wc_{}", self.name())
    }

    /// Read this field from a record.
    pub fn value(self, record: &ConditionsRecord) -> Reading<FieldValue> {
        let float = |r: &Reading<f64>| r.clone().map(FieldValue::Float);
        let text = |r: &Reading<String>| r.clone().map(FieldValue::Text);
        match self {
            ConditionsField::UpdateTime => Reading::Value(FieldValue::Date(record.update_time)),
            ConditionsField::UpdateStamp => {
                Reading::Value(FieldValue::Integer(stamp(record.update_time)))
            }
            ConditionsField::AvgWindDirection => text(&record.avg_wind_direction),
            ConditionsField::AvgWindDegrees => float(&record.avg_wind_degrees),
            ConditionsField::AvgWindSpeed => float(&record.avg_wind_speed),
            ConditionsField::FeelsLike => float(&record.feels_like),
            ConditionsField::Temperature => float(&record.temperature),
            ConditionsField::Humidity => float(&record.humidity),
            ConditionsField::Pressure => float(&record.pressure),
            ConditionsField::CurrentCondition => text(&record.current_condition),
            ConditionsField::DewPoint => float(&record.dew_point),
            ConditionsField::WindSpeed => float(&record.wind_speed),
            ConditionsField::WindDirection => text(&record.wind_direction),
            ConditionsField::WindDegrees => float(&record.wind_degrees),
            ConditionsField::RainRate => float(&record.rain_rate),
            ConditionsField::RainToday => float(&record.rain_today),
            ConditionsField::ObservationTime => record.observation_time.clone().map(FieldValue::Date),
            ConditionsField::ObservationStamp => record
                .observation_time
                .clone()
                .map(|t| FieldValue::Integer(stamp(t))),
            ConditionsField::WetBulb => float(&record.wet_bulb),
            ConditionsField::IconName => record
                .icon
                .clone()
                .map(|i| FieldValue::Text(i.display_name().to_string())),
            ConditionsField::IconValue => record
                .icon
                .clone()
                .map(|i| FieldValue::Integer(i.value() as i64)),
            ConditionsField::SourceUrl => text(&record.source_url),
        }
    }

    pub fn is_supported(self, record: &ConditionsRecord) -> bool {
        self.value(record).is_supported()
    }

    /// Unit string reported by the provider for this field, if any.
    pub fn units(self, record: &ConditionsRecord) -> Option<String> {
        let u = &record.units;
        match self {
            ConditionsField::UpdateStamp | ConditionsField::ObservationStamp => {
                Some(STAMP_UNITS.to_string())
            }
            ConditionsField::AvgWindDegrees => u.avg_wind_degrees.clone(),
            ConditionsField::AvgWindSpeed => u.avg_wind_speed.clone(),
            ConditionsField::FeelsLike => u.feels_like.clone(),
            ConditionsField::Temperature => u.temperature.clone(),
            ConditionsField::Humidity => u.humidity.clone(),
            ConditionsField::Pressure => u.pressure.clone(),
            ConditionsField::DewPoint => u.dew_point.clone(),
            ConditionsField::WindSpeed => u.wind_speed.clone(),
            ConditionsField::WindDegrees => u.wind_degrees.clone(),
            ConditionsField::RainRate => u.rain_rate.clone(),
            ConditionsField::RainToday => u.rain_today.clone(),
            ConditionsField::WetBulb => u.wet_bulb.clone(),
            _ => None,
        }
    }
}
