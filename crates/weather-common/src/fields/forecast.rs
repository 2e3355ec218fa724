use serde::Serialize;

use super::{stamp, FieldType, FieldValue, STAMP_UNITS};
use crate::forecast::ForecastRecord;
use crate::reading::Reading;

/// Fields of one forecast day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForecastField {
    UpdateTime,
    UpdateStamp,
    Title,
    HighestTemperature,
    LowestTemperature,
    ProbPrecipitation,
    Prediction,
    IconName,
    IconValue,
}

impl ForecastField {
    pub const ALL: [ForecastField; 9] = [
        ForecastField::UpdateTime,
        ForecastField::UpdateStamp,
        ForecastField::Title,
        ForecastField::HighestTemperature,
        ForecastField::LowestTemperature,
        ForecastField::ProbPrecipitation,
        ForecastField::Prediction,
        ForecastField::IconName,
        ForecastField::IconValue,
    ];

    pub fn find(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            ForecastField::UpdateTime => "updateTime",
            ForecastField::UpdateStamp => "updateStamp",
            ForecastField::Title => "title",
            ForecastField::HighestTemperature => "highestTemperature",
            ForecastField::LowestTemperature => "lowestTemperature",
            ForecastField::ProbPrecipitation => "probPrecipitation",
            ForecastField::Prediction => "prediction",
            ForecastField::IconName => "iconName",
            ForecastField::IconValue => "iconValue",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            ForecastField::UpdateTime => FieldType::Date,
            ForecastField::UpdateStamp | ForecastField::IconValue => FieldType::Integer,
            ForecastField::Title | ForecastField::Prediction | ForecastField::IconName => {
                FieldType::String
            }
            ForecastField::HighestTemperature
            | ForecastField::LowestTemperature
            | ForecastField::ProbPrecipitation => FieldType::Float,
        }
    }

    /// External name for a zero-based forecast day, e.g. `wf0_title`.
    pub fn external_name(self, day: usize) -> String {
        format!("wf{}_{}", day, self.name())
    }

    /// External name with a placeholder instead of the day, e.g. `wf?_title`.
    pub fn placeholder_name(self, placeholder: char) -> String {
        format!("wf{}_{}", placeholder, self.name())
    }

    pub fn value(self, record: &ForecastRecord) -> Reading<FieldValue> {
        match self {
            ForecastField::UpdateTime => Reading::Value(FieldValue::Date(record.update_time)),
            ForecastField::UpdateStamp => {
                Reading::Value(FieldValue::Integer(stamp(record.update_time)))
            }
            ForecastField::Title => record.title.clone().map(FieldValue::Text),
            ForecastField::HighestTemperature => {
                record.highest_temperature.clone().map(FieldValue::Float)
            }
            ForecastField::LowestTemperature => {
                record.lowest_temperature.clone().map(FieldValue::Float)
            }
            ForecastField::ProbPrecipitation => {
                record.prob_precipitation.clone().map(FieldValue::Float)
            }
            ForecastField::Prediction => record.prediction.clone().map(FieldValue::Text),
            ForecastField::IconName => record
                .icon
                .clone()
                .map(|i| FieldValue::Text(i.display_name().to_string())),
            ForecastField::IconValue => record
                .icon
                .clone()
                .map(|i| FieldValue::Integer(i.value() as i64)),
        }
    }

    pub fn is_supported(self, record: &ForecastRecord) -> bool {
        self.value(record).is_supported()
    }

    pub fn units(self, record: &ForecastRecord) -> Option<String> {
        match self {
            ForecastField::UpdateStamp => Some(STAMP_UNITS.to_string()),
            ForecastField::HighestTemperature | ForecastField::LowestTemperature => {
                record.temperature_units.clone()
            }
            ForecastField::ProbPrecipitation => Some("%".to_string()),
            _ => None,
        }
    }
}
