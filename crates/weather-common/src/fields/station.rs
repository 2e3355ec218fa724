use serde::Serialize;

use super::{FieldType, FieldValue};
use crate::reading::Reading;
use crate::station::StationSource;

/// Static station fields, re-pushed to equipment after each forecast write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StationField {
    Latitude,
    Longitude,
    Name,
    Id,
    Service,
}

impl StationField {
    pub const ALL: [StationField; 5] = [
        StationField::Latitude,
        StationField::Longitude,
        StationField::Name,
        StationField::Id,
        StationField::Service,
    ];

    pub fn find(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            StationField::Latitude => "latitude",
            StationField::Longitude => "longitude",
            StationField::Name => "name",
            StationField::Id => "id",
            StationField::Service => "service",
        }
    }

    pub fn field_type(self) -> FieldType {
        match self {
            StationField::Latitude | StationField::Longitude => FieldType::Float,
            _ => FieldType::String,
        }
    }

    pub fn external_name(self) -> String {
        format!("ws_{}", self.name())
    }

    /// Read this field; `service` is the configured service name (e.g. "nws").
    pub fn value(self, station: &StationSource, service: &str) -> Reading<FieldValue> {
        match self {
            StationField::Latitude => Reading::from_option(station.latitude.map(FieldValue::Float)),
            StationField::Longitude => {
                Reading::from_option(station.longitude.map(FieldValue::Float))
            }
            StationField::Name => Reading::Value(FieldValue::Text(station.name.clone())),
            StationField::Id => Reading::Value(FieldValue::Text(station.id.clone())),
            StationField::Service => Reading::Value(FieldValue::Text(service.to_string())),
        }
    }

    pub fn units(self) -> Option<String> {
        match self {
            StationField::Latitude | StationField::Longitude => Some("°".to_string()),
            _ => None,
        }
    }
}
