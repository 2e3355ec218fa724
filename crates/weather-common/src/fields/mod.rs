//! Named, typed field catalogs for station, conditions and forecast records.
//!
//! Each catalog entry knows its semantic type, how to read its value from a
//! record, and the external name used for equipment point references:
//! - station fields: `ws_<name>`
//! - conditions fields: `wc_<name>`
//! - forecast fields: `wf<day>_<name>` with a zero-based day index

mod conditions;
mod forecast;
mod station;

pub use conditions::ConditionsField;
pub use forecast::ForecastField;
pub use station::StationField;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

/// Length of one "stamp" interval in milliseconds (10 minutes).
pub const STAMP_INTERVAL_MS: i64 = 600_000;

/// Unit reported for the `*Stamp` fields.
pub const STAMP_UNITS: &str = "10 minute intervals";

static STATION_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ws_(.+)$").unwrap());
static CONDITIONS_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^wc_(.+)$").unwrap());
static FORECAST_REF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^wf(\d+)_(.+)$").unwrap());

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldType {
    String,
    Float,
    Integer,
    Date,
}

impl FieldType {
    /// Only numeric fields are ever written to equipment.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Float | FieldType::Integer)
    }
}

/// A field value read from a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Float(f64),
    Integer(i64),
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Numeric value suitable for an equipment write; text and dates yield `None`.
    pub fn as_numeric(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(v) => Some(*v as f64),
            FieldValue::Text(_) | FieldValue::Date(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Integer(v) => write!(f, "{}", v),
            FieldValue::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

/// Number of 10-minute intervals since the epoch.
pub fn stamp(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis() / STAMP_INTERVAL_MS
}

/// A parsed equipment point reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalName {
    Station(StationField),
    Conditions(ConditionsField),
    Forecast { day: usize, field: ForecastField },
}

impl ExternalName {
    /// Parse an equipment reference name such as `wc_temperature` or
    /// `wf2_highestTemperature`. Field names match case-insensitively.
    pub fn parse(reference: &str) -> Option<Self> {
        if let Some(caps) = STATION_REF.captures(reference) {
            return StationField::find(&caps[1]).map(ExternalName::Station);
        }
        if let Some(caps) = CONDITIONS_REF.captures(reference) {
            return ConditionsField::find(&caps[1]).map(ExternalName::Conditions);
        }
        if let Some(caps) = FORECAST_REF.captures(reference) {
            let day = caps[1].parse::<usize>().ok()?;
            let field = ForecastField::find(&caps[2])?;
            return Some(ExternalName::Forecast { day, field });
        }
        None
    }

    /// Back to the canonical external name.
    pub fn to_external(self) -> String {
        match self {
            ExternalName::Station(f) => f.external_name(),
            ExternalName::Conditions(f) => f.external_name(),
            ExternalName::Forecast { day, field } => field.external_name(day),
        }
    }
}
