//! Weather station identity.

use serde::{Deserialize, Serialize};

/// A physical weather station resolved by a provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationSource {
    /// Provider-specific station identifier (e.g. "KPIT")
    pub id: String,
    pub name: String,
    /// Latitude in degrees
    pub latitude: Option<f64>,
    /// Longitude in degrees
    pub longitude: Option<f64>,
}

impl StationSource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn with_location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Both coordinates, if known.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
