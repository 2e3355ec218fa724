//! Supported weather services.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A selectable weather data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// NOAA National Weather Service XML feeds
    Nws,
    /// WeatherBug REST/RSS API
    Wbug,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 2] = [ServiceKind::Nws, ServiceKind::Wbug];

    /// Persisted name, also reported as the `ws_service` field.
    pub fn name(self) -> &'static str {
        match self {
            ServiceKind::Nws => "nws",
            ServiceKind::Wbug => "wbug",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ServiceKind::Nws => "National Weather Service",
            ServiceKind::Wbug => "WeatherBug.com",
        }
    }

    /// Shortest allowed conditions refresh period in minutes.
    pub fn min_conditions_refresh(self) -> u32 {
        match self {
            ServiceKind::Nws | ServiceKind::Wbug => 15,
        }
    }

    /// Shortest allowed forecast refresh period in minutes.
    pub fn min_forecasts_refresh(self) -> u32 {
        match self {
            ServiceKind::Nws | ServiceKind::Wbug => 60,
        }
    }
}

impl Default for ServiceKind {
    fn default() -> Self {
        ServiceKind::Nws
    }
}

impl FromStr for ServiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nws" => Ok(ServiceKind::Nws),
            "wbug" => Ok(ServiceKind::Wbug),
            other => Err(format!("Unknown weather service: {}", other)),
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
