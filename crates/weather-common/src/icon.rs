//! Canonical weather icons shared by every provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weather pictogram that provider-specific icon identifiers are mapped into.
///
/// The numeric value is what gets written to equipment (`iconValue`), so the
/// discriminants are part of the external contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherIcon {
    Unknown = 0,
    ClearSky = 1,
    PartlyCloudy = 2,
    MostlyCloudy = 3,
    CloudySky = 4,
    Fog = 5,
    BadVisibility = 6,
    Windy = 7,
    Cold = 8,
    Hot = 9,
    Drizzle = 10,
    Rain = 11,
    RainShowers = 12,
    Storms = 13,
    Thunderstorms = 14,
    Flurries = 15,
    Snow = 16,
    SnowShowers = 17,
    Blizzard = 18,
    FreezingDrizzle = 19,
    FreezingRain = 20,
    IcePellets = 21,
    WintryMix = 22,
}

impl WeatherIcon {
    /// All icons in value order.
    pub const ALL: [WeatherIcon; 23] = [
        WeatherIcon::Unknown,
        WeatherIcon::ClearSky,
        WeatherIcon::PartlyCloudy,
        WeatherIcon::MostlyCloudy,
        WeatherIcon::CloudySky,
        WeatherIcon::Fog,
        WeatherIcon::BadVisibility,
        WeatherIcon::Windy,
        WeatherIcon::Cold,
        WeatherIcon::Hot,
        WeatherIcon::Drizzle,
        WeatherIcon::Rain,
        WeatherIcon::RainShowers,
        WeatherIcon::Storms,
        WeatherIcon::Thunderstorms,
        WeatherIcon::Flurries,
        WeatherIcon::Snow,
        WeatherIcon::SnowShowers,
        WeatherIcon::Blizzard,
        WeatherIcon::FreezingDrizzle,
        WeatherIcon::FreezingRain,
        WeatherIcon::IcePellets,
        WeatherIcon::WintryMix,
    ];

    /// Numeric value written to equipment points.
    pub fn value(self) -> i32 {
        self as i32
    }

    /// Look up an icon by its numeric value.
    pub fn from_value(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Human readable name shown in the icon legend.
    pub fn display_name(self) -> &'static str {
        match self {
            WeatherIcon::Unknown => "Unknown",
            WeatherIcon::ClearSky => "Clear Sky",
            WeatherIcon::PartlyCloudy => "Partly Cloudy",
            WeatherIcon::MostlyCloudy => "Mostly Cloudy",
            WeatherIcon::CloudySky => "Cloudy Sky",
            WeatherIcon::Fog => "Fog",
            WeatherIcon::BadVisibility => "Bad Visibility",
            WeatherIcon::Windy => "Windy",
            WeatherIcon::Cold => "Cold",
            WeatherIcon::Hot => "Hot",
            WeatherIcon::Drizzle => "Drizzle",
            WeatherIcon::Rain => "Rain",
            WeatherIcon::RainShowers => "Rain Showers",
            WeatherIcon::Storms => "Storms",
            WeatherIcon::Thunderstorms => "Thunderstorms",
            WeatherIcon::Flurries => "Flurries",
            WeatherIcon::Snow => "Snow",
            WeatherIcon::SnowShowers => "SnowShowers",
            WeatherIcon::Blizzard => "Blizzard",
            WeatherIcon::FreezingDrizzle => "Freezing Drizzle",
            WeatherIcon::FreezingRain => "Freezing Rain",
            WeatherIcon::IcePellets => "Ice Pellets",
            WeatherIcon::WintryMix => "Wintry Mix",
        }
    }

    /// Variant name, used as the `iconName` field value.
    pub fn name(self) -> &'static str {
        match self {
            WeatherIcon::Unknown => "Unknown",
            WeatherIcon::ClearSky => "ClearSky",
            WeatherIcon::PartlyCloudy => "PartlyCloudy",
            WeatherIcon::MostlyCloudy => "MostlyCloudy",
            WeatherIcon::CloudySky => "CloudySky",
            WeatherIcon::Fog => "Fog",
            WeatherIcon::BadVisibility => "BadVisibility",
            WeatherIcon::Windy => "Windy",
            WeatherIcon::Cold => "Cold",
            WeatherIcon::Hot => "Hot",
            WeatherIcon::Drizzle => "Drizzle",
            WeatherIcon::Rain => "Rain",
            WeatherIcon::RainShowers => "RainShowers",
            WeatherIcon::Storms => "Storms",
            WeatherIcon::Thunderstorms => "Thunderstorms",
            WeatherIcon::Flurries => "Flurries",
            WeatherIcon::Snow => "Snow",
            WeatherIcon::SnowShowers => "SnowShowers",
            WeatherIcon::Blizzard => "Blizzard",
            WeatherIcon::FreezingDrizzle => "FreezingDrizzle",
            WeatherIcon::FreezingRain => "FreezingRain",
            WeatherIcon::IcePellets => "IcePellets",
            WeatherIcon::WintryMix => "WintryMix",
        }
    }
}

impl Default for WeatherIcon {
    fn default() -> Self {
        WeatherIcon::Unknown
    }
}

impl fmt::Display for WeatherIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
