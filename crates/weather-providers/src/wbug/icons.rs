//! WeatherBug condition icons (`cond###.gif`) to canonical icons.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use weather_common::WeatherIcon;
use weather_common::WeatherIcon as I;

static ICON_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:.*/)?[a-zA-Z_]+([0-9]*).*$").unwrap());

/// Indexed by the condition number in the icon file name.
const ICON_TABLE: [WeatherIcon; 177] = [
    /* 000 */ I::ClearSky, I::CloudySky, I::PartlyCloudy, I::PartlyCloudy, I::PartlyCloudy, I::Rain,
    /* 006 */ I::Thunderstorms, I::ClearSky, I::Snow, I::Snow, I::Unknown, I::Snow,
    /* 012 */ I::Snow, I::CloudySky, I::Rain, I::Rain, I::PartlyCloudy, I::ClearSky,
    /* 018 */ I::Thunderstorms, I::Snow, I::Rain, I::IcePellets, I::Storms, I::BadVisibility,
    /* 024 */ I::MostlyCloudy, I::IcePellets, I::PartlyCloudy, I::Snow, I::IcePellets, I::Snow,
    /* 030 */ I::Thunderstorms, I::ClearSky, I::Snow, I::BadVisibility, I::MostlyCloudy, I::ClearSky,
    /* 036 */ I::IcePellets, I::Unknown, I::Rain, I::Rain, I::Snow, I::RainShowers,
    /* 042 */ I::RainShowers, I::Snow, I::Snow, I::RainShowers, I::FreezingRain, I::FreezingRain,
    /* 048 */ I::FreezingRain, I::FreezingRain, I::Windy, I::Fog, I::Storms, I::Thunderstorms,
    /* 054 */ I::Snow, I::Snow, I::WintryMix, I::WintryMix, I::Rain, I::Rain,
    /* 060 */ I::FreezingRain, I::FreezingRain, I::Snow, I::Snow, I::Hot, I::Hot,
    /* 066 */ I::CloudySky, I::ClearSky, I::MostlyCloudy, I::Cold, I::PartlyCloudy, I::CloudySky,
    /* 072 */ I::ClearSky, I::MostlyCloudy, I::Cold, I::Hot, I::Unknown, I::Unknown,
    /* 078 */ I::Snow, I::Snow, I::Snow, I::Rain, I::Rain, I::Rain,
    /* 084 */ I::Snow, I::Snow, I::Snow, I::Rain, I::Rain, I::Rain,
    /* 090 */ I::IcePellets, I::IcePellets, I::IcePellets, I::Storms, I::Storms, I::Storms,
    /* 096 */ I::Snow, I::Snow, I::Snow, I::IcePellets, I::IcePellets, I::IcePellets,
    /* 102 */ I::Snow, I::Snow, I::Snow, I::Storms, I::Storms, I::Storms,
    /* 108 */ I::RainShowers, I::RainShowers, I::RainShowers, I::Snow, I::Snow, I::Snow,
    /* 114 */ I::RainShowers, I::RainShowers, I::RainShowers, I::Snow, I::Snow, I::Snow,
    /* 120 */ I::FreezingRain, I::FreezingRain, I::FreezingRain, I::FreezingRain, I::FreezingRain, I::FreezingRain,
    /* 126 */ I::Snow, I::Snow, I::Snow, I::WintryMix, I::WintryMix, I::WintryMix,
    /* 132 */ I::Rain, I::Rain, I::Rain, I::FreezingRain, I::FreezingRain, I::FreezingRain,
    /* 138 */ I::Snow, I::Rain, I::Snow, I::Rain, I::IcePellets, I::Storms,
    /* 144 */ I::Snow, I::IcePellets, I::Snow, I::Storms, I::RainShowers, I::Snow,
    /* 150 */ I::RainShowers, I::Snow, I::FreezingRain, I::FreezingRain, I::Snow, I::WintryMix,
    /* 156 */ I::FreezingRain, I::FreezingRain, I::Windy, I::Fog, I::Snow, I::WintryMix,
    /* 162 */ I::Rain, I::RainShowers, I::WintryMix, I::Rain, I::FreezingRain, I::Rain,
    /* 168 */ I::FreezingRain, I::WintryMix, I::Rain, I::FreezingRain, I::WintryMix, I::Rain,
    /* 174 */ I::FreezingRain, I::WintryMix, I::Snow,
];

/// Map a WeatherBug icon URL or file name to a canonical icon.
///
/// Never fails; anything unrecognized maps to `Unknown`.
pub fn map_icon(icon_url: &str) -> WeatherIcon {
    if icon_url.is_empty() {
        warn!("Empty WeatherBug icon, mapping to unknown");
        return WeatherIcon::Unknown;
    }

    let number = match ICON_URL.captures(icon_url) {
        Some(caps) if !caps[1].is_empty() => caps[1].to_string(),
        _ => {
            warn!(icon = %icon_url, "Cannot match WeatherBug icon URL");
            return WeatherIcon::Unknown;
        }
    };

    match number.parse::<usize>() {
        Ok(index) => match ICON_TABLE.get(index) {
            Some(icon) => *icon,
            None => {
                warn!(number = index, icon = %icon_url, "No WeatherBug icon with this number");
                WeatherIcon::Unknown
            }
        },
        Err(e) => {
            warn!(number = %number, icon = %icon_url, error = %e, "Error parsing WeatherBug icon number");
            WeatherIcon::Unknown
        }
    }
}
