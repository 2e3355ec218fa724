//! NWS icon file names to canonical icons.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;
use weather_common::WeatherIcon;

static ICON_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:.*/)?([a-zA-Z_]+)[0-9]*.*$").unwrap());

// Built from the NWS forecast icon legend. `n` marks night icons and `m_`
// the medium-size variants.
const ICON_TABLE: &[(&[&str], WeatherIcon)] = &[
    (&["skc", "nskc", "m_skc", "m_nskc"], WeatherIcon::ClearSky),
    (&["few", "nfew", "m_few", "m_nfew"], WeatherIcon::PartlyCloudy),
    (&["sct", "nsct", "m_sct", "m_nsct"], WeatherIcon::PartlyCloudy),
    (&["bkn", "nbkn", "m_bkn", "m_nbkn"], WeatherIcon::MostlyCloudy),
    (&["ovc", "novc", "m_ovc", "m_novc"], WeatherIcon::CloudySky),
    (&["fg", "nfg", "m_fg", "m_nfg"], WeatherIcon::Fog),
    (&["sctfg", "nbknfg", "m_sctfg", "m_nbknfg"], WeatherIcon::Fog),
    (&["du", "ndu", "m_du", "m_ndu"], WeatherIcon::BadVisibility),
    (&["fu", "nfu", "m_fu", "m_nfu"], WeatherIcon::BadVisibility),
    (&["wind", "nwind", "m_wind", "m_nwind"], WeatherIcon::Windy),
    (&["cold", "m_cold"], WeatherIcon::Cold),
    (&["hot", "m_hot"], WeatherIcon::Hot),
    (&["ra", "nra", "m_ra", "m_nra"], WeatherIcon::Rain),
    (&["shra", "nshra", "m_shra", "m_nshra"], WeatherIcon::RainShowers),
    (&["hi_shwrs", "hi_nshwrs", "m_hi_shwrs", "m_hi_nshwrs"], WeatherIcon::RainShowers),
    (&["tsra", "ntsra", "m_tsra", "m_ntsra"], WeatherIcon::Thunderstorms),
    (&["hi_tsra", "hi_ntsra", "m_hi_tsra", "m_hi_ntsra"], WeatherIcon::Thunderstorms),
    (&["scttsra", "nscttsra", "m_scttsra", "m_nscttsra"], WeatherIcon::Storms),
    (&["fzra", "nfzra", "m_fzra", "m_nfzra"], WeatherIcon::FreezingRain),
    (&["rasn", "nrasn", "m_rasn", "m_nrasn"], WeatherIcon::WintryMix),
    (&["sn", "nsn", "m_sn", "m_nsn"], WeatherIcon::Snow),
    (&["ip", "nip", "m_ip", "m_nip"], WeatherIcon::IcePellets),
    (&["raip", "nraip", "m_raip", "m_nraip"], WeatherIcon::IcePellets),
    (&["mix", "nmix", "m_mix", "m_nmix"], WeatherIcon::WintryMix),
    (&["blizzard", "m_blizzard"], WeatherIcon::Blizzard),
    (&["tor", "ntor", "m_tor", "m_ntor"], WeatherIcon::Storms),
    (&["hurr", "m_hurr"], WeatherIcon::Storms),
    (&["tropstorm", "m_wave"], WeatherIcon::Storms),
];

static ICON_MAP: Lazy<HashMap<&'static str, WeatherIcon>> = Lazy::new(|| {
    ICON_TABLE
        .iter()
        .flat_map(|(names, icon)| names.iter().map(move |name| (*name, *icon)))
        .collect()
});

/// Map an NWS icon URL or file name (e.g. `.../nsct40.jpg`) to a canonical icon.
///
/// Never fails; anything unrecognized maps to `Unknown`.
pub fn map_icon(icon_url: &str) -> WeatherIcon {
    if icon_url.is_empty() {
        warn!("Empty NWS icon, mapping to unknown");
        return WeatherIcon::Unknown;
    }

    let Some(caps) = ICON_URL.captures(icon_url) else {
        warn!(icon = %icon_url, "Cannot match NWS icon URL");
        return WeatherIcon::Unknown;
    };

    let name = &caps[1];
    match ICON_MAP.get(name) {
        Some(icon) => *icon,
        None => {
            warn!(name = %name, icon = %icon_url, "No icon mapping for NWS icon name");
            WeatherIcon::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::capture_logs;

    #[test]
    fn test_maps_full_url() {
        assert_eq!(
            map_icon("http://forecast.weather.gov/images/wtf/nsct40.jpg"),
            WeatherIcon::PartlyCloudy
        );
        assert_eq!(map_icon("ovc.jpg"), WeatherIcon::CloudySky);
        assert_eq!(map_icon("m_hi_nshwrs.png"), WeatherIcon::RainShowers);
        assert_eq!(map_icon("tsra80.jpg"), WeatherIcon::Thunderstorms);
    }

    #[test]
    fn test_night_and_medium_variants_share_icon() {
        for name in ["skc", "nskc", "m_skc", "m_nskc"] {
            assert_eq!(map_icon(name), WeatherIcon::ClearSky);
        }
    }

    #[test]
    fn test_empty_input_is_logged() {
        let (icon, logs) = capture_logs(|| map_icon(""));
        assert_eq!(icon, WeatherIcon::Unknown);
        assert!(logs.contains("Empty NWS icon"), "{}", logs);
    }

    #[test]
    fn test_unknown_inputs() {
        assert_eq!(map_icon(""), WeatherIcon::Unknown);
        assert_eq!(map_icon("http://example.com/"), WeatherIcon::Unknown);
        assert_eq!(map_icon("bogus.png"), WeatherIcon::Unknown);
        assert_eq!(map_icon("1234"), WeatherIcon::Unknown);
    }

    #[test]
    fn test_every_table_entry_maps() {
        for (names, icon) in ICON_TABLE {
            for name in names.iter() {
                assert_eq!(map_icon(&format!("{}.jpg", name)), *icon, "{}", name);
            }
        }
    }
}
