//! Typed readers for the WeatherBug `aws:` XML payloads.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use weather_common::{ConditionsRecord, ForecastRecord, Reading, StationSource, WeatherError, WeatherResult};

use super::icons::map_icon;
use crate::xml::XmlElement;

/// Offset applied when an observation carries no time zone.
const DEFAULT_ZONE: &str = "CST";

/// A station returned by `getStationsXML`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WbugStation {
    pub id: String,
    pub name: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub zip_code: Option<String>,
    pub city_code: Option<i64>,
    pub distance: Option<f64>,
    pub unit: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl WbugStation {
    pub fn to_station_source(&self) -> StationSource {
        StationSource {
            id: self.id.clone(),
            name: self.name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// A city returned by `getLocationsXML`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WbugLocation {
    pub city_name: String,
    pub state_name: String,
    pub country_name: String,
    pub zip_code: Option<String>,
    pub city_code: Option<i64>,
    /// 0 for US cities
    pub city_type: Option<i32>,
}

impl WbugLocation {
    pub fn is_us(&self) -> bool {
        self.city_type == Some(0)
    }

    /// Key used to look up stations for this location.
    pub fn key(&self) -> Option<LocationKey> {
        match (&self.zip_code, self.city_code) {
            (Some(zip), _) if self.is_us() => Some(LocationKey::Zip(zip.clone())),
            (_, Some(code)) => Some(LocationKey::CityCode(code)),
            (Some(zip), None) => Some(LocationKey::Zip(zip.clone())),
            (None, None) => None,
        }
    }

    pub fn display_name(&self) -> String {
        if self.is_us() {
            format!("{}, {}", self.city_name, self.state_name)
        } else {
            format!("{}, {}", self.city_name, self.country_name)
        }
    }
}

/// A WeatherBug location: US zip code or international city code.
///
/// Written as `Z<zip>` or `C<citycode>`; a bare number is taken as a zip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationKey {
    Zip(String),
    CityCode(i64),
}

impl LocationKey {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(code) = text.strip_prefix('C') {
            return code.parse().ok().map(LocationKey::CityCode);
        }
        let zip = text.strip_prefix('Z').unwrap_or(text);
        if !zip.is_empty() && zip.chars().all(|c| c.is_ascii_digit()) {
            Some(LocationKey::Zip(zip.to_string()))
        } else {
            None
        }
    }

    /// Query parameter for `getStationsXML`.
    pub fn query_param(&self) -> (&'static str, String) {
        match self {
            LocationKey::Zip(zip) => ("zipCode", zip.clone()),
            LocationKey::CityCode(code) => ("cityCode", code.to_string()),
        }
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKey::Zip(zip) => write!(f, "Z{}", zip),
            LocationKey::CityCode(code) => write!(f, "C{}", code),
        }
    }
}

/// Turn a response without the expected payload into an error.
///
/// WeatherBug reports failures as an HTML page whose first `<h1>` carries
/// the message.
pub fn payload_error(root: &XmlElement) -> WeatherError {
    let heading = if root.name() == "h1" {
        Some(root.text())
    } else {
        root.descendants("h1").into_iter().next().map(|h| h.text())
    };
    match heading.filter(|h| !h.is_empty()) {
        Some(message) => WeatherError::provider(message.to_string()),
        None => WeatherError::provider("Unknown error"),
    }
}

/// `aws:weather` element of an RSS response.
fn rss_weather(root: &XmlElement) -> WeatherResult<&XmlElement> {
    root.find("channel/aws:weather").ok_or_else(|| payload_error(root))
}

pub fn parse_stations(root: &XmlElement) -> WeatherResult<Vec<WbugStation>> {
    let Some(stations) = root.find("aws:stations") else {
        return Err(payload_error(root));
    };
    Ok(stations
        .children("aws:station")
        .map(|s| WbugStation {
            id: attr(s, "id"),
            name: attr(s, "name"),
            city: attr(s, "city"),
            state: attr(s, "state"),
            country: attr(s, "country"),
            zip_code: s.attr("zipcode").filter(|z| !z.is_empty()).map(str::to_string),
            city_code: s.attr("citycode").and_then(|c| c.parse().ok()),
            distance: s.attr("distance").and_then(|d| d.parse().ok()),
            unit: attr(s, "Unit"),
            latitude: s.attr("latitude").and_then(|l| l.parse().ok()),
            longitude: s.attr("longitude").and_then(|l| l.parse().ok()),
        })
        .filter(|s| !s.id.is_empty())
        .collect())
}

pub fn parse_locations(root: &XmlElement) -> WeatherResult<Vec<WbugLocation>> {
    let Some(locations) = root.find("aws:locations") else {
        return Err(payload_error(root));
    };
    Ok(locations
        .children("aws:location")
        .map(|l| WbugLocation {
            city_name: attr(l, "cityname"),
            state_name: attr(l, "statename"),
            country_name: attr(l, "countryname"),
            zip_code: l.attr("zipcode").filter(|z| !z.is_empty()).map(str::to_string),
            city_code: l.attr("citycode").and_then(|c| c.parse().ok()),
            city_type: l.attr("citytype").and_then(|c| c.parse().ok()),
        })
        .collect())
}

/// Convert a `getLiveWeatherRSS` response into a conditions record.
pub fn parse_live_weather(root: &XmlElement, now: DateTime<Utc>) -> WeatherResult<ConditionsRecord> {
    let weather = rss_weather(root)?;
    let Some(ob) = weather.child("aws:ob") else {
        return Err(payload_error(root));
    };

    let mut record = ConditionsRecord::new(now);

    record.temperature = number(ob, "aws:temp");
    record.humidity = number(ob, "aws:humidity");
    record.pressure = number(ob, "aws:pressure");
    record.dew_point = number(ob, "aws:dew-point");
    record.feels_like = number(ob, "aws:feels-like");
    record.wet_bulb = number(ob, "aws:wet-bulb");
    record.wind_speed = number(ob, "aws:wind-speed");
    record.avg_wind_speed = number(ob, "aws:wind-speed-avg");
    record.rain_rate = number(ob, "aws:rain-rate");
    record.rain_today = number(ob, "aws:rain-today");
    record.wind_direction = text(ob, "aws:wind-direction");
    record.avg_wind_direction = text(ob, "aws:wind-direction-avg");
    record.current_condition = text(ob, "aws:current-condition");
    record.icon = Reading::Value(map_icon(
        ob.child("aws:current-condition")
            .and_then(|c| c.attr("icon"))
            .unwrap_or_default(),
    ));
    record.source_url = text(weather, "aws:WebURL");
    record.observation_time = Reading::from_option(ob.child("aws:ob-date").and_then(observation_time));

    let units = &mut record.units;
    units.temperature = unit(ob, "aws:temp");
    units.humidity = unit(ob, "aws:humidity");
    units.pressure = unit(ob, "aws:pressure");
    units.dew_point = unit(ob, "aws:dew-point");
    units.feels_like = unit(ob, "aws:feels-like");
    units.wet_bulb = unit(ob, "aws:wet-bulb");
    units.wind_speed = unit(ob, "aws:wind-speed");
    units.avg_wind_speed = unit(ob, "aws:wind-speed-avg");
    units.rain_rate = unit(ob, "aws:rain-rate");
    units.rain_today = unit(ob, "aws:rain-today");

    Ok(record)
}

/// Convert a `getForecastRSS` response into forecast days, in order.
pub fn parse_forecasts(root: &XmlElement, now: DateTime<Utc>) -> WeatherResult<Vec<ForecastRecord>> {
    let weather = rss_weather(root)?;
    let Some(forecasts) = weather.child("aws:forecasts") else {
        return Err(payload_error(root));
    };

    Ok(forecasts
        .children("aws:forecast")
        .map(|f| {
            let mut record = ForecastRecord::new(now);
            record.title = text(f, "aws:title");
            record.prediction = text(f, "aws:short-prediction");
            record.highest_temperature = number(f, "aws:high");
            record.lowest_temperature = number(f, "aws:low");
            record.icon = Reading::Value(map_icon(
                f.child("aws:image").and_then(|i| i.attr("icon")).unwrap_or_default(),
            ));
            record.temperature_units = unit(f, "aws:high").or_else(|| unit(f, "aws:low"));
            record
        })
        .collect())
}

fn attr(element: &XmlElement, name: &str) -> String {
    element.attr(name).unwrap_or_default().to_string()
}

fn number(parent: &XmlElement, name: &str) -> Reading<f64> {
    Reading::from_option(parent.child_text(name).and_then(|t| t.parse().ok()))
}

fn text(parent: &XmlElement, name: &str) -> Reading<String> {
    Reading::from_option(parent.child_text(name).map(fix_degrees))
}

fn unit(parent: &XmlElement, name: &str) -> Option<String> {
    let units = fix_degrees(parent.child(name)?.attr("units")?);
    match units.as_str() {
        "" => None,
        "km" => Some("km/h".to_string()),
        _ => Some(units),
    }
}

fn fix_degrees(text: &str) -> String {
    text.replace("&deg;", "°")
}

/// Assemble `aws:ob-date` parts into an instant.
fn observation_time(date: &XmlElement) -> Option<DateTime<Utc>> {
    let part = |name: &str, attribute: &str| -> Option<u32> {
        date.child(name)?.attr(attribute)?.trim().parse().ok()
    };

    let year = date.child("aws:year")?.attr("number")?.trim().parse().ok()?;
    let day = NaiveDate::from_ymd_opt(year, part("aws:month", "number")?, part("aws:day", "number")?)?;
    let local = day.and_hms_opt(
        part("aws:hour", "hour-24")?,
        part("aws:minute", "number").unwrap_or(0),
        part("aws:second", "number").unwrap_or(0),
    )?;

    let zone = date
        .child("aws:time-zone")
        .and_then(|z| z.attr("abbrv"))
        .filter(|z| !z.is_empty())
        .unwrap_or(DEFAULT_ZONE);
    zone_offset(zone)
        .from_local_datetime(&local)
        .single()
        .map(|t| t.with_timezone(&Utc))
}

/// North American zone abbreviations used by the feed; anything else is UTC.
fn zone_offset(abbreviation: &str) -> FixedOffset {
    let hours = match abbreviation.to_ascii_uppercase().as_str() {
        "EST" => -5,
        "EDT" => -4,
        "CST" => -6,
        "CDT" => -5,
        "MST" => -7,
        "MDT" => -6,
        "PST" => -8,
        "PDT" => -7,
        "AKST" => -9,
        "AKDT" => -8,
        "HST" => -10,
        _ => 0,
    };
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_common::WeatherIcon;

    const LIVE: &str = r#"<rss version="2.0" xmlns:aws="http://www.aws.com/aws">
  <channel>
    <title>Observations from Pittsburgh, PA</title>
    <aws:weather xmlns:aws="http://www.aws.com/aws">
      <aws:WebURL>http://weather.weatherbug.com/PA/Pittsburgh-weather.html</aws:WebURL>
      <aws:ob>
        <aws:ob-date>
          <aws:year number="2011"/><aws:month number="6" text="June" abbrv="Jun"/>
          <aws:day number="14" text="Tuesday" abbrv="Tue"/>
          <aws:hour number="2" hour-24="14"/><aws:minute number="51"/><aws:second number="00"/>
          <aws:am-pm abbrv="PM"/><aws:time-zone offset="-4" text="Eastern Daylight Time (USA)" abbrv="EDT"/>
        </aws:ob-date>
        <aws:station-id>PTTSB</aws:station-id>
        <aws:station>Carnegie Science Center</aws:station>
        <aws:current-condition icon="http://deskwx.weatherbug.com/images/Forecast/icons/cond002.gif">Partly Cloudy</aws:current-condition>
        <aws:dew-point units="&amp;deg;F">55</aws:dew-point>
        <aws:feels-like units="&amp;deg;F">73</aws:feels-like>
        <aws:humidity units="%">56</aws:humidity>
        <aws:pressure units="&quot;">30.01</aws:pressure>
        <aws:rain-rate units="&quot;">0.00</aws:rain-rate>
        <aws:rain-today units="&quot;">0.12</aws:rain-today>
        <aws:temp units="&amp;deg;F">72.5</aws:temp>
        <aws:wet-bulb units="&amp;deg;F">61.2</aws:wet-bulb>
        <aws:wind-speed units="km">9</aws:wind-speed>
        <aws:wind-direction>SW</aws:wind-direction>
        <aws:wind-speed-avg units="mph">N/A</aws:wind-speed-avg>
        <aws:wind-direction-avg>WSW</aws:wind-direction-avg>
      </aws:ob>
    </aws:weather>
  </channel>
</rss>"#;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2011, 6, 14, 19, 0, 0).unwrap()
    }

    #[test]
    fn test_live_weather() {
        let root = XmlElement::parse(LIVE).unwrap();
        let record = parse_live_weather(&root, now()).unwrap();

        assert_eq!(record.temperature, Reading::Value(72.5));
        assert_eq!(record.humidity, Reading::Value(56.0));
        assert_eq!(record.rain_today, Reading::Value(0.12));
        assert_eq!(record.wet_bulb, Reading::Value(61.2));
        assert_eq!(record.avg_wind_speed, Reading::Null);
        assert_eq!(record.wind_degrees, Reading::Unsupported);
        assert_eq!(record.avg_wind_degrees, Reading::Unsupported);
        assert_eq!(record.wind_direction, Reading::Value("SW".to_string()));
        assert_eq!(record.icon, Reading::Value(WeatherIcon::PartlyCloudy));
        assert_eq!(
            record.source_url,
            Reading::Value("http://weather.weatherbug.com/PA/Pittsburgh-weather.html".to_string())
        );
        assert_eq!(
            record.observation_time,
            Reading::Value(Utc.with_ymd_and_hms(2011, 6, 14, 18, 51, 0).unwrap())
        );
    }

    #[test]
    fn test_live_weather_units() {
        let root = XmlElement::parse(LIVE).unwrap();
        let record = parse_live_weather(&root, now()).unwrap();

        assert_eq!(record.units.temperature.as_deref(), Some("°F"));
        assert_eq!(record.units.pressure.as_deref(), Some("\""));
        assert_eq!(record.units.wind_speed.as_deref(), Some("km/h"));
        assert_eq!(record.units.humidity.as_deref(), Some("%"));
    }

    #[test]
    fn test_error_page() {
        let root = XmlElement::parse("<h1>Invalid ACode</h1>").unwrap();
        let err = parse_live_weather(&root, now()).unwrap_err();
        assert!(err.to_string().contains("Invalid ACode"));

        let root = XmlElement::parse("<html><body><p>oops</p></body></html>").unwrap();
        let err = parse_stations(&root).unwrap_err();
        assert!(err.to_string().contains("Unknown error"));
    }

    #[test]
    fn test_location_key_parse() {
        assert_eq!(LocationKey::parse("Z15222"), Some(LocationKey::Zip("15222".to_string())));
        assert_eq!(LocationKey::parse(" 15222 "), Some(LocationKey::Zip("15222".to_string())));
        assert_eq!(LocationKey::parse("C58617"), Some(LocationKey::CityCode(58617)));
        assert_eq!(LocationKey::parse("Cabc"), None);
        assert_eq!(LocationKey::parse("Pittsburgh"), None);
        assert_eq!(LocationKey::CityCode(58617).to_string(), "C58617");
        assert_eq!(LocationKey::Zip("15222".into()).query_param(), ("zipCode", "15222".to_string()));
    }

    #[test]
    fn test_location_keys() {
        let us = WbugLocation {
            city_name: "Pittsburgh".into(),
            state_name: "PA".into(),
            zip_code: Some("15222".into()),
            city_code: Some(0),
            city_type: Some(0),
            ..Default::default()
        };
        assert_eq!(us.key(), Some(LocationKey::Zip("15222".into())));
        assert_eq!(us.display_name(), "Pittsburgh, PA");

        let intl = WbugLocation {
            city_name: "Paris".into(),
            country_name: "France".into(),
            city_code: Some(58617),
            city_type: Some(1),
            ..Default::default()
        };
        assert_eq!(intl.key(), Some(LocationKey::CityCode(58617)));
        assert_eq!(intl.display_name(), "Paris, France");
    }
}
