//! Canned provider documents.
//!
//! Trimmed copies of real NWS and WeatherBug responses for Pittsburgh, PA,
//! with enough structure to exercise every parser path.

/// Zip code every fixture below describes.
pub const FIXTURE_ZIP: &str = "15222";

/// NWS station nearest to the fixture forecast point.
pub const NOAA_NEAREST_STATION: &str = "KAGC";

/// Days in the NDFD fixture.
pub const NOAA_FORECAST_DAYS: usize = 3;

/// NDFD "24 hourly" forecast with three days.
pub const NOAA_FORECAST: &str = r#"<?xml version="1.0"?>
<dwml version="1.0" xmlns:xsd="http://www.w3.org/2001/XMLSchema" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <head>
    <product srsName="WGS 1984" concise-name="dwmlByDay" operational-mode="official">
      <title>NOAA's National Weather Service Forecast by 24 Hour Period</title>
    </product>
  </head>
  <data>
    <location>
      <location-key>point1</location-key>
      <point latitude="40.44" longitude="-79.99"/>
    </location>
    <time-layout time-coordinate="local" summarization="24hourly">
      <layout-key>k-p24h-n3-1</layout-key>
      <start-valid-time>2011-06-14T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-15T06:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-15T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-16T06:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-16T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-17T06:00:00-04:00</end-valid-time>
    </time-layout>
    <time-layout time-coordinate="local" summarization="12hourly">
      <layout-key>k-p12h-n6-2</layout-key>
      <start-valid-time>2011-06-14T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-14T18:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-14T18:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-15T06:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-15T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-15T18:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-15T18:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-16T06:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-16T06:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-16T18:00:00-04:00</end-valid-time>
      <start-valid-time>2011-06-16T18:00:00-04:00</start-valid-time>
      <end-valid-time>2011-06-17T06:00:00-04:00</end-valid-time>
    </time-layout>
    <parameters applicable-location="point1">
      <temperature type="maximum" units="Fahrenheit" time-layout="k-p24h-n3-1">
        <name>Daily Maximum Temperature</name>
        <value>85</value>
        <value>79</value>
        <value>74</value>
      </temperature>
      <temperature type="minimum" units="Fahrenheit" time-layout="k-p24h-n3-1">
        <name>Daily Minimum Temperature</name>
        <value>62</value>
        <value>60</value>
        <value>55</value>
      </temperature>
      <probability-of-precipitation type="12 hour" units="percent" time-layout="k-p12h-n6-2">
        <name>12 Hourly Probability of Precipitation</name>
        <value>10</value>
        <value>30</value>
        <value>60</value>
        <value>40</value>
        <value>20</value>
        <value>5</value>
      </probability-of-precipitation>
      <weather time-layout="k-p24h-n3-1">
        <name>Weather Type, Coverage, and Intensity</name>
        <weather-conditions weather-summary="Mostly Sunny"/>
        <weather-conditions weather-summary="Chance Thunderstorms">
          <value coverage="chance" intensity="none" weather-type="thunderstorms" qualifier="none"/>
        </weather-conditions>
        <weather-conditions weather-summary="Partly Sunny"/>
      </weather>
      <conditions-icon type="forecast-NWS" time-layout="k-p24h-n3-1">
        <name>Conditions Icons</name>
        <icon-link>http://www.nws.noaa.gov/weather/images/fcicons/few.jpg</icon-link>
        <icon-link>http://www.nws.noaa.gov/weather/images/fcicons/tsra60.jpg</icon-link>
        <icon-link>http://www.nws.noaa.gov/weather/images/fcicons/sct.jpg</icon-link>
      </conditions-icon>
    </parameters>
  </data>
</dwml>"#;

/// NDFD response for a zip code the service does not know.
pub const NOAA_FORECAST_NO_POINT: &str = r#"<?xml version="1.0"?>
<dwml version="1.0">
  <head><product concise-name="dwmlByDay"/></head>
  <data/>
</dwml>"#;

/// Current-observation station index.
pub const NOAA_STATION_INDEX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<wx_station_index>
  <credit>NOAA's National Weather Service</credit>
  <station>
    <station_id>KPIT</station_id>
    <state>PA</state>
    <station_name>Pittsburgh International Airport</station_name>
    <latitude>40.50</latitude>
    <longitude>-80.22</longitude>
    <xml_url>http://weather.gov/xml/current_obs/KPIT.xml</xml_url>
  </station>
  <station>
    <station_id>KAGC</station_id>
    <state>PA</state>
    <station_name>Pittsburgh, Allegheny County Airport</station_name>
    <latitude>40.35</latitude>
    <longitude>-79.93</longitude>
    <xml_url>http://weather.gov/xml/current_obs/KAGC.xml</xml_url>
  </station>
  <station>
    <station_id>KPHL</station_id>
    <state>PA</state>
    <station_name>Philadelphia International Airport</station_name>
    <latitude>39.87</latitude>
    <longitude>-75.23</longitude>
  </station>
  <station>
    <station_id>XBAD</station_id>
    <station_name>Broken Entry</station_name>
    <latitude></latitude>
    <longitude>-79.99</longitude>
  </station>
</wx_station_index>"#;

/// Current observation for KAGC.
pub const NOAA_CURRENT_OBS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<current_observation version="1.0">
  <credit>NOAA's National Weather Service</credit>
  <location>Pittsburgh, Allegheny County Airport, PA</location>
  <station_id>KAGC</station_id>
  <latitude>40.35</latitude>
  <longitude>-79.93</longitude>
  <observation_time>Last Updated on Jun 14 2011, 2:51 pm EDT</observation_time>
  <observation_time_rfc822>Tue, 14 Jun 2011 14:51:00 -0400</observation_time_rfc822>
  <weather>Partly Cloudy</weather>
  <temperature_string>72.5 F (22.5 C)</temperature_string>
  <temp_f>72.5</temp_f>
  <temp_c>22.5</temp_c>
  <relative_humidity>55</relative_humidity>
  <wind_string>Southwest at 9.2 MPH</wind_string>
  <wind_dir>Southwest</wind_dir>
  <wind_degrees>230</wind_degrees>
  <wind_mph>9.2</wind_mph>
  <wind_kt>8</wind_kt>
  <pressure_mb>1016.2</pressure_mb>
  <pressure_in>30.01</pressure_in>
  <dewpoint_f>55.0</dewpoint_f>
  <dewpoint_c>12.8</dewpoint_c>
  <icon_url_base>http://weather.gov/weather/images/fcicons/</icon_url_base>
  <icon_url_name>sct.jpg</icon_url_name>
</current_observation>"#;

/// WeatherBug station id used by the fixtures.
pub const WBUG_STATION_ID: &str = "PTTSB";

/// Days in the WeatherBug forecast fixture.
pub const WBUG_FORECAST_DAYS: usize = 3;

/// `getLiveWeatherRSS` for station PTTSB.
pub const WBUG_LIVE_WEATHER: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:georss="http://www.georss.org/georss" xmlns:aws="http://www.aws.com/aws">
  <channel>
    <title>Observations from Pittsburgh, PA - USA</title>
    <link>http://weather.weatherbug.com/PA/Pittsburgh-weather.html</link>
    <aws:weather xmlns:aws="http://www.aws.com/aws">
      <aws:api version="2.0"/>
      <aws:WebURL>http://weather.weatherbug.com/PA/Pittsburgh-weather.html?ZCode=Z5546</aws:WebURL>
      <aws:ob>
        <aws:ob-date>
          <aws:year number="2011"/>
          <aws:month number="6" text="June" abbrv="Jun"/>
          <aws:day number="14" text="Tuesday" abbrv="Tue"/>
          <aws:hour number="2" hour-24="14"/>
          <aws:minute number="51"/>
          <aws:second number="00"/>
          <aws:am-pm abbrv="PM"/>
          <aws:time-zone offset="-4" text="Eastern Daylight Time (USA)" abbrv="EDT"/>
        </aws:ob-date>
        <aws:requested-station-id>PTTSB</aws:requested-station-id>
        <aws:station-id>PTTSB</aws:station-id>
        <aws:station>Carnegie Science Center</aws:station>
        <aws:city-state zipcode="15222">Pittsburgh, PA</aws:city-state>
        <aws:country>USA</aws:country>
        <aws:latitude>40.4452777777778</aws:latitude>
        <aws:longitude>-80.0169444444444</aws:longitude>
        <aws:current-condition icon="http://deskwx.weatherbug.com/images/Forecast/icons/cond002.gif">Partly Cloudy</aws:current-condition>
        <aws:dew-point units="&amp;deg;F">55</aws:dew-point>
        <aws:feels-like units="&amp;deg;F">73</aws:feels-like>
        <aws:humidity units="%">56</aws:humidity>
        <aws:pressure units="&quot;">30.01</aws:pressure>
        <aws:rain-rate units="&quot;">0.00</aws:rain-rate>
        <aws:rain-today units="&quot;">0.12</aws:rain-today>
        <aws:temp units="&amp;deg;F">72.5</aws:temp>
        <aws:wet-bulb units="&amp;deg;F">61.2</aws:wet-bulb>
        <aws:wind-speed units="mph">9</aws:wind-speed>
        <aws:wind-direction>SW</aws:wind-direction>
        <aws:wind-speed-avg units="mph">7</aws:wind-speed-avg>
        <aws:wind-direction-avg>WSW</aws:wind-direction-avg>
      </aws:ob>
    </aws:weather>
  </channel>
</rss>"#;

/// `getForecastRSS` with three days.
pub const WBUG_FORECAST: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<rss version="2.0" xmlns:aws="http://www.aws.com/aws">
  <channel>
    <title>Forecast for Pittsburgh, PA - USA</title>
    <aws:weather xmlns:aws="http://www.aws.com/aws">
      <aws:api version="2.0"/>
      <aws:WebURL>http://weather.weatherbug.com/PA/Pittsburgh-weather/local-forecast/7-day-forecast.html</aws:WebURL>
      <aws:forecasts type="Detailed" date="6/14/2011 2:00:00 PM">
        <aws:location>
          <aws:city>Pittsburgh</aws:city>
          <aws:state>PA</aws:state>
          <aws:zip>15222</aws:zip>
          <aws:zone>PA021</aws:zone>
        </aws:location>
        <aws:forecast>
          <aws:title alttitle="TUE">Tuesday</aws:title>
          <aws:short-prediction>Partly Sunny</aws:short-prediction>
          <aws:image isNight="0" icon="cond004.gif">http://deskwx.weatherbug.com/images/Forecast/icons/cond004.gif</aws:image>
          <aws:description>Partly Sunny</aws:description>
          <aws:prediction>Partly sunny. Highs in the mid 80s.</aws:prediction>
          <aws:high units="&amp;deg;F">85</aws:high>
          <aws:low units="&amp;deg;F">62</aws:low>
        </aws:forecast>
        <aws:forecast>
          <aws:title alttitle="WED">Wednesday</aws:title>
          <aws:short-prediction>Chance of Storms</aws:short-prediction>
          <aws:image isNight="0" icon="cond022.gif">http://deskwx.weatherbug.com/images/Forecast/icons/cond022.gif</aws:image>
          <aws:description>Chance of Storms</aws:description>
          <aws:prediction>A chance of thunderstorms. Highs in the upper 70s.</aws:prediction>
          <aws:high units="&amp;deg;F">79</aws:high>
          <aws:low units="&amp;deg;F">60</aws:low>
        </aws:forecast>
        <aws:forecast>
          <aws:title alttitle="THU">Thursday</aws:title>
          <aws:short-prediction>Mostly Sunny</aws:short-prediction>
          <aws:image isNight="0" icon="cond026.gif">http://deskwx.weatherbug.com/images/Forecast/icons/cond026.gif</aws:image>
          <aws:description>Mostly Sunny</aws:description>
          <aws:prediction>Mostly sunny. Highs in the mid 70s.</aws:prediction>
          <aws:high units="&amp;deg;F">74</aws:high>
          <aws:low units="&amp;deg;F">--</aws:low>
        </aws:forecast>
      </aws:forecasts>
    </aws:weather>
  </channel>
</rss>"#;

/// `getStationsXML` for zip 15222.
pub const WBUG_STATIONS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<aws:weather xmlns:aws="http://www.aws.com/aws">
  <aws:api version="2.0"/>
  <aws:WebURL>http://weather.weatherbug.com/PA/Pittsburgh-weather.html</aws:WebURL>
  <aws:stations>
    <aws:station id="PTTSB" name="Carnegie Science Center" city="Pittsburgh" state=" PA" country="USA" zipcode="15222" citycode="0" distance="0.6" Unit="Miles" latitude="40.4452777777778" longitude="-80.0169444444444"/>
    <aws:station id="PTTDQ" name="Duquesne University" city="Pittsburgh" state=" PA" country="USA" zipcode="15282" citycode="0" distance="1.1" Unit="Miles" latitude="40.4366666666667" longitude="-79.9908333333333"/>
    <aws:station id="KAGC" name="Pittsburgh, Allegheny County Airport" city="West Mifflin" state=" PA" country="USA" zipcode="15122" citycode="0" distance="6.5" Unit="Miles" latitude="40.35" longitude="-79.93"/>
  </aws:stations>
</aws:weather>"#;

/// `getLocationsXML` for "Pitts".
pub const WBUG_LOCATIONS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<aws:weather xmlns:aws="http://www.aws.com/aws">
  <aws:api version="2.0"/>
  <aws:locations>
    <aws:location cityname="Pittsburgh" statename="PA" countryname="USA" zipcode="15222" citycode="" citytype="0"/>
    <aws:location cityname="Pittsfield" statename="MA" countryname="USA" zipcode="01201" citycode="" citytype="0"/>
    <aws:location cityname="Pittsworth" statename="" countryname="Australia" zipcode="" citycode="61347" citytype="1"/>
  </aws:locations>
</aws:weather>"#;

/// Error page returned for a bad API code.
pub const WBUG_ERROR_PAGE: &str = "<h1>Invalid ACode</h1>";
