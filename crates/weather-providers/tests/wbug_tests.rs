//! WeatherBug provider against a local server standing in for the API host.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;
use test_utils::{
    assert_reading_approx_eq, FIXTURE_ZIP, WBUG_ERROR_PAGE, WBUG_FORECAST, WBUG_FORECAST_DAYS,
    WBUG_LIVE_WEATHER, WBUG_LOCATIONS, WBUG_STATIONS, WBUG_STATION_ID,
};
use tokio_test::{assert_err, assert_ok};
use weather_common::{Reading, ServiceData, StationSource, WeatherError};
use weather_providers::wbug::CONFIG_KEY_LICENSE;
use weather_providers::{LocationKey, StationQuery, WeatherBugProvider, WeatherProvider};

const API_CODE: &str = "A1234567890";

type Requests = Arc<Mutex<Vec<(&'static str, HashMap<String, String>)>>>;

fn answer(
    requests: &Requests,
    method: &'static str,
    params: HashMap<String, String>,
    body: &'static str,
) -> &'static str {
    let authorized = params.get("ACode").map(String::as_str) == Some(API_CODE);
    requests.lock().unwrap().push((method, params));
    if authorized {
        body
    } else {
        WBUG_ERROR_PAGE
    }
}

async fn spawn_api() -> (WeatherBugProvider, Requests) {
    let requests: Requests = Arc::default();
    let app = Router::new()
        .route(
            "/getStationsXML.aspx",
            get(|State(r): State<Requests>, Query(p): Query<HashMap<String, String>>| async move {
                answer(&r, "getStationsXML", p, WBUG_STATIONS)
            }),
        )
        .route(
            "/getLocationsXML.aspx",
            get(|State(r): State<Requests>, Query(p): Query<HashMap<String, String>>| async move {
                answer(&r, "getLocationsXML", p, WBUG_LOCATIONS)
            }),
        )
        .route(
            "/getLiveWeatherRSS.aspx",
            get(|State(r): State<Requests>, Query(p): Query<HashMap<String, String>>| async move {
                answer(&r, "getLiveWeatherRSS", p, WBUG_LIVE_WEATHER)
            }),
        )
        .route(
            "/getForecastRSS.aspx",
            get(|State(r): State<Requests>, Query(p): Query<HashMap<String, String>>| async move {
                answer(&r, "getForecastRSS", p, WBUG_FORECAST)
            }),
        )
        .with_state(requests.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let provider = WeatherBugProvider::with_base_url(format!("http://{}/", addr)).unwrap();
    (provider, requests)
}

fn licensed() -> ServiceData {
    let mut config = ServiceData::new();
    config.insert(CONFIG_KEY_LICENSE.to_string(), API_CODE.to_string());
    config
}

fn carnegie() -> StationSource {
    StationSource::new(WBUG_STATION_ID, "Carnegie Science Center").with_location(40.4453, -80.0169)
}

// ============================================================================
// Locations and stations
// ============================================================================

#[tokio::test]
async fn test_find_locations() {
    let (provider, requests) = spawn_api().await;

    let locations = assert_ok!(provider.find_locations(&licensed(), "Pitts").await);
    assert_eq!(locations.len(), 3);
    assert_eq!(locations[0].display_name(), "Pittsburgh, PA");
    assert_eq!(locations[0].key(), Some(LocationKey::Zip(FIXTURE_ZIP.to_string())));
    assert_eq!(locations[2].display_name(), "Pittsworth, Australia");
    assert_eq!(locations[2].key(), Some(LocationKey::CityCode(61347)));

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].1["SearchString"], "Pitts");
}

#[tokio::test]
async fn test_resolve_defaults_to_first_station() {
    let (provider, requests) = spawn_api().await;

    let station = assert_ok!(
        provider
            .resolve_station(&licensed(), &StationQuery::new(FIXTURE_ZIP))
            .await
    );
    assert_eq!(station.id, WBUG_STATION_ID);
    assert_eq!(station.name, "Carnegie Science Center");
    assert!(station.coordinates().is_some());

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].0, "getStationsXML");
    assert_eq!(requests[0].1["zipCode"], FIXTURE_ZIP);
}

#[tokio::test]
async fn test_resolve_explicit_station() {
    let (provider, requests) = spawn_api().await;

    let query = StationQuery::new("C61347").with_station("KAGC");
    let station = assert_ok!(provider.resolve_station(&licensed(), &query).await);
    assert_eq!(station.id, "KAGC");
    assert_eq!(station.coordinates(), Some((40.35, -79.93)));
    assert_eq!(requests.lock().unwrap()[0].1["cityCode"], "61347");
}

#[tokio::test]
async fn test_resolve_unknown_station_code() {
    let (provider, _) = spawn_api().await;

    let query = StationQuery::new(FIXTURE_ZIP).with_station("NOPE1");
    match assert_err!(provider.resolve_station(&licensed(), &query).await) {
        WeatherError::InvalidConfigurationData(message) => {
            assert_eq!(message, "Unknown station code NOPE1")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[tokio::test]
async fn test_resolve_rejects_unparsable_location() {
    let (provider, requests) = spawn_api().await;

    let err = assert_err!(
        provider
            .resolve_station(&licensed(), &StationQuery::new("Pittsburgh"))
            .await
    );
    assert!(matches!(err, WeatherError::InvalidConfigurationData(_)));
    assert!(requests.lock().unwrap().is_empty());
}

// ============================================================================
// Conditions and forecast
// ============================================================================

#[tokio::test]
async fn test_live_weather() {
    let (provider, requests) = spawn_api().await;

    let record = assert_ok!(
        provider
            .conditions(&licensed(), &carnegie(), &ServiceData::new())
            .await
    );
    assert_reading_approx_eq!(record.temperature, 72.5, 1e-9);
    assert_reading_approx_eq!(record.feels_like, 73.0, 1e-9);
    assert_reading_approx_eq!(record.wet_bulb, 61.2, 1e-9);
    assert_reading_approx_eq!(record.rain_today, 0.12, 1e-9);
    assert_eq!(record.units.temperature.as_deref(), Some("°F"));
    assert!(record.observation_time.is_supported());

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].1["stationid"], WBUG_STATION_ID);
    assert_eq!(requests[0].1["UnitType"], "0");
}

#[tokio::test]
async fn test_forecast() {
    let (provider, requests) = spawn_api().await;

    let days = assert_ok!(
        provider
            .forecast(&licensed(), &carnegie(), &ServiceData::new(), 7)
            .await
    );
    assert_eq!(days.len(), WBUG_FORECAST_DAYS);
    assert_eq!(days[0].title, Reading::Value("Tuesday".to_string()));
    assert_reading_approx_eq!(days[1].highest_temperature, 79.0, 1e-9);
    assert_eq!(days[2].lowest_temperature, Reading::Null);
    assert_eq!(days[0].prob_precipitation, Reading::Unsupported);

    let requests = requests.lock().unwrap();
    assert_eq!(requests[0].1["lat"], "40.45");
    assert_eq!(requests[0].1["long"], "-80.02");
}

#[tokio::test]
async fn test_forecast_truncated_to_days() {
    let (provider, _) = spawn_api().await;

    let days = assert_ok!(
        provider
            .forecast(&licensed(), &carnegie(), &ServiceData::new(), 1)
            .await
    );
    assert_eq!(days.len(), 1);
}

#[tokio::test]
async fn test_forecast_needs_coordinates() {
    let (provider, requests) = spawn_api().await;
    let station = StationSource::new(WBUG_STATION_ID, "Carnegie Science Center");

    let err = assert_err!(
        provider
            .forecast(&licensed(), &station, &ServiceData::new(), 7)
            .await
    );
    assert!(matches!(err, WeatherError::MissingStationContent(_)));
    assert!(requests.lock().unwrap().is_empty());
}

// ============================================================================
// API code handling
// ============================================================================

#[tokio::test]
async fn test_missing_license_key() {
    let (provider, requests) = spawn_api().await;

    let err = assert_err!(
        provider
            .conditions(&ServiceData::new(), &carnegie(), &ServiceData::new())
            .await
    );
    assert!(matches!(err, WeatherError::Config(_)));
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_license_key_reports_service_message() {
    let (provider, _) = spawn_api().await;
    let mut config = ServiceData::new();
    config.insert(CONFIG_KEY_LICENSE.to_string(), "WRONG".to_string());

    let err = assert_err!(provider.conditions(&config, &carnegie(), &ServiceData::new()).await);
    assert!(err.is_provider_failure());
    assert!(err.to_string().contains("Invalid ACode"));
}
