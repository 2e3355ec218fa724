//! Management API handlers, exercised through the router without a socket.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::Harness;
use serde_json::{json, Value};
use tower::ServiceExt;
use weather_common::{StationSource, WeatherError};
use weather_updater::server::create_router;
use weather_updater::{AppState, Scheduler, WeatherConfig};

const ROOF: &str = "/Building/RoofUnit";

fn router(h: &Harness) -> (Router, Arc<Scheduler>) {
    let scheduler = Arc::new(Scheduler::new(h.engine.clone()));
    let state = Arc::new(AppState {
        engine: h.engine.clone(),
        scheduler: scheduler.clone(),
    });
    (create_router(state), scheduler)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Health and legend
// ============================================================================

#[tokio::test]
async fn test_health() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "weather-updater");
}

#[tokio::test]
async fn test_icons() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);

    let (status, body) = send(&app, get("/icons")).await;
    assert_eq!(status, StatusCode::OK);
    let icons = body.as_array().unwrap();
    assert_eq!(icons.len(), 23);
    assert_eq!(icons[13]["name"], "Storms");
    assert_eq!(icons[13]["value"], 13);
}

// ============================================================================
// Entries
// ============================================================================

#[tokio::test]
async fn test_list_entries_shows_last_update() {
    let h = Harness::with_entries(&[ROOF, "/Building/Lobby"]);
    let (app, _) = router(&h);
    h.provider.push_conditions(Err(WeatherError::provider("offline")));

    let roof = h.entry(ROOF).await;
    let _ = h.engine.refresh_conditions(&roof, true).await;

    let (status, body) = send(&app, get("/entries")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "nws");
    assert_eq!(body["headers"], json!(["Zip Code"]));

    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["path"], ROOF);
    assert_eq!(entries[0]["name"], "15222");
    assert_eq!(entries[0]["lastUpdate"], "Error reading data");
    assert_eq!(entries[1]["lastUpdate"], "");
}

#[tokio::test]
async fn test_add_entry_resolves_station() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);
    h.provider.push_station(Ok(
        StationSource::new("KPIT", "Pittsburgh International").with_location(40.5, -80.22),
    ));

    let (status, body) = send(
        &app,
        json_request("POST", "/entries", json!({"path": ROOF, "zip": "15222"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["station"]["id"], "KPIT");
    assert_eq!(body["data"]["station_name"], "Pittsburgh International");

    let entry = h.config.entry_for_path(ROOF).await.unwrap();
    assert_eq!(entry.data_value("zip"), Some("15222"));
    assert!(h.config_path().exists());
}

#[tokio::test]
async fn test_add_entry_validation() {
    let h = Harness::with_entries(&[ROOF]);
    let (app, _) = router(&h);

    let (status, body) = send(&app, json_request("POST", "/entries", json!({"path": "/x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("required"));

    let (status, _) = send(
        &app,
        json_request("POST", "/entries", json!({"path": ROOF, "zip": "15222"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Mock has no queued station, so resolution fails
    let (status, body) = send(
        &app,
        json_request("POST", "/entries", json!({"path": "/Building/New", "zip": "00000"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("00000"));
    assert!(h.config.entry_for_path("/Building/New").await.is_none());
}

#[tokio::test]
async fn test_delete_entry_by_path() {
    let h = Harness::with_entries(&[ROOF, "/Building/Lobby"]);
    let (app, _) = router(&h);
    let roof = h.entry(ROOF).await;
    h.engine.refresh_conditions(&roof, true).await.unwrap();

    let request = Request::delete("/entries?path=%2FBuilding%2FRoofUnit")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removed"], true);
    assert!(h.engine.cache().last_conditions(ROOF).is_none());

    let request = Request::delete("/entries?path=%2FBuilding%2FRoofUnit")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = h.config.snapshot().await;
    assert_eq!(remaining.entries().len(), 1);
}

// ============================================================================
// Entry data
// ============================================================================

#[tokio::test]
async fn test_entry_data_refreshes_when_empty() {
    let h = Harness::with_entries(&[ROOF]);
    let (app, _) = router(&h);

    let (status, body) = send(&app, get("/entries/data?path=%2FBuilding%2FRoofUnit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.provider.conditions_calls(), 1);
    assert_eq!(h.provider.forecast_calls(), 1);

    let conditions = body["conditions"].as_array().unwrap();
    let temperature = conditions
        .iter()
        .find(|row| row["name"] == "temperature")
        .unwrap();
    assert_eq!(temperature["external_name"], "wc_temperature");
    assert_eq!(temperature["value"], "70");
    assert_eq!(temperature["units"], "°F");

    let forecast = body["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 7);
    assert_eq!(forecast[1][0]["external_name"], "wf1_updateTime");

    let station = body["station"].as_array().unwrap();
    assert!(station.iter().any(|row| row["name"] == "service" && row["value"] == "nws"));
    assert!(body["conditions_error"].is_null());

    // Second view reuses the cache
    send(&app, get("/entries/data?path=%2FBuilding%2FRoofUnit")).await;
    assert_eq!(h.provider.conditions_calls(), 1);
}

#[tokio::test]
async fn test_entry_data_reports_errors() {
    let h = Harness::with_entries(&[ROOF]);
    let (app, _) = router(&h);
    h.provider.push_forecast(Err(WeatherError::provider("bad document")));

    let (status, body) = send(&app, get("/entries/data?path=%2FBuilding%2FRoofUnit")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forecast"], json!([]));
    assert_eq!(body["forecast_error"], "Error reading data");
}

#[tokio::test]
async fn test_entry_data_unknown_path() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);

    let (status, _) = send(&app, get("/entries/data?path=%2Fnowhere")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Configuration and status
// ============================================================================

#[tokio::test]
async fn test_update_config_clamps_and_persists() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/config",
            json!({
                "conditionsRefreshInMinutes": 5,
                "forecastsRefreshInMinutes": 240,
                "serviceConfig": {"units": "metric"}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["conditionsRefreshInMinutes"], 15);
    assert_eq!(body["forecastsRefreshInMinutes"], 240);
    assert_eq!(body["serviceConfig"]["units"], "metric");

    let on_disk = WeatherConfig::load(h.config_path()).await.unwrap();
    assert_eq!(on_disk.forecasts_refresh(), 240);
    assert_eq!(on_disk.service_config().get("units").map(String::as_str), Some("metric"));
}

#[tokio::test]
async fn test_update_config_rejects_unknown_service() {
    let h = Harness::with_entries(&[]);
    let (app, _) = router(&h);

    let (status, _) = send(
        &app,
        json_request("POST", "/config", json!({"service": "accuweather"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_config_reschedules_running_jobs() {
    let h = Harness::with_entries(&[]);
    let (app, scheduler) = router(&h);
    scheduler.start(std::time::Duration::from_secs(3600), 60, 120);

    let (status, _) = send(
        &app,
        json_request("POST", "/config", json!({"conditionsRefreshInMinutes": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scheduler.periods(), Some((30, 120)));

    scheduler.stop();
}

#[tokio::test]
async fn test_status_lists_errors() {
    let h = Harness::with_entries(&[ROOF, "/Building/Lobby"]);
    let (app, _) = router(&h);
    h.provider.push_conditions(Err(WeatherError::provider("offline")));
    let roof = h.entry(ROOF).await;
    let _ = h.engine.refresh_conditions(&roof, true).await;

    let (status, body) = send(&app, get("/status")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entry_count"], 2);
    assert_eq!(body["scheduler_running"], false);
    assert_eq!(body["refresh"]["conditions_failures"], 1);

    let errors = body["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0]["path"], ROOF);
    assert_eq!(errors[0]["conditions_error"], "Error reading data");
}
