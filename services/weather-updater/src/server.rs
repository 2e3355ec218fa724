//! HTTP management API.
//!
//! Provides endpoints for:
//! - Listing, adding and deleting monitored entries
//! - Showing the current data of an entry (refreshing it when stale)
//! - Updating refresh periods and provider settings
//! - Service status and the icon legend

use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use weather_common::{
    ConditionsField, ConditionsRecord, FieldValue, ForecastField, ForecastRecord, LocationEntry,
    Reading, ServiceData, ServiceKind, StationField, WeatherError, WeatherIcon,
};
use weather_providers::{StationQuery, ENTRY_KEY_STATION_NAME, ENTRY_KEY_ZIP};

use crate::lookup::RefreshEngine;
use crate::metrics::MetricsSnapshot;
use crate::scheduler::Scheduler;

// ============================================================================
// Shared State
// ============================================================================

pub struct AppState {
    pub engine: Arc<RefreshEngine>,
    pub scheduler: Arc<Scheduler>,
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct EntrySummary {
    pub path: String,
    pub name: String,
    pub station_id: String,
    pub station_name: String,
    /// Last error marker if any, else the last conditions update time, else empty
    #[serde(rename = "lastUpdate")]
    pub last_update: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntriesResponse {
    pub service: ServiceKind,
    pub service_name: String,
    pub headers: Vec<String>,
    pub entries: Vec<EntrySummary>,
}

#[derive(Debug, Deserialize)]
pub struct AddEntryRequest {
    pub path: Option<String>,
    pub zip: Option<String>,
    pub station: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PathQuery {
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldRow {
    pub name: String,
    pub external_name: String,
    pub value: Option<String>,
    pub units: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryDataResponse {
    pub path: String,
    pub station: Vec<FieldRow>,
    pub conditions: Vec<FieldRow>,
    pub conditions_error: Option<String>,
    pub forecast: Vec<Vec<FieldRow>>,
    pub forecast_error: Option<String>,
    pub icons: Vec<IconInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IconInfo {
    pub value: i32,
    pub name: &'static str,
    pub display_name: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ConfigUpdateRequest {
    pub service: Option<String>,
    #[serde(rename = "conditionsRefreshInMinutes")]
    pub conditions_refresh: Option<u32>,
    #[serde(rename = "forecastsRefreshInMinutes")]
    pub forecasts_refresh: Option<u32>,
    #[serde(rename = "serviceConfig")]
    pub service_config: Option<ServiceData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigResponse {
    pub service: ServiceKind,
    #[serde(rename = "conditionsRefreshInMinutes")]
    pub conditions_refresh: u32,
    #[serde(rename = "forecastsRefreshInMinutes")]
    pub forecasts_refresh: u32,
    #[serde(rename = "serviceConfig")]
    pub service_config: ServiceData,
}

#[derive(Debug, Clone, Serialize)]
pub struct EntryErrors {
    pub path: String,
    pub conditions_error: Option<String>,
    pub forecast_error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub service: ServiceKind,
    #[serde(rename = "conditionsRefreshInMinutes")]
    pub conditions_refresh: u32,
    #[serde(rename = "forecastsRefreshInMinutes")]
    pub forecasts_refresh: u32,
    pub entry_count: usize,
    pub scheduler_running: bool,
    pub refresh: MetricsSnapshot,
    pub errors: Vec<EntryErrors>,
}

// ============================================================================
// Router
// ============================================================================

/// Create the management API router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/entries",
            get(list_entries_handler)
                .post(add_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/entries/data", get(entry_data_handler))
        .route("/config", post(update_config_handler))
        .route("/icons", get(icons_handler))
        .route("/status", get(status_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

/// Serve the API on 0.0.0.0 until the task is dropped.
pub async fn run_server(state: Arc<AppState>, port: u16) -> anyhow::Result<()> {
    let app = create_router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    info!(port = port, "Starting management API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn weather_error_response(err: &WeatherError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    error_response(status, err.to_string())
}

/// Config updates fail either on validation or on persistence.
fn update_error_response(err: anyhow::Error) -> Response {
    match err.downcast_ref::<WeatherError>() {
        Some(e) => weather_error_response(e),
        None => {
            error!(error = %err, "Failed to save configuration");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /health
async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "weather-updater",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /entries - Configured entries with their last update
async fn list_entries_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let engine = &state.engine;
    let config = engine.config().snapshot().await;
    let provider = match engine.providers().get(config.service()) {
        Ok(p) => p,
        Err(e) => return weather_error_response(&e),
    };
    let ui = provider.ui();
    let cache = engine.cache();

    let entries = config
        .entries()
        .iter()
        .map(|entry| {
            let conditions = cache.conditions(entry.path());
            let last_update = conditions
                .error
                .or_else(|| cache.last_forecast_error(entry.path()))
                .or_else(|| conditions.value.map(|r| r.update_time.to_rfc3339()))
                .unwrap_or_default();

            EntrySummary {
                path: entry.path().to_string(),
                name: ui.entry_display_name(entry),
                station_id: entry.station().id.clone(),
                station_name: entry.station().name.clone(),
                last_update,
            }
        })
        .collect();

    Json(EntriesResponse {
        service: config.service(),
        service_name: config.service().display_name().to_string(),
        headers: ui.entry_fields.iter().map(|f| f.header.to_string()).collect(),
        entries,
    })
    .into_response()
}

/// POST /entries - Resolve a location and add an entry for it
async fn add_entry_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<AddEntryRequest>,
) -> Response {
    let path = request.path.as_deref().map(str::trim).unwrap_or_default();
    let zip = request.zip.as_deref().map(str::trim).unwrap_or_default();
    if path.is_empty() || zip.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Both path and zip are required");
    }

    let engine = &state.engine;
    let config = engine.config().snapshot().await;
    if config.entry_for_path(path).is_some() {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("An entry already exists for {}", path),
        );
    }

    let provider = match engine.providers().get(config.service()) {
        Ok(p) => p,
        Err(e) => return weather_error_response(&e),
    };

    let mut query = StationQuery::new(zip);
    if let Some(station) = request.station.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.with_station(station);
    }

    let station = match provider.resolve_station(config.service_config(), &query).await {
        Ok(station) => station,
        Err(e) => {
            warn!(path = %path, zip = %zip, error = %e, "Failed to resolve station");
            return weather_error_response(&e);
        }
    };

    let mut data = ServiceData::new();
    data.insert(ENTRY_KEY_ZIP.to_string(), query.location.clone());
    data.insert(ENTRY_KEY_STATION_NAME.to_string(), station.name.clone());
    let entry = LocationEntry::new(path, station, data);

    let added = entry.clone();
    match engine.config().update(move |c| c.add(added)).await {
        Ok(()) => {
            info!(path = %entry.path(), station = %entry.station().id, "Added entry");
            (StatusCode::CREATED, Json(entry)).into_response()
        }
        Err(e) => update_error_response(e),
    }
}

/// DELETE /entries?path=... - Remove an entry by path
async fn delete_entry_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PathQuery>,
) -> Response {
    let path = params.path.trim().to_string();
    let target = path.clone();
    match state.engine.config().update(move |c| Ok(c.delete(&target))).await {
        Ok(true) => {
            state.engine.forget(&path);
            info!(path = %path, "Deleted entry");
            Json(json!({ "removed": true, "path": path })).into_response()
        }
        Ok(false) => error_response(StatusCode::NOT_FOUND, format!("No entry for {}", path)),
        Err(e) => update_error_response(e),
    }
}

/// GET /entries/data?path=... - Station, conditions and forecast of an entry
async fn entry_data_handler(
    Extension(state): Extension<Arc<AppState>>,
    Query(params): Query<PathQuery>,
) -> Response {
    let engine = &state.engine;
    let Some(entry) = engine.config().entry_for_path(&params.path).await else {
        return error_response(
            StatusCode::NOT_FOUND,
            format!("No entry for {}", params.path.trim()),
        );
    };
    let service = engine.config().snapshot().await.service();

    let conditions = match engine.refresh_conditions(&entry, false).await {
        Ok(record) => conditions_rows(&record),
        Err(e) => {
            warn!(path = %entry.path(), error = %e, "Conditions unavailable");
            Vec::new()
        }
    };
    let forecast = match engine.refresh_forecasts(&entry, false).await {
        Ok(days) => forecast_rows(&days),
        Err(e) => {
            warn!(path = %entry.path(), error = %e, "Forecast unavailable");
            Vec::new()
        }
    };

    Json(EntryDataResponse {
        path: entry.path().to_string(),
        station: station_rows(&entry, service),
        conditions,
        conditions_error: engine.cache().last_conditions_error(entry.path()),
        forecast,
        forecast_error: engine.cache().last_forecast_error(entry.path()),
        icons: icon_legend(),
    })
    .into_response()
}

/// POST /config - Update periods or provider settings, then reschedule
async fn update_config_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(request): Json<ConfigUpdateRequest>,
) -> Response {
    let service = match request.service.as_deref().map(str::parse::<ServiceKind>) {
        Some(Ok(kind)) => Some(kind),
        Some(Err(e)) => return error_response(StatusCode::BAD_REQUEST, e),
        None => None,
    };

    let updated = state
        .engine
        .config()
        .update(move |c| {
            if let Some(kind) = service {
                c.set_service(kind);
            }
            if let Some(minutes) = request.conditions_refresh {
                c.set_conditions_refresh(minutes);
            }
            if let Some(minutes) = request.forecasts_refresh {
                c.set_forecasts_refresh(minutes);
            }
            for (key, value) in request.service_config.unwrap_or_default() {
                if value.is_empty() {
                    c.remove_service_value(&key);
                } else {
                    c.set_service_value(key, value);
                }
            }
            Ok(c.clone())
        })
        .await;

    let config = match updated {
        Ok(config) => config,
        Err(e) => return update_error_response(e),
    };

    if state.scheduler.is_running() {
        state
            .scheduler
            .reschedule(config.conditions_refresh(), config.forecasts_refresh());
    }

    Json(ConfigResponse {
        service: config.service(),
        conditions_refresh: config.conditions_refresh(),
        forecasts_refresh: config.forecasts_refresh(),
        service_config: config.service_config().clone(),
    })
    .into_response()
}

/// GET /icons - Canonical icon legend
async fn icons_handler() -> impl IntoResponse {
    Json(icon_legend())
}

/// GET /status - Service settings, refresh counters and per-entry errors
async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> impl IntoResponse {
    let engine = &state.engine;
    let config = engine.config().snapshot().await;
    let cache = engine.cache();

    let errors = config
        .entries()
        .iter()
        .filter_map(|entry| {
            let conditions_error = cache.last_conditions_error(entry.path());
            let forecast_error = cache.last_forecast_error(entry.path());
            if conditions_error.is_none() && forecast_error.is_none() {
                return None;
            }
            Some(EntryErrors {
                path: entry.path().to_string(),
                conditions_error,
                forecast_error,
            })
        })
        .collect();

    Json(StatusResponse {
        service: config.service(),
        conditions_refresh: config.conditions_refresh(),
        forecasts_refresh: config.forecasts_refresh(),
        entry_count: config.entries().len(),
        scheduler_running: state.scheduler.is_running(),
        refresh: engine.metrics().snapshot(),
        errors,
    })
}

// ============================================================================
// Row builders
// ============================================================================

fn display_value(reading: Reading<FieldValue>) -> Option<Option<String>> {
    match reading {
        Reading::Value(v) => Some(Some(v.to_string())),
        Reading::Null => Some(None),
        Reading::Unsupported => None,
    }
}

fn station_rows(entry: &LocationEntry, service: ServiceKind) -> Vec<FieldRow> {
    StationField::ALL
        .iter()
        .filter_map(|&field| {
            let value = display_value(field.value(entry.station(), service.name()))?;
            Some(FieldRow {
                name: field.name().to_string(),
                external_name: field.external_name(),
                value,
                units: field.units(),
            })
        })
        .collect()
}

fn conditions_rows(record: &ConditionsRecord) -> Vec<FieldRow> {
    ConditionsField::ALL
        .iter()
        .filter_map(|&field| {
            let value = display_value(field.value(record))?;
            Some(FieldRow {
                name: field.name().to_string(),
                external_name: field.external_name(),
                value,
                units: field.units(record),
            })
        })
        .collect()
}

fn forecast_rows(days: &[ForecastRecord]) -> Vec<Vec<FieldRow>> {
    days.iter()
        .enumerate()
        .map(|(day, record)| {
            ForecastField::ALL
                .iter()
                .filter_map(|&field| {
                    let value = display_value(field.value(record))?;
                    Some(FieldRow {
                        name: field.name().to_string(),
                        external_name: field.external_name(day),
                        value,
                        units: field.units(record),
                    })
                })
                .collect()
        })
        .collect()
}

fn icon_legend() -> Vec<IconInfo> {
    WeatherIcon::ALL
        .iter()
        .map(|icon| IconInfo {
            value: icon.value(),
            name: icon.name(),
            display_name: icon.display_name(),
        })
        .collect()
}
