//! Equipment targets and the writer that pushes canonical fields to them.
//!
//! A target resolves an entry path to a set of named points. Point reference
//! names follow the external field names:
//! - `ws_<stationField>`
//! - `wc_<conditionsField>`
//! - `wf<day>_<forecastField>`
//!
//! Only numeric values are written; text and date fields never leave the
//! process.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};
use weather_common::{
    ConditionsRecord, ExternalName, ForecastRecord, ServiceKind, StationSource, WeatherError,
    WeatherResult,
};

/// Value type backing an equipment point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointKind {
    Numeric,
    Text,
    Date,
}

/// A writable point under an entry path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointRef {
    pub reference: String,
    pub kind: PointKind,
}

impl PointRef {
    pub fn numeric(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            kind: PointKind::Numeric,
        }
    }
}

/// External building-automation endpoint set.
#[async_trait]
pub trait EquipmentTarget: Send + Sync {
    /// Points available under `path`. Unknown paths have no points.
    async fn resolve(&self, path: &str) -> WeatherResult<Vec<PointRef>>;

    async fn write(&self, path: &str, reference: &str, value: f64) -> WeatherResult<()>;

    /// Called once after each batch of writes.
    async fn flush(&self) -> WeatherResult<()> {
        Ok(())
    }
}

// ============================================================================
// Writer
// ============================================================================

/// Matches canonical fields to resolved points and writes numeric values.
#[derive(Clone)]
pub struct EquipmentWriter {
    target: Arc<dyn EquipmentTarget>,
}

impl EquipmentWriter {
    pub fn new(target: Arc<dyn EquipmentTarget>) -> Self {
        Self { target }
    }

    /// True when `path` has at least one numeric point with a weather name.
    pub async fn has_points(&self, path: &str) -> WeatherResult<bool> {
        Ok(!self.numeric_points(path).await?.is_empty())
    }

    async fn numeric_points(&self, path: &str) -> WeatherResult<Vec<(String, ExternalName)>> {
        let points = self.target.resolve(path).await?;
        Ok(points
            .into_iter()
            .filter(|p| p.kind == PointKind::Numeric)
            .filter_map(|p| ExternalName::parse(&p.reference).map(|name| (p.reference, name)))
            .collect())
    }

    /// Write the numeric station fields. `service` is reported as text only.
    #[instrument(skip(self, station), fields(station = %station.id))]
    pub async fn write_station(
        &self,
        path: &str,
        station: &StationSource,
        service: ServiceKind,
    ) -> WeatherResult<usize> {
        self.write_matching(path, |name| match name {
            ExternalName::Station(field) => field.value(station, service.name()).value(),
            _ => None,
        })
        .await
    }

    #[instrument(skip(self, record))]
    pub async fn write_conditions(&self, path: &str, record: &ConditionsRecord) -> WeatherResult<usize> {
        self.write_matching(path, |name| match name {
            ExternalName::Conditions(field) => field.value(record).value(),
            _ => None,
        })
        .await
    }

    #[instrument(skip(self, days), fields(days = days.len()))]
    pub async fn write_forecast(&self, path: &str, days: &[ForecastRecord]) -> WeatherResult<usize> {
        self.write_matching(path, |name| match name {
            ExternalName::Forecast { day, field } => days.get(day).and_then(|r| field.value(r).value()),
            _ => None,
        })
        .await
    }

    /// Resolve once, write every point `value_of` yields a number for.
    ///
    /// A failing point is logged and skipped; the batch still reports an
    /// error afterwards so callers can mark the entry.
    async fn write_matching<F>(&self, path: &str, value_of: F) -> WeatherResult<usize>
    where
        F: Fn(ExternalName) -> Option<weather_common::FieldValue>,
    {
        let points = self.numeric_points(path).await?;
        if points.is_empty() {
            return Ok(0);
        }

        let mut written = 0;
        let mut failed = 0;
        for (reference, name) in points {
            let Some(value) = value_of(name).and_then(|v| v.as_numeric()) else {
                continue;
            };
            match self.target.write(path, &reference, value).await {
                Ok(()) => written += 1,
                Err(e) => {
                    warn!(path = %path, point = %reference, error = %e, "Point write failed");
                    failed += 1;
                }
            }
        }

        self.target.flush().await?;
        debug!(path = %path, written, failed, "Equipment write complete");

        if failed > 0 {
            return Err(WeatherError::EquipmentWrite(format!(
                "{} of {} point writes failed for {}",
                failed,
                written + failed,
                path
            )));
        }
        Ok(written)
    }
}

// ============================================================================
// In-memory target
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryPoint {
    kind: PointKind,
    value: Option<f64>,
}

/// Equipment kept in process memory, with optional write-failure injection.
#[derive(Debug, Default)]
pub struct MemoryEquipment {
    points: RwLock<HashMap<String, BTreeMap<String, MemoryPoint>>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryEquipment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_point(&self, path: &str, reference: &str, kind: PointKind) {
        let mut points = self.points.write().unwrap_or_else(|e| e.into_inner());
        points
            .entry(path.to_string())
            .or_default()
            .insert(reference.to_string(), MemoryPoint { kind, value: None });
    }

    pub fn add_numeric_points(&self, path: &str, references: &[&str]) {
        for reference in references {
            self.add_point(path, reference, PointKind::Numeric);
        }
    }

    /// Last value written to a point.
    pub fn value(&self, path: &str, reference: &str) -> Option<f64> {
        let points = self.points.read().unwrap_or_else(|e| e.into_inner());
        points.get(path)?.get(reference)?.value
    }

    /// Make every subsequent write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful point writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EquipmentTarget for MemoryEquipment {
    async fn resolve(&self, path: &str) -> WeatherResult<Vec<PointRef>> {
        let points = self.points.read().unwrap_or_else(|e| e.into_inner());
        Ok(points
            .get(path)
            .map(|refs| {
                refs.iter()
                    .map(|(reference, point)| PointRef {
                        reference: reference.clone(),
                        kind: point.kind,
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn write(&self, path: &str, reference: &str, value: f64) -> WeatherResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(WeatherError::EquipmentWrite(format!(
                "write to {}/{} rejected",
                path, reference
            )));
        }

        let mut points = self.points.write().unwrap_or_else(|e| e.into_inner());
        let point = points
            .get_mut(path)
            .and_then(|refs| refs.get_mut(reference))
            .ok_or_else(|| {
                WeatherError::EquipmentWrite(format!("No point {} under {}", reference, path))
            })?;
        point.value = Some(value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// File-backed target
// ============================================================================

type PointDocument = BTreeMap<String, BTreeMap<String, Value>>;

/// Equipment described by a JSON document `{ "<path>": { "<ref>": value } }`.
///
/// Numbers and `null` are numeric points, strings are text points. Values are
/// written back to the file after each batch.
pub struct FileEquipment {
    path: PathBuf,
    document: Mutex<PointDocument>,
}

impl FileEquipment {
    /// Open the document, starting empty when the file does not exist.
    pub async fn open(path: impl Into<PathBuf>) -> WeatherResult<Self> {
        let path = path.into();
        let document = match tokio::fs::read_to_string(&path).await {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => PointDocument::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn value(&self, path: &str, reference: &str) -> Option<f64> {
        let document = self.document.lock().await;
        document.get(path)?.get(reference)?.as_f64()
    }
}

#[async_trait]
impl EquipmentTarget for FileEquipment {
    async fn resolve(&self, path: &str) -> WeatherResult<Vec<PointRef>> {
        let document = self.document.lock().await;
        Ok(document
            .get(path)
            .map(|refs| {
                refs.iter()
                    .map(|(reference, value)| PointRef {
                        reference: reference.clone(),
                        kind: if value.is_string() {
                            PointKind::Text
                        } else {
                            PointKind::Numeric
                        },
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn write(&self, path: &str, reference: &str, value: f64) -> WeatherResult<()> {
        let mut document = self.document.lock().await;
        let slot = document
            .get_mut(path)
            .and_then(|refs| refs.get_mut(reference))
            .ok_or_else(|| {
                WeatherError::EquipmentWrite(format!("No point {} under {}", reference, path))
            })?;
        *slot = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        Ok(())
    }

    async fn flush(&self) -> WeatherResult<()> {
        let document = self.document.lock().await;
        let text = serde_json::to_string_pretty(&*document)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, text).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
