//! Last-known results per monitored entry.
//!
//! Each entry has two independent halves (conditions and forecast). A half
//! holds the last successful record and the last error marker, and the pair is
//! always replaced together under that half's lock. Nothing here is persisted.
//!
//! Results are only stored for tracked paths, so a refresh that finishes after
//! its entry was removed leaves nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use weather_common::{ConditionsRecord, ForecastRecord};

/// A cached result and the error marker recorded with it.
#[derive(Debug)]
pub struct Slot<T> {
    pub value: Option<Arc<T>>,
    pub error: Option<String>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            error: None,
        }
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            error: self.error.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct EntryState {
    conditions: Mutex<Slot<ConditionsRecord>>,
    forecast: Mutex<Slot<Vec<ForecastRecord>>>,
}

/// Thread-safe cache keyed by entry path.
#[derive(Debug, Default)]
pub struct EntryCache {
    entries: RwLock<HashMap<String, Arc<EntryState>>>,
}

impl EntryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self, path: &str) -> Option<Arc<EntryState>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(path).cloned()
    }

    /// Start keeping results for `path`.
    pub fn track(&self, path: &str) {
        if self.state(path).is_some() {
            return;
        }
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.entry(path.to_string()).or_default();
    }

    pub fn is_tracked(&self, path: &str) -> bool {
        self.state(path).is_some()
    }

    // === Conditions ===

    pub fn conditions(&self, path: &str) -> Slot<ConditionsRecord> {
        match self.state(path) {
            Some(state) => state.conditions.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            None => Slot::default(),
        }
    }

    pub fn last_conditions(&self, path: &str) -> Option<Arc<ConditionsRecord>> {
        self.conditions(path).value
    }

    pub fn last_conditions_error(&self, path: &str) -> Option<String> {
        self.conditions(path).error
    }

    /// Replace the conditions half; returns false when `path` is not tracked.
    pub fn set_conditions(
        &self,
        path: &str,
        value: Option<Arc<ConditionsRecord>>,
        error: Option<String>,
    ) -> bool {
        let Some(state) = self.state(path) else {
            return false;
        };
        let mut slot = state.conditions.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Slot { value, error };
        true
    }

    // === Forecast ===

    pub fn forecast(&self, path: &str) -> Slot<Vec<ForecastRecord>> {
        match self.state(path) {
            Some(state) => state.forecast.lock().unwrap_or_else(|e| e.into_inner()).clone(),
            None => Slot::default(),
        }
    }

    pub fn last_forecast(&self, path: &str) -> Option<Arc<Vec<ForecastRecord>>> {
        self.forecast(path).value
    }

    pub fn last_forecast_error(&self, path: &str) -> Option<String> {
        self.forecast(path).error
    }

    pub fn set_forecast(
        &self,
        path: &str,
        value: Option<Arc<Vec<ForecastRecord>>>,
        error: Option<String>,
    ) -> bool {
        let Some(state) = self.state(path) else {
            return false;
        };
        let mut slot = state.forecast.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Slot { value, error };
        true
    }

    /// Drop everything cached for a deleted entry.
    pub fn remove(&self, path: &str) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(path);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
