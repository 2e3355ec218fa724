//! Scheduled weather refresh service.
//!
//! Polls the configured weather provider on two independent cadences
//! (current conditions and forecasts), writes the numeric fields of each
//! result to equipment points, and keeps the last result and error of every
//! monitored entry for the management API.

pub mod cache;
pub mod config;
pub mod equipment;
pub mod lookup;
pub mod metrics;
pub mod scheduler;
pub mod server;

pub use cache::EntryCache;
pub use config::{ConfigStore, WeatherConfig};
pub use equipment::{EquipmentTarget, EquipmentWriter, FileEquipment, MemoryEquipment, PointKind, PointRef};
pub use lookup::{RefreshEngine, ERROR_READING_DATA, ERROR_WRITING_DATA};
pub use scheduler::{PassSummary, Scheduler};
pub use server::AppState;
