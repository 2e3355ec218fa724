//! Configured monitoring locations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::station::StationSource;

/// Provider-specific key-value data (global or per entry).
pub type ServiceData = BTreeMap<String, String>;

/// A monitored location: an equipment path, its station and provider data.
///
/// Identity is the trimmed path; two entries with the same path are equal
/// regardless of their station or data. Entries are replaced wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationEntry {
    path: String,
    station: StationSource,
    #[serde(default)]
    data: ServiceData,
}

impl LocationEntry {
    pub fn new(path: impl AsRef<str>, station: StationSource, data: ServiceData) -> Self {
        Self {
            path: path.as_ref().trim().to_string(),
            station,
            data,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn station(&self) -> &StationSource {
        &self.station
    }

    pub fn data(&self) -> &ServiceData {
        &self.data
    }

    pub fn data_value(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

impl PartialEq for LocationEntry {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for LocationEntry {}

impl Hash for LocationEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
