//! Tri-state values reported by provider records.

use serde::{Deserialize, Serialize};

/// A single value reported by a provider record.
///
/// `Null` means the provider supports the quantity but did not report it this
/// time; `Unsupported` means the provider never reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Reading<T> {
    Value(T),
    Null,
    Unsupported,
}

impl<T> Reading<T> {
    /// `Value` when present, `Null` otherwise.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Reading::Value(v),
            None => Reading::Null,
        }
    }

    pub fn as_ref(&self) -> Reading<&T> {
        match self {
            Reading::Value(v) => Reading::Value(v),
            Reading::Null => Reading::Null,
            Reading::Unsupported => Reading::Unsupported,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Reading<U> {
        match self {
            Reading::Value(v) => Reading::Value(f(v)),
            Reading::Null => Reading::Null,
            Reading::Unsupported => Reading::Unsupported,
        }
    }

    /// Collapse `Null` and `Unsupported` into `None`.
    pub fn value(self) -> Option<T> {
        match self {
            Reading::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Reading::Unsupported)
    }
}

impl<T> Default for Reading<T> {
    fn default() -> Self {
        Reading::Null
    }
}

impl<T> From<Option<T>> for Reading<T> {
    fn from(value: Option<T>) -> Self {
        Reading::from_option(value)
    }
}
