//! Error types for the weather refresh services.

use std::error::Error as StdError;

use thiserror::Error;

/// Result type alias using WeatherError.
pub type WeatherResult<T> = Result<T, WeatherError>;

/// Boxed underlying cause carried by provider failures.
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Primary error type for provider, equipment and configuration operations.
#[derive(Debug, Error)]
pub enum WeatherError {
    // === Provider Errors ===
    #[error("Invalid configuration data: {0}")]
    InvalidConfigurationData(String),

    #[error("Provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<BoxedCause>,
    },

    #[error("Missing station content: {0}")]
    MissingStationContent(String),

    // === Equipment Errors ===
    #[error("Equipment write failed: {0}")]
    EquipmentWrite(String),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl WeatherError {
    /// Provider failure without an underlying cause.
    pub fn provider(message: impl Into<String>) -> Self {
        WeatherError::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// Provider failure wrapping the transport or parse error that caused it.
    pub fn provider_with<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        WeatherError::Provider {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }

    /// True for failures talking to or parsing a remote provider.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            WeatherError::Provider { .. } | WeatherError::MissingStationContent(_)
        )
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            WeatherError::InvalidConfigurationData(_) | WeatherError::Config(_) => 400,
            WeatherError::Provider { .. } | WeatherError::MissingStationContent(_) => 502,
            WeatherError::EquipmentWrite(_) => 500,
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for WeatherError {
    fn from(err: std::io::Error) -> Self {
        WeatherError::EquipmentWrite(err.to_string())
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        WeatherError::EquipmentWrite(format!("JSON error: {}", err))
    }
}
