//! HTTP document fetching shared by the providers.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use weather_common::{WeatherError, WeatherResult};

use crate::xml::XmlElement;

/// Longest response body excerpt included in error messages.
const MAX_ERROR_BODY: usize = 500;

/// Thin wrapper over a reqwest client that returns parsed XML documents.
#[derive(Debug, Clone)]
pub struct DocumentFetcher {
    client: Client,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> WeatherResult<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| WeatherError::provider_with("Failed to create HTTP client", e))?;

        Ok(Self { client })
    }

    /// GET a URL with query parameters and return the body text.
    pub async fn fetch_text(&self, url: &str, params: &[(&str, String)]) -> WeatherResult<String> {
        debug!(url = %url, "Fetching provider document");

        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| WeatherError::provider_with(format!("Request to {} failed", url), e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::provider_with(format!("Failed to read body from {}", url), e))?;

        if !status.is_success() {
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(WeatherError::provider(format!(
                "{} returned status {}: {}",
                url, status, excerpt
            )));
        }

        Ok(body)
    }

    /// GET a URL and parse the response as XML.
    pub async fn fetch_xml(&self, url: &str, params: &[(&str, String)]) -> WeatherResult<XmlElement> {
        let body = self.fetch_text(url, params).await?;
        XmlElement::parse(&body)
    }
}
