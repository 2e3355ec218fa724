//! WeatherBug API v7 request plumbing.

use std::time::Duration;

use tracing::debug;
use weather_common::{ServiceData, WeatherError, WeatherResult};

use crate::http::DocumentFetcher;
use crate::xml::XmlElement;

/// Service config key holding the WeatherBug API code.
pub const CONFIG_KEY_LICENSE: &str = "licenseKey";

const USER_AGENT: &str = "WeatherBug plug-in";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_ERROR_BODY: usize = 200;

/// Issues `{method}.aspx` calls and returns the parsed document.
#[derive(Debug, Clone)]
pub struct WeatherBugClient {
    fetcher: DocumentFetcher,
    /// Replaces `http://{key}.api.wxbug.net` when set
    base_url: Option<String>,
}

impl WeatherBugClient {
    pub fn new(base_url: Option<String>) -> WeatherResult<Self> {
        Ok(Self {
            fetcher: DocumentFetcher::new(REQUEST_TIMEOUT, USER_AGENT)?,
            base_url: base_url.map(|b| b.trim_end_matches('/').to_string()),
        })
    }

    /// The API code from the service config.
    pub fn license_key(config: &ServiceData) -> WeatherResult<&str> {
        config
            .get(CONFIG_KEY_LICENSE)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| WeatherError::Config("WeatherBug license key is not configured".to_string()))
    }

    pub fn method_url(&self, key: &str, method: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/{}.aspx", base, method),
            None => format!("http://{}.api.wxbug.net/{}.aspx", key, method),
        }
    }

    pub async fn call(
        &self,
        config: &ServiceData,
        method: &str,
        mut params: Vec<(&str, String)>,
    ) -> WeatherResult<XmlElement> {
        let key = Self::license_key(config)?;
        params.push(("ACode", key.to_string()));

        let url = self.method_url(key, method);
        debug!(method = %method, "Calling WeatherBug");
        let body = self.fetcher.fetch_text(&url, &params).await?;

        XmlElement::parse(&body).map_err(|e| {
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            WeatherError::provider_with(format!("Service returned \"{}\"", excerpt), e)
        })
    }
}
