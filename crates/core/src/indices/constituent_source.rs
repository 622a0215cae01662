use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use super::indices_errors::IndexError;
use super::indices_traits::ConstituentSourceTrait;
use crate::constants::DEFAULT_CSV_FETCH_TIMEOUT_SECS;
use crate::errors::{Error, Result};

/// Downloads constituent CSVs over HTTP(S).
#[derive(Clone)]
pub struct HttpConstituentSource {
    client: Client,
}

impl HttpConstituentSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("stockfolio/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Unexpected(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    pub fn with_default_timeout() -> Result<Self> {
        Self::new(Duration::from_secs(DEFAULT_CSV_FETCH_TIMEOUT_SECS))
    }
}

#[async_trait]
impl ConstituentSourceTrait for HttpConstituentSource {
    async fn fetch_csv(&self, url: &str) -> Result<String> {
        let fetch_error = |reason: String| IndexError::Fetch {
            url: url.to_string(),
            reason,
        };

        debug!("Fetching constituent CSV from {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP {}", status)).into());
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(body)
    }
}
