//! Where timing files come from

use crate::config::TimelineConfig;
use crate::error::{Result, TimelineError};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Fetches the raw timings text for a track folder
#[async_trait(?Send)]
pub trait TimingSource {
    async fn fetch_timings(&self, folder: &str) -> Result<String>;
}

/// Timings served next to the audio files over HTTP
#[derive(Debug, Clone)]
pub struct HttpTimingSource {
    http: Client,
    base_url: Url,
    file_name: String,
}

impl HttpTimingSource {
    /// Create a source rooted at `config.base_url`
    pub fn new(config: &TimelineConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)
            .map_err(|e| TimelineError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        // Url::join drops the last path component unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http: build_client(config)?,
            base_url,
            file_name: config.timings_file.clone(),
        })
    }

    /// URL of the timings file inside `folder`
    pub fn timings_url(&self, folder: &str) -> Result<Url> {
        let relative = format!("{}/{}", folder.trim_matches('/'), self.file_name);
        self.base_url
            .join(&relative)
            .map_err(|e| TimelineError::InvalidUrl(format!("{relative}: {e}")))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_client(config: &TimelineConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
        .build()?)
}

#[cfg(target_arch = "wasm32")]
fn build_client(_config: &TimelineConfig) -> Result<Client> {
    Ok(Client::builder().build()?)
}

#[async_trait(?Send)]
impl TimingSource for HttpTimingSource {
    async fn fetch_timings(&self, folder: &str) -> Result<String> {
        let url = self.timings_url(folder)?;
        debug!(url = %url, "Fetching timings");

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TimelineError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response.text().await?)
    }
}
