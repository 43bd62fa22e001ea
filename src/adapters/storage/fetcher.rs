//! HTTP download of finished export artifacts

use crate::domain::StorageError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Default artifact download timeout
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads artifacts from the pre-signed URLs returned by export jobs
///
/// # Example
///
/// ```no_run
/// use qsvault::adapters::storage::HttpArtifactFetcher;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpArtifactFetcher::new(Duration::from_secs(300))?;
/// let bytes = fetcher.fetch("https://example.com/bundle.qs").await?;
/// println!("{} bytes", bytes.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpArtifactFetcher {
    client: Client,
}

impl HttpArtifactFetcher {
    /// Creates a fetcher whose requests time out after `timeout`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> Result<Self, StorageError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Download(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Fetches the artifact at `url`
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidUrl`] when the URL is unparseable or not http(s);
    ///   no request is made
    /// - [`StorageError::Download`] on transport failure or timeout
    /// - [`StorageError::HttpStatus`] for any status other than 200
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let parsed = validate_download_url(url)?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        if response.status() != StatusCode::OK {
            return Err(StorageError::HttpStatus(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Download(e.to_string()))?;

        tracing::debug!(size_bytes = bytes.len(), "Artifact downloaded");
        Ok(bytes.to_vec())
    }
}

/// Accepts only absolute http and https URLs
pub fn validate_download_url(url: &str) -> Result<Url, StorageError> {
    let parsed = Url::parse(url).map_err(|e| StorageError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(StorageError::InvalidUrl(format!(
            "unsupported scheme '{scheme}'"
        ))),
    }
}
