//! HTTP retrieval of price batches

use crate::batch::Batch;
use crate::config::ApiConfig;
use crate::error::{Error, Result};
use tracing::{debug, info};
use url::Url;

/// User agent sent with every request
const USER_AGENT: &str = concat!("albion-prices/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the price API
///
/// One instance serves a whole run. Construction validates the configured
/// base URL and bakes the request timeout into the client.
#[derive(Clone, Debug)]
pub struct PriceClient {
    http: reqwest::Client,
    base_url: String,
}

impl PriceClient {
    /// Create a client from the API configuration
    ///
    /// # Errors
    /// Returns a configuration error if the base URL does not parse or the
    /// HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid price API base URL \"{}\": {}", config.base_url, e),
            key: Some("api.base_url".to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// The request URL for one batch: the base URL plus one path segment of
    /// comma-joined identifiers with a trailing comma
    pub fn request_url(&self, batch: &Batch) -> String {
        format!("{}/{}", self.base_url, batch.joined())
    }

    /// Fetch one batch, returning the raw response body
    ///
    /// Any transport failure or non-success status is fatal for the run;
    /// there is no retry and no per-item fallback, so one bad identifier can
    /// poison its whole batch.
    pub async fn fetch(&self, index: usize, batch: &Batch) -> Result<Vec<u8>> {
        let url = self.request_url(batch);
        info!(
            batch = index,
            items = batch.len(),
            chars = batch.char_len(),
            "requesting prices"
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| Error::Http {
                batch: index,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UnexpectedStatus {
                batch: index,
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await.map_err(|source| Error::Http {
            batch: index,
            source,
        })?;
        debug!(batch = index, bytes = body.len(), "price response received");

        Ok(body.to_vec())
    }
}
