//! Publishing the assembled table to a spreadsheet

use crate::config::SheetsConfig;
use crate::error::{Error, Result};
use crate::table::Table;
use crate::types::Cell;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use url::Url;

/// Timeout for the one update request, in seconds
const UPDATE_TIMEOUT_SECS: u64 = 30;

/// Destination for a completed table
///
/// The pipeline pushes the whole table exactly once, after aggregation
/// finishes; there is no incremental update.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Push the table in one update
    async fn publish(&self, table: &Table) -> Result<()>;
}

/// Publisher that drops the table
///
/// Used for dry runs and for exercising the pipeline without spreadsheet
/// credentials.
///
/// # Examples
///
/// ```
/// use albion_prices::publish::{NoOpPublisher, Publisher};
/// use albion_prices::table::Table;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let table = Table::new();
/// NoOpPublisher.publish(&table).await?;
/// # Ok(())
/// # }
/// ```
pub struct NoOpPublisher;

#[async_trait]
impl Publisher for NoOpPublisher {
    async fn publish(&self, table: &Table) -> Result<()> {
        info!(
            items = table.item_count(),
            cities = table.city_count(),
            "discarding table (no-op publisher)"
        );
        Ok(())
    }
}

/// Stored OAuth token file contents
///
/// Only the access token is used; refresh handling is out of scope, so an
/// expired token simply fails the update.
#[derive(Debug, Deserialize)]
struct StoredToken {
    access_token: String,
}

fn read_token(path: &Path) -> Result<StoredToken> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Token {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    serde_json::from_str(&contents).map_err(|e| Error::Token {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Request body for a values update
#[derive(Serialize)]
struct ValueRange<'a> {
    values: &'a [Vec<Cell>],
}

/// Publisher that updates one Google Sheets range
///
/// Issues a single `values.update` call: a PUT of the table rows to the
/// configured spreadsheet, range `{sheet_name}!{start_cell}`, with
/// `valueInputOption=USER_ENTERED` and the stored bearer token.
#[derive(Clone, Debug)]
pub struct SheetsPublisher {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl SheetsPublisher {
    /// Create a publisher from the sheets configuration
    ///
    /// # Errors
    /// Returns a configuration error if the API base URL does not parse, the
    /// spreadsheet id is empty, or the HTTP client cannot be created
    pub fn new(config: &SheetsConfig) -> Result<Self> {
        Url::parse(&config.api_base_url).map_err(|e| Error::Config {
            message: format!(
                "invalid sheets API base URL \"{}\": {}",
                config.api_base_url, e
            ),
            key: Some("sheets.api_base_url".to_string()),
        })?;

        if config.spreadsheet_id.is_empty() {
            return Err(Error::Config {
                message: "spreadsheet id must be set before publishing".to_string(),
                key: Some("sheets.spreadsheet_id".to_string()),
            });
        }

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(UPDATE_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// The A1 range the table is anchored at, e.g. "MarketData!A1"
    fn range(&self) -> String {
        format!("{}!{}", self.config.sheet_name, self.config.start_cell)
    }

    fn update_url(&self, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.spreadsheet_id,
            urlencoding::encode(range),
        )
    }
}

#[async_trait]
impl Publisher for SheetsPublisher {
    async fn publish(&self, table: &Table) -> Result<()> {
        let token = read_token(&self.config.token_path)?;
        let range = self.range();
        let url = self.update_url(&range);
        let body = ValueRange {
            values: table.rows(),
        };

        info!(
            range = %range,
            items = table.item_count(),
            cities = table.city_count(),
            "publishing table"
        );

        let response = self
            .http
            .put(&url)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .bearer_auth(&token.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Publish {
                reason: format!("spreadsheet update failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Publish {
                reason: format!("spreadsheet update returned status {}", status.as_u16()),
            });
        }

        Ok(())
    }
}
