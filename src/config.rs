//! Configuration types for albion-prices

use serde::{Deserialize, Serialize};
use std::{path::PathBuf, time::Duration};

/// Price API configuration (endpoint, timeout)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the price endpoint; batch identifiers are appended as one
    /// extra path segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

/// Batch sizing configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchingConfig {
    /// Cap on the summed identifier length of one batch, in bytes
    /// (default: 200)
    ///
    /// The cap counts raw identifiers only; the commas joining them in the
    /// request URL are not counted. A single identifier longer than the cap
    /// still goes out, alone in its own batch.
    #[serde(default = "default_length_cap")]
    pub length_cap: usize,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            length_cap: default_length_cap(),
        }
    }
}

/// Pipeline queue capacities and failure policy
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Capacity of the identifier queue between the feeder and the fetch
    /// worker (default: 32); must be at least 1
    #[serde(default = "default_identifier_queue")]
    pub identifier_queue: usize,

    /// Capacity of the response queue between the fetch worker and the
    /// aggregator (default: 16); must be at least 1
    #[serde(default = "default_response_queue")]
    pub response_queue: usize,

    /// Skip a response that fails to parse instead of aborting the run
    /// (default: false)
    ///
    /// Off, a malformed response kills the whole run. On, it is logged as a
    /// warning and its batch contributes nothing to the table.
    #[serde(default)]
    pub skip_malformed_responses: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            identifier_queue: default_identifier_queue(),
            response_queue: default_response_queue(),
            skip_malformed_responses: false,
        }
    }
}

/// Item list file locations
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListsConfig {
    /// Newline-separated base names of enchantable resources; each expands
    /// into the base name plus its three enchantment variants
    #[serde(default = "default_enchantable_path")]
    pub enchantable_path: PathBuf,

    /// Newline-separated names of items taken verbatim
    #[serde(default = "default_fixed_path")]
    pub fixed_path: PathBuf,
}

impl Default for ListsConfig {
    fn default() -> Self {
        Self {
            enchantable_path: default_enchantable_path(),
            fixed_path: default_fixed_path(),
        }
    }
}

/// Spreadsheet publishing configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Base URL of the Sheets API (override to point tests at a mock server)
    #[serde(default = "default_sheets_base_url")]
    pub api_base_url: String,

    /// Target spreadsheet id (default: empty; must be set before publishing)
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Sheet (tab) the table lands on (default: "MarketData")
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Top-left cell the table is anchored at (default: "A1")
    #[serde(default = "default_start_cell")]
    pub start_cell: String,

    /// Path of the stored OAuth token file; only its `access_token` field is
    /// used
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_sheets_base_url(),
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            start_cell: default_start_cell(),
            token_path: default_token_path(),
        }
    }
}

/// Main configuration for a price run
///
/// Fields are organized into logical sub-configs:
/// - [`api`](ApiConfig) — price endpoint and timeout
/// - [`batching`](BatchingConfig) — request size cap
/// - [`pipeline`](PipelineConfig) — queue capacities, malformed-response policy
/// - [`lists`](ListsConfig) — item list file locations
/// - [`sheets`](SheetsConfig) — publish destination and token file
///
/// Every field has a serde default, so a partial (or empty) JSON document
/// deserializes into a usable configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Price API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Batch sizing settings
    #[serde(default)]
    pub batching: BatchingConfig,

    /// Pipeline queue and failure-policy settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Item list file locations
    #[serde(default)]
    pub lists: ListsConfig,

    /// Spreadsheet publishing settings
    #[serde(default)]
    pub sheets: SheetsConfig,
}

fn default_base_url() -> String {
    "https://www.albion-online-data.com/api/v2/stats/prices".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_length_cap() -> usize {
    200
}

fn default_identifier_queue() -> usize {
    32
}

fn default_response_queue() -> usize {
    16
}

fn default_enchantable_path() -> PathBuf {
    PathBuf::from("enchantableResources.txt")
}

fn default_fixed_path() -> PathBuf {
    PathBuf::from("unenchantableItems.txt")
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".to_string()
}

fn default_sheet_name() -> String {
    "MarketData".to_string()
}

fn default_start_cell() -> String {
    "A1".to_string()
}

fn default_token_path() -> PathBuf {
    PathBuf::from("token.json")
}

// Duration serialization helper (serializes as seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
