//! Error types for albion-prices
//!
//! This module provides error handling for the library, including:
//! - One variant per failure class (configuration, list files, transport,
//!   parse, publish, worker)
//! - Batch sequence numbers on transport and parse failures
//! - A [`Stage`] tag identifying which pipeline stage an error belongs to

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for albion-prices operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for albion-prices
///
/// The pipeline is single-shot: every variant is fatal to the run that
/// produced it. Variants carry the batch sequence number where one applies,
/// so a caller deciding whether to retry the whole run knows where it died.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "pipeline.identifier_queue")
        key: Option<String>,
    },

    /// An item list file could not be read
    #[error("cannot read item list {path}: {source}")]
    ItemList {
        /// Path of the list file that failed to load
        path: PathBuf,
        /// The underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A price request failed at the transport level
    #[error("price request for batch {batch} failed: {source}")]
    Http {
        /// Sequence number of the batch whose request failed
        batch: usize,
        /// The underlying HTTP client failure
        #[source]
        source: reqwest::Error,
    },

    /// The price API answered with a non-success status
    #[error("price request for batch {batch} returned status {status} from {url}")]
    UnexpectedStatus {
        /// Sequence number of the batch whose request was rejected
        batch: usize,
        /// The HTTP status code received
        status: u16,
        /// The request URL that was rejected
        url: String,
    },

    /// A response body was not the expected JSON record list
    #[error("cannot parse price response for batch {batch}: {source}")]
    Parse {
        /// Sequence number of the batch whose response failed to parse
        batch: usize,
        /// The underlying JSON failure
        #[source]
        source: serde_json::Error,
    },

    /// The stored token file could not be read or parsed
    #[error("cannot load token from {path}: {reason}")]
    Token {
        /// Path of the token file
        path: PathBuf,
        /// Why loading failed (I/O or JSON detail)
        reason: String,
    },

    /// Publishing the assembled table failed
    #[error("publish failed: {reason}")]
    Publish {
        /// Transport or status detail from the spreadsheet API
        reason: String,
    },

    /// A pipeline worker task panicked or was aborted
    #[error("pipeline worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl Error {
    /// The pipeline stage this error is tagged with, if any.
    ///
    /// `Config` and `Worker` errors are not tied to a single stage and
    /// return `None`.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::Config { .. } | Error::Worker(_) => None,
            Error::ItemList { .. } => Some(Stage::Feed),
            Error::Http { .. } | Error::UnexpectedStatus { .. } => Some(Stage::Fetch),
            Error::Parse { .. } => Some(Stage::Aggregate),
            Error::Token { .. } | Error::Publish { .. } => Some(Stage::Publish),
        }
    }
}

/// Pipeline stage an [`Error`] is tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading item lists and feeding identifiers
    Feed,
    /// Batching identifiers and requesting prices
    Fetch,
    /// Parsing responses and folding them into the table
    Aggregate,
    /// Pushing the finished table to the spreadsheet
    Publish,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Feed => "feed",
            Stage::Fetch => "fetch",
            Stage::Aggregate => "aggregate",
            Stage::Publish => "publish",
        };
        f.write_str(name)
    }
}
