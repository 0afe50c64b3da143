//! # albion-prices
//!
//! Backend library for collecting Albion Online market prices into a
//! spreadsheet-ready table.
//!
//! ## Design Philosophy
//!
//! albion-prices is designed to be:
//! - **Batch-aware** - Identifiers are packed under a character cap so each
//!   request stays inside URL limits
//! - **Deterministic** - One fetch worker and one aggregator, so the same
//!   inputs always produce the same table
//! - **Sensible defaults** - Works against the public price API with zero
//!   configuration
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//!
//! ## Quick Start
//!
//! ```no_run
//! use albion_prices::{Config, SheetsPublisher, run_and_publish};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.sheets.spreadsheet_id = "1BxiMVs0XRA5nFMdKvBdBZjgmUUqptlbs74OgvE2upms".to_string();
//!
//!     let publisher = SheetsPublisher::new(&config.sheets)?;
//!     let table = run_and_publish(&config, &publisher).await?;
//!     println!("published {} items across {} cities", table.item_count(), table.city_count());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Identifier batching under a character cap
pub mod batch;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Price API client
pub mod fetch;
/// Item identifier lists and enchantment expansion
pub mod items;
/// Pipeline orchestration
pub mod pipeline;
/// Publishing the table to a spreadsheet
pub mod publish;
/// Spreadsheet table assembly
pub mod table;
/// Core types
pub mod types;

// Re-export commonly used types
pub use batch::{Batch, Batcher, batch_all};
pub use config::{ApiConfig, BatchingConfig, Config, ListsConfig, PipelineConfig, SheetsConfig};
pub use error::{Error, Result, Stage};
pub use fetch::PriceClient;
pub use items::ENCHANTMENT_SUFFIXES;
pub use pipeline::{run, run_and_publish};
pub use publish::{NoOpPublisher, Publisher, SheetsPublisher};
pub use table::Table;
pub use types::{Cell, PriceRecord};
