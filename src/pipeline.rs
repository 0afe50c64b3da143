//! Pipeline orchestration from identifier lists to a finished table

use crate::batch::{Batch, Batcher};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::PriceClient;
use crate::items;
use crate::publish::Publisher;
use crate::table::Table;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// One fetched response body, tagged with its batch sequence number
struct BatchResponse {
    batch: usize,
    body: Vec<u8>,
}

fn validate(config: &Config) -> Result<()> {
    if config.pipeline.identifier_queue == 0 {
        return Err(Error::Config {
            message: "identifier queue capacity must be at least 1".to_string(),
            key: Some("pipeline.identifier_queue".to_string()),
        });
    }

    if config.pipeline.response_queue == 0 {
        return Err(Error::Config {
            message: "response queue capacity must be at least 1".to_string(),
            key: Some("pipeline.response_queue".to_string()),
        });
    }

    Ok(())
}

/// Run the full pipeline and return the assembled table
///
/// Reads the configured identifier lists, batches the identifiers under the
/// character cap, fetches each batch from the price API and folds every
/// response into one [`Table`]. A single fetch worker is used, so responses
/// are folded in batch-submission order and the resulting table is
/// deterministic for a given input and set of responses.
///
/// The stages run on separate tasks connected by bounded queues; the first
/// failure cancels the others, and no partial table is returned.
///
/// # Errors
/// Returns the most upstream stage failure: list reading, then fetching, then
/// response parsing. Parse failures are downgraded to warnings when
/// `pipeline.skip_malformed_responses` is enabled.
///
/// # Examples
///
/// ```no_run
/// use albion_prices::config::Config;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let table = albion_prices::pipeline::run(&config).await?;
/// println!("priced {} items across {} cities", table.item_count(), table.city_count());
/// # Ok(())
/// # }
/// ```
pub async fn run(config: &Config) -> Result<Table> {
    validate(config)?;

    let names = items::item_names(&config.lists)?;
    let client = PriceClient::new(&config.api)?;
    let cancel = CancellationToken::new();

    let (identifier_tx, identifier_rx) = mpsc::channel(config.pipeline.identifier_queue);
    let (response_tx, mut response_rx) = mpsc::channel(config.pipeline.response_queue);

    info!(identifiers = names.len(), "starting price pipeline");

    let feeder = tokio::spawn(feed_identifiers(names, identifier_tx, cancel.clone()));
    let fetcher = tokio::spawn(fetch_batches(
        client,
        config.batching.length_cap,
        identifier_rx,
        response_tx,
        cancel.clone(),
    ));

    let skip_malformed = config.pipeline.skip_malformed_responses;
    let mut table = Table::new();
    let mut aggregate_error = None;

    loop {
        let response = tokio::select! {
            _ = cancel.cancelled() => break,
            response = response_rx.recv() => match response {
                Some(response) => response,
                None => break,
            },
        };

        match table.fold_response(response.batch, &response.body) {
            Ok(_) => {}
            Err(e) if skip_malformed => {
                warn!(batch = response.batch, error = %e, "skipping malformed response");
            }
            Err(e) => {
                error!(batch = response.batch, error = %e, "aborting run on malformed response");
                cancel.cancel();
                aggregate_error = Some(e);
                break;
            }
        }
    }

    feeder.await?;
    let fetch_result = fetcher.await?;

    fetch_result?;
    if let Some(e) = aggregate_error {
        return Err(e);
    }

    info!(
        items = table.item_count(),
        cities = table.city_count(),
        "pipeline complete"
    );
    Ok(table)
}

/// Run the pipeline and push the finished table to the publisher
///
/// # Errors
/// Returns the pipeline failure if the run aborts (nothing is published in
/// that case), or the publish failure if the table cannot be delivered.
///
/// # Examples
///
/// ```no_run
/// use albion_prices::config::Config;
/// use albion_prices::publish::SheetsPublisher;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let publisher = SheetsPublisher::new(&config.sheets)?;
/// albion_prices::pipeline::run_and_publish(&config, &publisher).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_and_publish(config: &Config, publisher: &dyn Publisher) -> Result<Table> {
    let table = run(config).await?;
    publisher.publish(&table).await?;
    Ok(table)
}

async fn feed_identifiers(
    names: Vec<String>,
    identifiers: mpsc::Sender<String>,
    cancel: CancellationToken,
) {
    for name in names {
        let sent = tokio::select! {
            _ = cancel.cancelled() => false,
            result = identifiers.send(name) => result.is_ok(),
        };

        if !sent {
            debug!("identifier feed stopped early");
            return;
        }
    }

    debug!("all identifiers queued");
}

async fn fetch_batches(
    client: PriceClient,
    length_cap: usize,
    mut identifiers: mpsc::Receiver<String>,
    responses: mpsc::Sender<BatchResponse>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut batcher = Batcher::new(length_cap);
    let mut sequence = 0usize;

    loop {
        let identifier = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("fetch worker cancelled");
                return Ok(());
            }
            identifier = identifiers.recv() => match identifier {
                Some(identifier) => identifier,
                None => break,
            },
        };

        if let Some(batch) = batcher.push(identifier) {
            sequence += 1;
            if !forward_batch(&client, sequence, batch, &responses, &cancel).await? {
                return Ok(());
            }
        }
    }

    if let Some(batch) = batcher.finish() {
        sequence += 1;
        forward_batch(&client, sequence, batch, &responses, &cancel).await?;
    }

    debug!(batches = sequence, "all batches fetched");
    Ok(())
}

/// Fetch one batch and hand the body to the aggregator
///
/// Returns `Ok(false)` when the pipeline is shutting down and no further
/// batches should be fetched.
async fn forward_batch(
    client: &PriceClient,
    sequence: usize,
    batch: Batch,
    responses: &mpsc::Sender<BatchResponse>,
    cancel: &CancellationToken,
) -> Result<bool> {
    let body = tokio::select! {
        _ = cancel.cancelled() => {
            debug!(batch = sequence, "abandoning in-flight fetch at shutdown");
            return Ok(false);
        }
        result = client.fetch(sequence, &batch) => match result {
            Ok(body) => body,
            Err(e) => {
                error!(batch = sequence, error = %e, "aborting run on failed fetch");
                cancel.cancel();
                return Err(e);
            }
        },
    };

    let sent = tokio::select! {
        _ = cancel.cancelled() => false,
        result = responses.send(BatchResponse { batch: sequence, body }) => result.is_ok(),
    };

    Ok(sent)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;
    use crate::types::Cell;

    fn config_with_lists(dir: &tempfile::TempDir, enchantable: &str, fixed: &str) -> Config {
        let enchantable_path = dir.path().join("enchantable.txt");
        let fixed_path = dir.path().join("fixed.txt");
        std::fs::write(&enchantable_path, enchantable).unwrap();
        std::fs::write(&fixed_path, fixed).unwrap();

        let mut config = Config::default();
        config.lists.enchantable_path = enchantable_path;
        config.lists.fixed_path = fixed_path;
        config
    }

    #[tokio::test]
    async fn zero_identifier_queue_capacity_is_rejected() {
        let mut config = Config::default();
        config.pipeline.identifier_queue = 0;

        let err = run(&config).await.unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("pipeline.identifier_queue"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_response_queue_capacity_is_rejected() {
        let mut config = Config::default();
        config.pipeline.response_queue = 0;

        let err = run(&config).await.unwrap_err();
        match err {
            Error::Config { key, .. } => {
                assert_eq!(key.as_deref(), Some("pipeline.response_queue"));
            }
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_item_list_fails_before_any_fetching() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.lists.enchantable_path = dir.path().join("missing.txt");
        config.lists.fixed_path = dir.path().join("also-missing.txt");

        let err = run(&config).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Feed));
    }

    #[tokio::test]
    async fn empty_lists_produce_the_bare_corner_without_any_requests() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_with_lists(&dir, "", "");

        let table = run(&config).await.unwrap();

        assert_eq!(table.rows(), &[vec![Cell::Empty]]);
        assert_eq!(table.item_count(), 0);
        assert_eq!(table.city_count(), 0);
    }
}
