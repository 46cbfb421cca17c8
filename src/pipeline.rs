//! Orchestration of the four pipeline stages.
//!
//! Control flows strictly forward: fetch, restore, query, submit. Each stage
//! is awaited to completion before the next starts and the first failure
//! aborts the run; completed stages are never rolled back.

use crate::{
    client::{ChallengeClient, FetchError, SubmitError},
    config::Config,
    dump::{self, DecompressError},
    records::{self, QueryError},
    restore::{RestoreError, SqlRestorer},
};

/// Run the full pipeline and return the service's solve response.
///
/// # Errors
///
/// Returns the first stage failure; later stages are not attempted.
pub async fn run<R>(config: &Config, restorer: &R) -> Result<serde_json::Value, Error>
where
    R: SqlRestorer + ?Sized,
{
    let client = ChallengeClient::new(config.base_url.clone(), config.access_token.clone());

    let dump = client.fetch_dump().await?;
    tracing::info!(compressed_len = dump.len(), "Fetched problem dump");

    let sql = dump::decompress(&dump)?;
    tracing::info!(sql_len = sql.len(), "Decompressed dump to SQL script");

    restorer.restore(&sql, &config.database_url).await?;
    tracing::info!("Restored dump into target database");

    let alive_ssns = records::alive_ssns(&config.database_url).await?;
    tracing::info!(count = alive_ssns.len(), "Collected alive SSNs");

    let response = client.submit_solution(&alive_ssns).await?;
    tracing::info!("Solution submitted");

    Ok(response)
}

/// First failure of any pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Fetching the problem dump failed
    #[error("failed to fetch the problem dump")]
    Fetch(#[from] FetchError),

    /// The dump could not be decompressed
    #[error("failed to decompress the problem dump")]
    Decompress(#[from] DecompressError),

    /// The restore client failed
    #[error("failed to restore the dump")]
    Restore(#[from] RestoreError),

    /// Querying the restored records failed
    #[error("failed to query the restored records")]
    Records(#[from] QueryError),

    /// Submitting the solution failed
    #[error("failed to submit the solution")]
    Submit(#[from] SubmitError),
}
