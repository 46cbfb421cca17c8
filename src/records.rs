//! Direct database query for the records that survive the restore.

use sqlx::{Connection as _, PgConnection};

/// The fixed query the challenge asks for.
///
/// Result-set order is preserved as returned by the server.
const ALIVE_SSNS_QUERY: &str = "SELECT ssn FROM criminal_records WHERE status = 'alive'";

/// Collect the SSNs of all alive records from the restored database.
///
/// Opens a single connection (no pool), runs [`ALIVE_SSNS_QUERY`], and closes
/// the connection on every exit path before propagating any query failure.
///
/// # Errors
///
/// Returns [`QueryError`] if the connection cannot be established or the
/// query fails.
#[tracing::instrument(skip(database_url), err)]
pub async fn alive_ssns(database_url: &str) -> Result<Vec<String>, QueryError> {
    let mut conn = PgConnection::connect(database_url)
        .await
        .map_err(QueryError::Connect)?;

    let result = sqlx::query_scalar::<_, String>(ALIVE_SSNS_QUERY)
        .fetch_all(&mut conn)
        .await;

    // Release the connection before surfacing any query error.
    if let Err(err) = conn.close().await {
        tracing::warn!(error = %err, "Failed to close database connection cleanly");
    }

    let ssns = result.map_err(QueryError::Query)?;
    tracing::debug!(count = ssns.len(), "Collected alive SSNs");
    Ok(ssns)
}

/// Errors that can occur while querying the restored records.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// The database connection could not be established
    #[error("failed to connect to the database")]
    Connect(#[source] sqlx::Error),

    /// The alive-records query failed
    #[error("alive-records query failed")]
    Query(#[source] sqlx::Error),
}
