//! HTTP client for the challenge service.
//!
//! Wraps a reqwest client and provides typed methods for the two
//! `backup_restore` endpoints: fetching the problem dump and submitting the
//! solution. The access token travels as an `access_token` query parameter
//! on both calls.

use base64::{Engine as _, engine::general_purpose};
use reqwest::StatusCode;
use url::Url;

/// Path of the problem endpoint, relative to the base URL.
///
/// GET `/challenges/backup_restore/problem`
const PROBLEM_PATH: &str = "challenges/backup_restore/problem";

/// Path of the solve endpoint, relative to the base URL.
///
/// POST `/challenges/backup_restore/solve`
const SOLVE_PATH: &str = "challenges/backup_restore/solve";

/// Response body of the problem endpoint.
#[derive(Debug, serde::Deserialize)]
struct ProblemResponse {
    /// Base64-encoded, gzip-compressed SQL dump
    dump: String,
}

/// Request body of the solve endpoint.
#[derive(Debug, serde::Serialize)]
struct Solution<'a> {
    alive_ssns: &'a [String],
}

/// HTTP client for the challenge service.
#[derive(Debug, Clone)]
pub struct ChallengeClient {
    /// The underlying HTTP client
    http: reqwest::Client,
    /// Base URL of the challenge service
    base_url: Url,
    /// Access token appended to every request
    access_token: String,
}

impl ChallengeClient {
    /// Create a new client for the service at `base_url`.
    pub fn new(mut base_url: Url, access_token: impl Into<String>) -> Self {
        // Ensure that no path segments are dropped when joining on this URL.
        if !base_url.path().ends_with('/') {
            base_url = format!("{base_url}/").parse().expect("still a valid URL");
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            access_token: access_token.into(),
        }
    }

    /// Fetch the problem dump and decode it to raw (still gzip-compressed) bytes.
    ///
    /// GETs `/challenges/backup_restore/problem` and base64-decodes the `dump`
    /// field of the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on network failures, non-success statuses, a
    /// malformed response body, or a `dump` field that is not valid base64.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_dump(&self) -> Result<Vec<u8>, FetchError> {
        let url = self.base_url.join(PROBLEM_PATH).expect("valid URL");

        tracing::debug!(url = %url, "Requesting problem dump");

        let response = self
            .http
            .get(url.as_str())
            .query(&[("access_token", self.access_token.as_str())])
            .send()
            .await
            .map_err(|err| FetchError::Network {
                url: url.to_string(),
                source: err,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let problem: ProblemResponse = response
            .json()
            .await
            .map_err(|err| FetchError::MalformedResponse { source: err })?;

        let dump = general_purpose::STANDARD
            .decode(&problem.dump)
            .map_err(|err| FetchError::DumpDecode { source: err })?;

        tracing::debug!(compressed_len = dump.len(), "Decoded problem dump");
        Ok(dump)
    }

    /// Submit the collected SSNs and return the service's response verbatim.
    ///
    /// POSTs `{"alive_ssns": [...]}` to `/challenges/backup_restore/solve`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError`] on network failures, non-success statuses, or a
    /// response body that is not JSON.
    #[tracing::instrument(skip(self, alive_ssns), fields(count = alive_ssns.len()))]
    pub async fn submit_solution(
        &self,
        alive_ssns: &[String],
    ) -> Result<serde_json::Value, SubmitError> {
        let url = self.base_url.join(SOLVE_PATH).expect("valid URL");

        tracing::debug!(url = %url, "Submitting solution");

        let response = self
            .http
            .post(url.as_str())
            .query(&[("access_token", self.access_token.as_str())])
            .json(&Solution { alive_ssns })
            .send()
            .await
            .map_err(|err| SubmitError::Network {
                url: url.to_string(),
                source: err,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::Status {
                url: url.to_string(),
                status,
            });
        }

        response
            .json()
            .await
            .map_err(|err| SubmitError::MalformedResponse { source: err })
    }
}

/// Errors that can occur while fetching the problem dump.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Request failed at the network level
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service returned a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// Response body was not the expected JSON shape
    #[error("problem response is not valid JSON with a `dump` field")]
    MalformedResponse {
        #[source]
        source: reqwest::Error,
    },

    /// The `dump` field was not valid base64
    #[error("`dump` field is not valid base64")]
    DumpDecode {
        #[source]
        source: base64::DecodeError,
    },
}

/// Errors that can occur while submitting the solution.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Request failed at the network level
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Service returned a non-success status
    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// Response body was not JSON
    #[error("solve response is not valid JSON")]
    MalformedResponse {
        #[source]
        source: reqwest::Error,
    },
}
