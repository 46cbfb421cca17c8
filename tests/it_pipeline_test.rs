//! Stage-ordering tests for the pipeline: the first failure aborts the run
//! and later stages are never reached.

use std::{
    io::Write as _,
    sync::Mutex,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use flate2::{Compression, write::GzEncoder};
use mockito::{Matcher, Server};
use restorectl::{Config, Error, SqlRestorer, pipeline, restore::RestoreError};

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

fn config_for(server: &Server) -> Config {
    Config {
        base_url: server.url().parse().unwrap(),
        access_token: "test-token".to_string(),
        // Nothing listens here; reaching the query stage fails fast with a
        // connection error rather than hanging.
        database_url: "postgres://127.0.0.1:1/unreachable".to_string(),
        psql_bin: "psql".into(),
    }
}

/// Restorer that records every invocation and returns a canned result.
#[derive(Default)]
struct RecordingRestorer {
    calls: AtomicUsize,
    last_sql: Mutex<Option<Vec<u8>>>,
    fail: bool,
}

#[async_trait]
impl SqlRestorer for RecordingRestorer {
    async fn restore(&self, sql: &[u8], _database_url: &str) -> Result<(), RestoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_sql.lock().unwrap() = Some(sql.to_vec());

        if self.fail {
            return Err(RestoreError::Spawn {
                program: "psql".to_string(),
                source: std::io::Error::other("simulated restore failure"),
            });
        }
        Ok(())
    }
}

#[tokio::test]
async fn fetch_failure_short_circuits_the_pipeline() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/challenges/backup_restore/problem")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let solve_mock = server
        .mock("POST", "/challenges/backup_restore/solve")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let restorer = RecordingRestorer::default();
    let err = pipeline::run(&config_for(&server), &restorer)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Fetch(_)));
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 0);
    solve_mock.assert_async().await;
}

#[tokio::test]
async fn restorer_receives_the_decompressed_script() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/challenges/backup_restore/problem")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "dump": general_purpose::STANDARD.encode(gzip(b"SELECT 1;")) })
                .to_string(),
        )
        .create_async()
        .await;

    let restorer = RecordingRestorer::default();
    let err = pipeline::run(&config_for(&server), &restorer)
        .await
        .unwrap_err();

    // The restore succeeded; the failure comes from the unreachable database
    // in the query stage, which proves the ordering.
    assert!(matches!(err, Error::Records(_)));
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        restorer.last_sql.lock().unwrap().as_deref(),
        Some(b"SELECT 1;".as_slice())
    );
}

#[tokio::test]
async fn corrupt_dump_aborts_before_the_restore() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/challenges/backup_restore/problem")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "dump": general_purpose::STANDARD.encode(b"not gzip at all") })
                .to_string(),
        )
        .create_async()
        .await;

    let restorer = RecordingRestorer::default();
    let err = pipeline::run(&config_for(&server), &restorer)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decompress(_)));
    assert_eq!(restorer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn restore_failure_skips_query_and_submit() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/challenges/backup_restore/problem")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            serde_json::json!({ "dump": general_purpose::STANDARD.encode(gzip(b"SELECT 1;")) })
                .to_string(),
        )
        .create_async()
        .await;
    let solve_mock = server
        .mock("POST", "/challenges/backup_restore/solve")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let restorer = RecordingRestorer {
        fail: true,
        ..Default::default()
    };
    let err = pipeline::run(&config_for(&server), &restorer)
        .await
        .unwrap_err();

    // A `Records` error here would mean the query stage ran anyway.
    assert!(matches!(err, Error::Restore(_)));
    solve_mock.assert_async().await;
}
