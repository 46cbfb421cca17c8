//! Live-database test for the alive-records query, backed by an ephemeral
//! PostgreSQL instance.

use pgtemp::PgTempDB;
use restorectl::records;
use sqlx::{Connection as _, Executor as _, PgConnection};

/// Restored schema slice this tool queries against.
const SEED_SQL: &str = r#"
    CREATE TABLE criminal_records (ssn TEXT NOT NULL, status TEXT NOT NULL);
    INSERT INTO criminal_records (ssn, status) VALUES
        ('111', 'alive'),
        ('222', 'dead'),
        ('333', 'alive');
"#;

#[tokio::test]
#[ignore = "requires PostgreSQL binaries (initdb/postgres) on PATH"]
async fn returns_alive_ssns_in_result_set_order() {
    let db = PgTempDB::new();
    let url = db.connection_uri();

    let mut conn = PgConnection::connect(&url).await.unwrap();
    conn.execute(SEED_SQL).await.unwrap();
    conn.close().await.unwrap();

    let ssns = records::alive_ssns(&url).await.unwrap();
    assert_eq!(ssns, vec!["111".to_string(), "333".to_string()]);
}

#[tokio::test]
#[ignore = "requires PostgreSQL binaries (initdb/postgres) on PATH"]
async fn missing_table_fails_after_releasing_the_connection() {
    let db = PgTempDB::new();
    let url = db.connection_uri();

    let err = records::alive_ssns(&url).await.unwrap_err();
    assert!(matches!(err, records::QueryError::Query(_)));

    // The connection slot is free again: a fresh connection succeeds.
    let conn = PgConnection::connect(&url).await.unwrap();
    conn.close().await.unwrap();
}
