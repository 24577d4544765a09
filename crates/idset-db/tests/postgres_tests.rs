//! PostgreSQL adapter tests.
//!
//! Run with: `IDSET_TEST_DATABASE_URL=postgres://... cargo test -p idset-db --features integration`

#![cfg(feature = "integration")]

use idset_core::ports::{DataSource, DatasetStore};
use idset_db::{Database, PgDataSource, PgDatasetStore};
use std::time::Duration;

async fn connect() -> Database {
    let url = std::env::var("IDSET_TEST_DATABASE_URL")
        .expect("IDSET_TEST_DATABASE_URL must point at a scratch database");
    let db = Database::connect(&url, 2, Duration::from_secs(5))
        .await
        .expect("Failed to connect");
    db.migrate().await.expect("Failed to migrate");
    db
}

#[tokio::test]
async fn test_load_all_reads_definitions() {
    let db = connect().await;
    sqlx::query("DELETE FROM interactive_datasets WHERE id LIKE 'it-%'")
        .execute(db.pool())
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO interactive_datasets (id, query, presentation_place, presentation_order, cache_expiration_duration, query_params) \
         VALUES ('it-users', 'select 1', 'reports', 2, 60, '{\"dept\": 1}')",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let records = PgDatasetStore::new(db.pool().clone()).load_all().await.unwrap();
    let rec = records.iter().find(|r| r.id == "it-users").expect("record missing");
    assert_eq!(rec.query.as_deref(), Some("select 1"));
    assert_eq!(rec.presentation_order, 2);
    assert_eq!(rec.cache_expiration_secs, 60);
    let params: serde_json::Value = serde_json::from_str(rec.query_params.as_deref().unwrap()).unwrap();
    assert_eq!(params["dept"], 1);
}

#[tokio::test]
async fn test_query_stringifies_cells() {
    let db = connect().await;
    let source = PgDataSource::new(db.pool().clone());

    let raw = source
        .query(
            "select '{}'::text as id, '{}'::text as flag union all select $1::text, 'true'",
            &[Some("42".to_string())],
        )
        .await
        .unwrap();
    assert_eq!(raw.columns, vec!["id", "flag"]);
    assert_eq!(raw.rows[1], vec!["42", "true"]);

    let raw = source
        .query("select 1::int4 as n, null::text as t, true as b", &[])
        .await
        .unwrap();
    assert_eq!(raw.rows, vec![vec!["1".to_string(), String::new(), "true".to_string()]]);
}

#[tokio::test]
async fn test_query_empty_result_keeps_columns() {
    let db = connect().await;
    let source = PgDataSource::new(db.pool().clone());

    let raw = source
        .query("select 1 as a, 'x'::text as b where false", &[])
        .await
        .unwrap();
    assert_eq!(raw.columns, vec!["a", "b"]);
    assert!(raw.rows.is_empty());
}
