//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `educa_test`)
//!   `TEST_DB_PASSWORD` (default: `educa_test`)
//!   `TEST_DB_NAME` (default: `educa_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use educa_common::AppError;
use educa_db::entities::subject;
use educa_db::repositories::SubjectRepository;
use educa_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection_and_migrations() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_duplicate_subject_slug_is_conflict() {
    let db = TestDatabase::new().await.unwrap();
    db.cleanup().await.unwrap();

    let repo = SubjectRepository::new(Arc::clone(&db.conn));
    let subject = |id: &str| subject::ActiveModel {
        id: Set(id.to_string()),
        title: Set("Physics".to_string()),
        slug: Set("physics".to_string()),
    };

    repo.create(subject("s1")).await.unwrap();
    let err = repo.create(subject("s2")).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");
    db.cleanup().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}

#[test]
fn test_database_url_format() {
    let config = TestDbConfig {
        host: "testhost".to_string(),
        port: 5432,
        username: "testuser".to_string(),
        password: "testpass".to_string(),
        database: "testdb".to_string(),
    };

    let url = config.database_url();
    assert!(url.starts_with("postgres://"));
    assert!(url.contains("testhost"));
    assert!(url.contains("5432"));
    assert!(url.contains("testdb"));
}
