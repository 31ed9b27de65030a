//! Tests for Firestore client functionality.

use std::time::Duration;

use serial_test::serial;

use crate::client::FirestoreConfig;
use crate::error::FirestoreError;

// =============================================================================
// Error Type Tests
// =============================================================================

#[test]
fn test_error_from_http_status_429() {
    let err = FirestoreError::from_http_status(429, "rate limited");
    assert!(matches!(err, FirestoreError::RateLimited(_)));
    assert!(err.is_retryable());
}

#[test]
fn test_error_from_http_status_500() {
    let err = FirestoreError::from_http_status(500, "internal error");
    assert!(matches!(err, FirestoreError::ServerError(500, _)));
    assert!(err.is_retryable());
}

#[test]
fn test_error_from_http_status_400() {
    let err = FirestoreError::from_http_status(400, "bad request");
    assert!(matches!(err, FirestoreError::RequestFailed(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_error_from_http_status_404() {
    let err = FirestoreError::from_http_status(404, "not found");
    assert!(matches!(err, FirestoreError::NotFound(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_error_from_http_status_409() {
    let err = FirestoreError::from_http_status(409, "conflict");
    assert!(matches!(err, FirestoreError::AlreadyExists(_)));
    assert!(!err.is_retryable());
}

#[test]
fn test_error_http_status_getter() {
    assert_eq!(FirestoreError::RateLimited(1000).http_status(), Some(429));
    assert_eq!(
        FirestoreError::ServerError(502, "bad gateway".into()).http_status(),
        Some(502)
    );
    assert_eq!(
        FirestoreError::NotFound("doc".into()).http_status(),
        Some(404)
    );
}

#[test]
fn test_error_retry_after_ms() {
    assert_eq!(FirestoreError::RateLimited(5000).retry_after_ms(), Some(5000));
    assert_eq!(
        FirestoreError::ServerError(500, "error".into()).retry_after_ms(),
        None
    );
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
#[serial]
fn test_config_requires_project_id() {
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::remove_var("FIREBASE_PROJECT_ID");
    let result = FirestoreConfig::from_env();
    assert!(result.is_err());
}

#[test]
#[serial]
fn test_config_validates_empty_project_id() {
    std::env::set_var("GCP_PROJECT_ID", "");
    std::env::remove_var("FIREBASE_PROJECT_ID");
    let result = FirestoreConfig::from_env();
    assert!(result.is_err());
    std::env::remove_var("GCP_PROJECT_ID");
}

#[test]
#[serial]
fn test_config_accepts_firebase_project_id() {
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::set_var("FIREBASE_PROJECT_ID", "firebase-project");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.project_id, "firebase-project");
    std::env::remove_var("FIREBASE_PROJECT_ID");
}

#[test]
#[serial]
fn test_config_parses_timeout_env_vars() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "15");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(15));
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
}

#[test]
#[serial]
fn test_config_handles_invalid_env_values() {
    std::env::set_var("GCP_PROJECT_ID", "test");
    std::env::set_var("FIRESTORE_CONNECT_TIMEOUT_SECS", "not-a-number");
    let config = FirestoreConfig::from_env().unwrap();
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    std::env::remove_var("GCP_PROJECT_ID");
    std::env::remove_var("FIRESTORE_CONNECT_TIMEOUT_SECS");
}
