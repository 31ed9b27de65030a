//! Firestore REST API client for the JobHub backend.
//!
//! This crate provides:
//! - Typed repositories for the `users`, `jobs`, and `applications` collections
//! - Service account authentication via gcp_auth
//! - Merge updates, structured queries, and retry logic

pub mod client;
pub mod error;
pub mod metrics;
pub mod repos;
pub mod retry;
pub mod token_cache;
pub mod types;

#[cfg(test)]
mod client_tests;

pub use client::{FirestoreClient, FirestoreConfig};
pub use error::{FirestoreError, FirestoreResult};
pub use repos::{ApplicationRepository, JobRepository, UserRepository};
pub use types::{Document, FromFirestoreValue, ToFirestoreValue, Value};
