//! Axum HTTP API server for the JobHub job board.
//!
//! This crate provides:
//! - Credential issuance and verification (signed, time-limited tokens)
//! - The per-request access gate for page navigation
//! - CRUD endpoints for accounts, jobs, and applications
//! - Rate limiting, security headers, and Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{AuthUser, Principal, TokenService};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::AccountService;
pub use state::AppState;
