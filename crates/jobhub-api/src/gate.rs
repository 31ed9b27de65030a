//! The access gate: per-request filter for page navigation.
//!
//! Runs before any handler and decides one of three outcomes: pass
//! through, redirect to the login page, or redirect to the dashboard that
//! matches the caller's role. It never returns an error status — this
//! layer backs page navigation, not the programmatic API. Everything
//! under `/api` is classified public here and authenticates itself per
//! endpoint via the [`AuthUser`](crate::auth::AuthUser) extractor.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

use jobhub_models::Role;

use crate::auth::{TokenService, COOKIE_NAME};

/// Pages reachable without a credential.
const PUBLIC_PAGES: &[&str] = &["/", "/login", "/register", "/jobs"];

/// Prefix for the programmatic API; always passes the gate.
const API_PREFIX: &str = "/api/";

/// Prefix for static assets; always passes the gate.
const STATIC_PREFIX: &str = "/static/";

/// Operational endpoints (probes, metrics) that bypass the gate.
const OPS_PATHS: &[&str] = &["/health", "/healthz", "/ready", "/metrics"];

/// True for paths that skip the credential check entirely. Even a valid
/// credential's role is not consulted on these.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PAGES.contains(&path)
        || OPS_PATHS.contains(&path)
        || path.starts_with(API_PREFIX)
        || path.starts_with(STATIC_PREFIX)
        || is_job_detail_path(path)
}

/// A single job's public detail view is public even though it is
/// path-parameterized: `/jobs/<alphanumeric id>`.
fn is_job_detail_path(path: &str) -> bool {
    match path.strip_prefix("/jobs/") {
        Some(id) => !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
        None => false,
    }
}

/// Gate middleware. Layered over the whole router.
pub async fn access_gate(
    State(tokens): State<Arc<TokenService>>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    if is_public_path(&path) {
        return next.run(request).await;
    }

    let principal = jar
        .get(COOKIE_NAME)
        .and_then(|cookie| tokens.verify(cookie.value()));

    let Some(principal) = principal else {
        debug!(path = %path, "No valid credential, redirecting to login");
        return Redirect::to("/login").into_response();
    };

    // Role routing between the two dashboards
    if path.starts_with("/recruiter") && principal.role != Role::Recruiter {
        debug!(path = %path, user = %principal.id, "Non-recruiter on recruiter page");
        return Redirect::to("/dashboard").into_response();
    }

    if path == "/dashboard" && principal.role != Role::User {
        debug!(path = %path, user = %principal.id, "Recruiter on user dashboard");
        return Redirect::to("/recruiter/dashboard").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_public_pages() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/login"));
        assert!(is_public_path("/register"));
        assert!(is_public_path("/jobs"));
    }

    #[test]
    fn test_api_and_static_prefixes_are_public() {
        assert!(is_public_path("/api/jobs"));
        assert!(is_public_path("/api/auth/login"));
        assert!(is_public_path("/static/app.css"));
    }

    #[test]
    fn test_ops_paths_are_public() {
        assert!(is_public_path("/health"));
        assert!(is_public_path("/ready"));
        assert!(is_public_path("/metrics"));
    }

    #[test]
    fn test_job_detail_is_public() {
        assert!(is_public_path("/jobs/507f1f77bcf86cd799439011"));
        assert!(is_public_path("/jobs/a1b2c3"));
    }

    #[test]
    fn test_protected_paths() {
        assert!(!is_public_path("/dashboard"));
        assert!(!is_public_path("/profile"));
        assert!(!is_public_path("/recruiter/dashboard"));
        assert!(!is_public_path("/recruiter/jobs/new"));
        // A nested jobs path is not the detail view
        assert!(!is_public_path("/jobs/abc/edit"));
        assert!(!is_public_path("/jobs/"));
    }
}
