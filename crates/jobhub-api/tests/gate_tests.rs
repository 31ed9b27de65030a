//! Access gate integration tests.
//!
//! Builds the page router with the gate layered on top and drives it with
//! `tower::ServiceExt::oneshot`, the same way requests flow in production
//! (no network, no store: the gate only needs the token service).

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower::ServiceExt;

use jobhub_api::auth::COOKIE_NAME;
use jobhub_api::gate::access_gate;
use jobhub_api::routes::page_routes;
use jobhub_api::TokenService;
use jobhub_models::{Role, UserId};

const TEST_SECRET: &str = "gate-test-secret";

fn tokens() -> Arc<TokenService> {
    Arc::new(TokenService::new(TEST_SECRET))
}

/// Page router plus a stand-in API route, gated like the real app.
fn app(tokens: Arc<TokenService>) -> Router {
    page_routes::<()>()
        .route("/api/ping", get(|| async { "pong" }))
        .layer(middleware::from_fn_with_state(tokens, access_gate))
}

fn request(path: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("{}={}", COOKIE_NAME, token));
    }
    builder.body(Body::empty()).unwrap()
}

fn location(response: &axum::response::Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

#[tokio::test]
async fn anonymous_requests_to_public_paths_pass_through() {
    let tokens = tokens();

    for path in [
        "/",
        "/login",
        "/register",
        "/jobs",
        "/jobs/507f1f77bcf86cd799439011",
        "/api/ping",
    ] {
        let response = app(Arc::clone(&tokens))
            .oneshot(request(path, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "path {} should pass", path);
        assert!(location(&response).is_none(), "path {} should not redirect", path);
    }
}

#[tokio::test]
async fn protected_paths_without_credential_redirect_to_login() {
    let tokens = tokens();

    for path in ["/dashboard", "/profile", "/recruiter/dashboard", "/apply/j1"] {
        let response = app(Arc::clone(&tokens))
            .oneshot(request(path, None))
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::SEE_OTHER,
            "path {} should redirect",
            path
        );
        assert_eq!(location(&response), Some("/login"));
    }
}

#[tokio::test]
async fn garbage_credential_redirects_to_login() {
    let response = app(tokens())
        .oneshot(request("/dashboard", Some("definitely-not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn credential_signed_with_other_secret_redirects_to_login() {
    let other = TokenService::new("some-other-secret");
    let token = other.issue(&UserId::new(), Role::User).unwrap();

    let response = app(tokens())
        .oneshot(request("/dashboard", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn tampered_credential_redirects_to_login() {
    let tokens = tokens();
    let token = tokens.issue(&UserId::new(), Role::User).unwrap();

    let mut bytes = token.into_bytes();
    let mid = bytes.len() / 2;
    bytes[mid] = if bytes[mid] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let response = app(tokens)
        .oneshot(request("/dashboard", Some(&tampered)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn user_role_on_recruiter_pages_redirects_to_dashboard() {
    let tokens = tokens();
    let token = tokens.issue(&UserId::new(), Role::User).unwrap();

    for path in ["/recruiter/dashboard", "/recruiter/jobs/new"] {
        let response = app(Arc::clone(&tokens))
            .oneshot(request(path, Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {}", path);
        assert_eq!(location(&response), Some("/dashboard"));
    }
}

#[tokio::test]
async fn recruiter_role_on_user_dashboard_redirects_to_recruiter_dashboard() {
    let tokens = tokens();
    let token = tokens.issue(&UserId::new(), Role::Recruiter).unwrap();

    let response = app(tokens)
        .oneshot(request("/dashboard", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/recruiter/dashboard"));
}

#[tokio::test]
async fn matching_roles_pass_through() {
    let tokens = tokens();

    let user_token = tokens.issue(&UserId::new(), Role::User).unwrap();
    let response = app(Arc::clone(&tokens))
        .oneshot(request("/dashboard", Some(&user_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let recruiter_token = tokens.issue(&UserId::new(), Role::Recruiter).unwrap();
    let response = app(Arc::clone(&tokens))
        .oneshot(request("/recruiter/dashboard", Some(&recruiter_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Recruiters keep access to non-dashboard protected pages
    let response = app(tokens)
        .oneshot(request("/profile", Some(&recruiter_token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn valid_credential_on_public_path_still_passes_without_role_check() {
    let tokens = tokens();
    let token = tokens.issue(&UserId::new(), Role::User).unwrap();

    // Role is never consulted on public paths
    let response = app(tokens)
        .oneshot(request("/jobs", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(location(&response).is_none());
}
