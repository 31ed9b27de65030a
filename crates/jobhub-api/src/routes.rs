//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::gate::access_gate;
use crate::handlers::applications::{
    get_application, list_my_applications, list_my_applications_wrapped, submit_application,
    update_application_status,
};
use crate::handlers::auth::{login, logout, me, register};
use crate::handlers::jobs::{
    create_job, delete_job, get_job, job_applications, list_jobs, my_jobs, recommended_jobs,
    update_job,
};
use crate::handlers::pages::{
    apply_page, dashboard_page, home_page, job_detail_page, jobs_page, login_page, profile_page,
    recruiter_dashboard_page, recruiter_new_job_page, recruiter_profile_page, register_page,
};
use crate::handlers::profile::update_profile;
use crate::handlers::{health, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Page shells behind the access gate. Generic over state because the
/// handlers themselves are stateless; the gate carries its own state.
pub fn page_routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route("/", get(home_page))
        .route("/login", get(login_page))
        .route("/register", get(register_page))
        .route("/jobs", get(jobs_page))
        .route("/jobs/:job_id", get(job_detail_page))
        .route("/apply/:job_id", get(apply_page))
        .route("/dashboard", get(dashboard_page))
        .route("/profile", get(profile_page))
        .route("/recruiter/dashboard", get(recruiter_dashboard_page))
        .route("/recruiter/profile", get(recruiter_profile_page))
        .route("/recruiter/jobs/new", get(recruiter_new_job_page))
}

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout));

    let job_routes = Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/recommended", get(recommended_jobs))
        .route("/jobs/mine", get(my_jobs))
        .route(
            "/jobs/:job_id",
            get(get_job).put(update_job).delete(delete_job),
        )
        .route("/jobs/:job_id/applications", get(job_applications));

    let application_routes = Router::new()
        .route(
            "/applications",
            post(submit_application).get(list_my_applications),
        )
        .route("/applications/user", get(list_my_applications_wrapped))
        .route(
            "/applications/:application_id",
            get(get_application).put(update_application_status),
        );

    let profile_routes = Router::new().route("/user/profile/update", put(update_profile));

    // Per-IP rate limiter for the API surface
    let rate_limiter = Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(job_routes)
        .merge(application_routes)
        .merge(profile_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(page_routes())
        .merge(health_routes)
        .merge(metrics_routes)
        // The gate runs before every handler; `/api`, static assets, and
        // ops endpoints are classified public and pass straight through
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.tokens),
            access_gate,
        ))
        // Request body size limit to keep oversized payloads out
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
